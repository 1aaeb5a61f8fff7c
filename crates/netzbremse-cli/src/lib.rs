// Dweve Netzbremse - Speedtest Result Pipeline
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Netzbremse CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **load**: run one incremental load cycle and summarize it
//! - **latest**: show the most recent measurements
//! - **aggregate**: average measurements into fixed-width intervals
//! - **export**: write the dataset as CSV, optionally filtered by date and metric
//! - **invalidate**: delete the snapshot so the next load starts cold
//! - **watch**: reload every refresh interval
//!
//! All commands read their configuration from the environment (`DATA_DIR`,
//! `CACHE_DIR`, `LOG_LEVEL`, ...) and accept `--data-dir`, `--cache-dir` and
//! `--log-level` overrides.
//!
//! # Examples
//!
//! ```no_run
//! use netzbremse::Config;
//! use netzbremse_cli::commands::{aggregate, OutputFormat};
//!
//! # fn main() -> Result<(), netzbremse_cli::error::CliError> {
//! let config = Config::from_env().with_data_dir("/data");
//! aggregate(&config, 10, OutputFormat::Json, None)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
