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

//! CSV export of speedtest measurement datasets.
//!
//! Produces one row per measurement with an ISO-8601 UTC `timestamp`
//! column first. Identifier and metric columns are included only when at
//! least one row carries them, so an export of a dataset without loaded
//! latency figures has no empty loaded-latency columns.
//!
//! # Example
//!
//! ```no_run
//! use netzbremse_core::Dataset;
//! use netzbremse_csv::{to_csv_with_config, ToCsvConfig};
//!
//! # let dataset = Dataset::new();
//! let config = ToCsvConfig {
//!     delimiter: b'\t',
//!     ..Default::default()
//! };
//! let tsv = to_csv_with_config(&dataset, config).unwrap();
//! ```

mod error;
mod to_csv;

pub use error::{CsvError, Result};
pub use to_csv::{
    to_csv, to_csv_with_config, to_csv_writer, to_csv_writer_with_config, ToCsvConfig,
    TIMESTAMP_FORMAT,
};
