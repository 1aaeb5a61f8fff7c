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

//! Shared test fixtures for the speedtest result pipeline.
//!
//! Provides result-file JSON builders, canned malformed samples, and
//! scratch data directories with correctly named files, so that every
//! crate in the workspace tests against the same shapes.
//!
//! # Quick Start
//!
//! ```rust
//! use netzbremse_test::fixtures::{self, FixtureDir, ResultFileBuilder};
//!
//! let dir = FixtureDir::new();
//! let ts = fixtures::base_time();
//! dir.write_result(ts, &ResultFileBuilder::complete());
//! dir.write_result(ts + chrono::Duration::minutes(10), &ResultFileBuilder::failed());
//!
//! assert_eq!(dir.file_names().len(), 2);
//! ```

pub mod fixtures;

pub use fixtures::{FixtureDir, ResultFileBuilder};
