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

//! Data model, result-file parser and interval aggregation for speedtest
//! measurements.
//!
//! This crate holds everything in the pipeline that does not touch a cache
//! or a thread pool:
//!
//! - the filename codec ([`parse_timestamp_from_filename`], [`filename_for`])
//! - the metric table ([`Metric`], [`ThroughputUnit`])
//! - the per-file parser ([`RecordParser::classify`] returning an [`Outcome`])
//! - the outward [`Dataset`] and its views
//! - fixed-width interval aggregation ([`aggregate_to_intervals`])
//!
//! # Example
//!
//! ```
//! use netzbremse_core::{Metric, Outcome, RecordParser};
//!
//! let json = br#"{"success": true, "result": {"download": 100000000, "latency": 12.0}}"#;
//! let outcome = RecordParser::default()
//!     .classify_bytes("speedtest-2024-01-15T10-30-00-000Z.json", json);
//!
//! let record = outcome.into_record().unwrap();
//! assert_eq!(record.measurement.get(Metric::Download), Some(100.0));
//! assert_eq!(record.measurement.get(Metric::Upload), None);
//! ```

mod aggregate;
mod error;
mod metric;
mod parser;
mod record;
mod timestamp;

pub use aggregate::{aggregate_to_intervals, Bucket};
pub use error::{AggregateError, SkipReason};
pub use metric::{Metric, MetricValues, ThroughputUnit, Unit, BITS_PER_MEGABIT};
pub use parser::{classify, Outcome, RecordParser};
pub use record::{sort_sourced, Dataset, Measurement, SourcedMeasurement, STALE_AFTER};
pub use timestamp::{
    filename_for, is_result_file_name, parse_timestamp_from_filename, truncate_to_millis,
    FILE_EXTENSION, FILE_PREFIX,
};
