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

//! Result-file classification.
//!
//! [`RecordParser::classify`] turns one result file into exactly one
//! [`Outcome`]. Nothing in here returns an error: each way a file can be
//! unusable maps to a skip variant, and the caller decides what to do with
//! it.
//!
//! # Outcome Kinds
//!
//! | Kind | Cause | Log level |
//! |------|-------|-----------|
//! | [`Outcome::SkippedExpected`] | `success` false/absent, no `result` section | debug |
//! | [`Outcome::SkippedMalformed`] | bad filename, invalid JSON, missing or mistyped field | warn |
//! | [`Outcome::SkippedEnvironmentError`] | file cannot be opened or read | error |
//!
//! Checks run in a fixed order: read, decode, `success`, `result`,
//! filename, then field extraction. A failed run therefore reports as
//! expected noise even when its filename is also wrong.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::SkipReason;
use crate::metric::{Metric, ThroughputUnit};
use crate::record::{Measurement, SourcedMeasurement};
use crate::timestamp::parse_timestamp_from_filename;

/// Result of classifying one result file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The file produced a record.
    Parsed(SourcedMeasurement),
    /// The file legitimately represents a failed or incomplete test run.
    SkippedExpected(SkipReason),
    /// The file violates the naming or content contract.
    SkippedMalformed(SkipReason),
    /// The file could not be read.
    SkippedEnvironmentError(SkipReason),
}

impl Outcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Outcome::Parsed(_))
    }

    /// The parsed record, if any.
    pub fn into_record(self) -> Option<SourcedMeasurement> {
        match self {
            Outcome::Parsed(record) => Some(record),
            _ => None,
        }
    }

    /// The skip reason, if the file was skipped.
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Outcome::Parsed(_) => None,
            Outcome::SkippedExpected(r)
            | Outcome::SkippedMalformed(r)
            | Outcome::SkippedEnvironmentError(r) => Some(r),
        }
    }
}

/// Parser for individual result files.
///
/// Stateless apart from the throughput unit; cheap to copy and safe to share
/// across worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser {
    throughput: ThroughputUnit,
}

impl RecordParser {
    pub fn new(throughput: ThroughputUnit) -> Self {
        Self { throughput }
    }

    pub fn throughput_unit(&self) -> ThroughputUnit {
        self.throughput
    }

    /// Read and classify the file at `path`.
    ///
    /// The record's `source_file` is the final path component.
    pub fn classify(&self, path: &Path) -> Outcome {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match fs::read(path) {
            Ok(bytes) => self.classify_bytes(&file_name, &bytes),
            Err(e) => {
                log::error!("File read error for {}: {}", file_name, e);
                Outcome::SkippedEnvironmentError(SkipReason::Unreadable(e.to_string()))
            }
        }
    }

    /// Classify already-read file content. No I/O.
    pub fn classify_bytes(&self, file_name: &str, bytes: &[u8]) -> Outcome {
        let doc: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("JSON decode error in {}: {}", file_name, e);
                return Outcome::SkippedMalformed(SkipReason::InvalidJson(e.to_string()));
            }
        };

        match self.build_record(file_name, &doc) {
            Ok(record) => Outcome::Parsed(record),
            Err(Skip::Expected(reason)) => {
                log::debug!("Skipping {}: {}", file_name, reason);
                Outcome::SkippedExpected(reason)
            }
            Err(Skip::Malformed(reason)) => {
                log::warn!("Skipping {}: {}", file_name, reason);
                Outcome::SkippedMalformed(reason)
            }
        }
    }

    fn build_record(&self, file_name: &str, doc: &Value) -> Result<SourcedMeasurement, Skip> {
        let root = doc
            .as_object()
            .ok_or(Skip::Malformed(SkipReason::NotAnObject))?;

        match root.get("success") {
            Some(Value::Bool(true)) => {}
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Err(Skip::Expected(SkipReason::Failed));
            }
            Some(_) => {
                return Err(Skip::Malformed(SkipReason::wrong_type("success", "boolean")));
            }
        }

        let result = match root.get("result") {
            None => return Err(Skip::Expected(SkipReason::NoResult)),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(Skip::Malformed(SkipReason::wrong_type("result", "object"))),
        };

        let timestamp = parse_timestamp_from_filename(file_name)
            .ok_or_else(|| Skip::Malformed(SkipReason::BadFilename(file_name.to_string())))?;

        let mut measurement = Measurement::new(timestamp);
        measurement.session_id = optional_string(root, "sessionID")?;
        measurement.endpoint = optional_string(root, "endpoint")?;

        for metric in Metric::ALL {
            let raw = match result.get(metric.key()) {
                None | Some(Value::Null) => continue,
                Some(Value::Number(n)) => n.as_f64(),
                Some(_) => None,
            };
            let raw = raw.ok_or_else(|| {
                Skip::Malformed(SkipReason::wrong_type(metric.key(), "number"))
            })?;
            measurement
                .metrics
                .set(metric, Some(metric.convert(raw, self.throughput)));
        }

        Ok(SourcedMeasurement::new(file_name, measurement))
    }
}

/// Internal split between the two data-level skip kinds.
enum Skip {
    Expected(SkipReason),
    Malformed(SkipReason),
}

fn optional_string(root: &Map<String, Value>, field: &str) -> Result<Option<String>, Skip> {
    match root.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Skip::Malformed(SkipReason::wrong_type(field, "string"))),
    }
}

/// Classify a file with the default throughput unit.
pub fn classify(path: &Path) -> Outcome {
    RecordParser::default().classify(path)
}
