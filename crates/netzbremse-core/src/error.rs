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

//! Error types for the core crate.
//!
//! Parsing a result file never fails hard: every problem becomes a
//! [`SkipReason`] carried by a skip [`Outcome`](crate::Outcome). The only
//! fallible public operation is aggregation with an invalid interval.

use thiserror::Error;

/// Why a result file was excluded from the dataset.
///
/// # Examples
///
/// ```
/// use netzbremse_core::SkipReason;
///
/// let reason = SkipReason::WrongType {
///     field: "download".to_string(),
///     expected: "number",
/// };
/// assert_eq!(reason.to_string(), "field 'download' has wrong type: expected number");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file's `success` flag is false or absent.
    #[error("measurement did not succeed")]
    Failed,

    /// The file has no `result` section.
    #[error("no result section")]
    NoResult,

    /// The filename does not follow `speedtest-<timestamp>.json`.
    #[error("could not parse timestamp from filename: {0}")]
    BadFilename(String),

    /// The content is not valid JSON.
    #[error("JSON decode error: {0}")]
    InvalidJson(String),

    /// The top-level JSON value is not an object.
    #[error("top-level value is not an object")]
    NotAnObject,

    /// A field is present with an unexpected JSON type.
    #[error("field '{field}' has wrong type: expected {expected}")]
    WrongType {
        /// Field name as it appears in the file.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// The file could not be opened or read.
    #[error("file read error: {0}")]
    Unreadable(String),
}

impl SkipReason {
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}

/// Errors from the aggregation API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The bucket width must be at least one minute.
    #[error("aggregation interval must be at least 1 minute")]
    ZeroInterval,
}
