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

//! Error types for CSV export.

use thiserror::Error;

/// CSV export error types.
///
/// # Examples
///
/// ```
/// use netzbremse_csv::CsvError;
///
/// let err = CsvError::InvalidUtf8 {
///     context: "CSV output".to_string(),
/// };
/// assert_eq!(err.to_string(), "Invalid UTF-8 in CSV output");
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),

    #[error("Invalid UTF-8 in {context}")]
    InvalidUtf8 {
        /// Where the invalid UTF-8 was produced.
        context: String,
    },
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;
