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


//! Structured error types for the Netzbremse CLI.
//!
//! Loading never fails, so the variants here cover what is left: writing
//! output, talking to the snapshot directly, and bad arguments.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
///
/// Implements `Clone` so that errors can be collected and reported after the
/// fact; wrapped library errors are stored as their messages.
///
/// # Examples
///
/// ```rust
/// use netzbremse_cli::error::CliError;
///
/// let err = CliError::invalid_input("interval must be at least 1 minute");
/// assert_eq!(err.to_string(), "Invalid input: interval must be at least 1 minute");
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed on an output path.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// CSV export failed.
    #[error("CSV export error: {0}")]
    Csv(String),

    /// The cache snapshot could not be read, written or removed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// An argument was accepted by the parser but is not usable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization failed.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<netzbremse::csv::CsvError> for CliError {
    fn from(err: netzbremse::csv::CsvError) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<netzbremse::CacheError> for CliError {
    fn from(err: netzbremse::CacheError) -> Self {
        Self::Cache(err.to_string())
    }
}

impl From<netzbremse::AggregateError> for CliError {
    fn from(err: netzbremse::AggregateError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error(
            "/tmp/out.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_aggregate_error_is_invalid_input() {
        let err: CliError = netzbremse::AggregateError::ZeroInterval.into();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(err.to_string().contains("at least 1 minute"));
    }

    #[test]
    fn test_json_error_conversion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CliError = source.into();
        assert!(err.to_string().starts_with("JSON format error:"));
    }

    #[test]
    fn test_clone() {
        let err = CliError::Cache("locked".to_string());
        assert_eq!(err.clone().to_string(), "Cache error: locked");
    }
}
