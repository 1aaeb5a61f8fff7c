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

//! Error types for the cache store.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Cache read/write error types.
///
/// None of these reach the pipeline's caller: [`CacheStore`](crate::CacheStore)
/// logs them and downgrades a failed read to a cache miss.
///
/// # Examples
///
/// ```
/// use netzbremse_parquet::CacheError;
///
/// let err = CacheError::VersionMismatch {
///     found: "0".to_string(),
///     expected: "1".to_string(),
/// };
/// assert_eq!(err.to_string(), "Cache schema version 0 does not match expected 1");
/// ```
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// A required column is missing or has an unexpected type.
    #[error("Schema error in column '{column}': {reason}")]
    Schema {
        /// Column name.
        column: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The snapshot was written by an incompatible layout version.
    #[error("Cache schema version {found} does not match expected {expected}")]
    VersionMismatch {
        /// Version stored in the file metadata (`none` if absent).
        found: String,
        /// Version this build writes.
        expected: String,
    },

    /// The snapshot decodes but violates a data invariant.
    #[error("Corrupt cache: {0}")]
    Corrupt(String),

    #[error("Security limit exceeded: decompressed size {actual} bytes exceeds maximum {limit}")]
    SizeLimit {
        /// Maximum allowed bytes.
        limit: usize,
        /// Bytes decoded so far.
        actual: usize,
    },
}

/// Convenience type alias for `Result` with `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

impl CacheError {
    pub fn schema(column: impl Into<String>, reason: impl Into<String>) -> Self {
        CacheError::Schema {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = CacheError::schema("timestamp", "expected Timestamp(Millisecond)");
        assert_eq!(
            err.to_string(),
            "Schema error in column 'timestamp': expected Timestamp(Millisecond)"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_size_limit_display() {
        let err = CacheError::SizeLimit { limit: 10, actual: 20 };
        assert!(err.to_string().contains("20 bytes"));
    }
}
