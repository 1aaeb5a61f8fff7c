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

//! Parquet snapshot cache for parsed speedtest measurements.
//!
//! The cache is a derived, disposable copy of everything the parser has
//! produced so far, including each record's `source_file`. It lives in one
//! Parquet file per data directory, named from a hash of the directory path
//! so that distinct sources never share a snapshot.
//!
//! # Guarantees
//!
//! - **Atomic replace**: writes go to a sibling temporary file that is
//!   renamed into place; a crash mid-write leaves the old snapshot intact.
//! - **Tolerant read**: [`CacheStore::read`] returns `None` for a missing,
//!   truncated, corrupt or version-mismatched snapshot and logs why.
//! - **Append-only columns**: metric columns missing from an older snapshot
//!   read as absent values.
//! - **Bounded decode**: decompressed data is capped to reject
//!   decompression bombs.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use netzbremse_parquet::CacheStore;
//!
//! let store = CacheStore::for_data_dir(&std::env::temp_dir(), Path::new("/data"));
//! match store.read() {
//!     Some(records) => println!("{} cached records", records.len()),
//!     None => println!("cold start"),
//! }
//! ```

mod error;
mod from_parquet;
mod store;
mod to_parquet;

pub use error::{CacheError, Result};
pub use from_parquet::from_parquet_bytes;
pub use store::{cache_file_name, cache_location, CacheStore, CACHE_FILE_EXTENSION, CACHE_FILE_PREFIX};
pub use to_parquet::{
    snapshot_schema, to_parquet_bytes, to_parquet_bytes_with_config, ToParquetConfig,
    SCHEMA_VERSION, SCHEMA_VERSION_KEY,
};
