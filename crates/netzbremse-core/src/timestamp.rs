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

//! Filename ↔ timestamp codec.
//!
//! Result files are named `speedtest-2024-01-15T10-30-00-000Z.json`: an
//! ISO-8601 UTC instant with millisecond precision in which the `:` and `.`
//! separators of the time of day are replaced by `-` so the name is safe on
//! every filesystem and in URLs.
//!
//! Decoding is all-or-nothing. Anything that does not match the exact
//! pattern (digit counts, the trailing `Z`, the `.json` extension, no extra
//! segments) yields `None`.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Filename prefix of every result file.
pub const FILE_PREFIX: &str = "speedtest-";

/// Filename extension of every result file.
pub const FILE_EXTENSION: &str = ".json";

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^speedtest-([0-9]{4}-[0-9]{2}-[0-9]{2})T([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{3})Z\.json$",
        )
        .expect("filename pattern is a valid regex")
    })
}

/// Whether a directory entry name belongs to the result-file family
/// (`speedtest-*.json`).
///
/// This is the discovery filter. A name can pass it and still fail
/// [`parse_timestamp_from_filename`]; such files are reported as malformed
/// by the parser rather than silently ignored.
pub fn is_result_file_name(name: &str) -> bool {
    name.len() >= FILE_PREFIX.len() + FILE_EXTENSION.len()
        && name.starts_with(FILE_PREFIX)
        && name.ends_with(FILE_EXTENSION)
}

/// Extract the timestamp from a result filename.
///
/// # Examples
///
/// ```
/// use netzbremse_core::parse_timestamp_from_filename;
///
/// let ts = parse_timestamp_from_filename("speedtest-2024-01-15T10-30-00-000Z.json").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00+00:00");
///
/// assert!(parse_timestamp_from_filename("speedtest-2024-01-15T10:30:00.000Z.json").is_none());
/// ```
pub fn parse_timestamp_from_filename(name: &str) -> Option<DateTime<Utc>> {
    let caps = filename_pattern().captures(name)?;
    // chrono reads second 60 as a leap second; the cache would store it as :00 of the next minute
    if &caps[4] > "59" {
        return None;
    }
    let iso = format!(
        "{}T{}:{}:{}.{}Z",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
    );
    DateTime::parse_from_rfc3339(&iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Encode a timestamp as a result filename, truncated to milliseconds.
///
/// Inverse of [`parse_timestamp_from_filename`] for years 0000-9999.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use netzbremse_core::filename_for;
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(filename_for(ts), "speedtest-2024-01-15T10-30-00-000Z.json");
/// ```
pub fn filename_for(timestamp: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        FILE_PREFIX,
        timestamp.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        FILE_EXTENSION
    )
}

/// Truncate an instant to millisecond precision.
pub fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp)
}
