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

//! Canned timestamps and invalid inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed reference instant used across the workspace tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

/// `count` instants starting at [`base_time`], `step_minutes` apart.
pub fn timestamps(count: usize, step_minutes: i64) -> Vec<DateTime<Utc>> {
    (0..count as i64)
        .map(|i| base_time() + Duration::minutes(i * step_minutes))
        .collect()
}

/// Names that pass the `speedtest-*.json` discovery filter but do not decode.
pub fn bad_filenames() -> Vec<&'static str> {
    vec![
        "speedtest-latest.json",
        "speedtest-2024-01-15T10:30:00.000Z.json",
        "speedtest-2024-01-15T10-30-00-000.json",
        "speedtest-2024-01-15T10-30-00-00Z.json",
        "speedtest-2024-01-15T10-30-00-000Z-copy.json",
        "speedtest-2024-01-15T10-30-60-000Z.json",
    ]
}

/// Contents that are malformed for a correctly named file.
///
/// Each tuple is (description, content).
pub fn malformed_contents() -> Vec<(&'static str, &'static str)> {
    vec![
        ("empty", ""),
        ("truncated", r#"{"success": true, "result": {"down"#),
        ("not_json", "speedtest failed: timeout"),
        ("array_root", "[1, 2, 3]"),
        ("success_string", r#"{"success": "true", "result": {}}"#),
        ("result_array", r#"{"success": true, "result": []}"#),
        ("metric_string", r#"{"success": true, "result": {"download": "fast"}}"#),
        ("endpoint_number", r#"{"success": true, "endpoint": 3, "result": {}}"#),
    ]
}

/// Contents that represent a failed or incomplete run.
pub fn noise_contents() -> Vec<(&'static str, &'static str)> {
    vec![
        ("success_false", r#"{"success": false, "result": {"download": 1000000}}"#),
        ("success_null", r#"{"success": null, "result": {"download": 1000000}}"#),
        ("success_absent", r#"{"result": {"download": 1000000}}"#),
        ("no_result", r#"{"success": true, "sessionID": "x"}"#),
    ]
}
