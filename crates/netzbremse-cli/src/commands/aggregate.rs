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


//! Aggregate command - interval averages for charting

use super::table::render_buckets;
use super::{write_output, OutputFormat};
use crate::error::CliError;
use netzbremse::csv::{to_csv_with_config, ToCsvConfig};
use netzbremse::{Bucket, Config, Dataset, Measurement};
use std::path::Path;

/// Average the loaded dataset into `interval_minutes` wide buckets.
///
/// Bucket starts are epoch-aligned. CSV output carries one row per bucket
/// with the bucket start as `timestamp` and the metric means; the run count
/// is only shown in table and JSON output.
///
/// # Errors
///
/// Returns `Err` if:
/// - `interval_minutes` is zero
/// - Serialization or writing the output fails
pub fn aggregate(
    config: &Config,
    interval_minutes: u32,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if interval_minutes == 0 {
        return Err(CliError::invalid_input(
            "aggregation interval must be at least 1 minute",
        ));
    }

    let dataset = netzbremse::load_all_data(config);
    let buckets = netzbremse::aggregate(&dataset, interval_minutes)?;
    if buckets.is_empty() {
        eprintln!("No data yet in {}", config.data_dir.display());
        return Ok(());
    }

    let content = render(buckets, format)?;
    write_output(&content, output)
}

fn render(buckets: Vec<Bucket>, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_buckets(&buckets),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&buckets)?;
            out.push('\n');
            out
        }
        OutputFormat::Csv => {
            let means: Dataset = buckets.into_iter().map(Measurement::from).collect();
            let config = ToCsvConfig {
                include_identifiers: false,
                ..ToCsvConfig::default()
            };
            to_csv_with_config(&means, config)?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use netzbremse::Metric;

    fn buckets() -> Vec<Bucket> {
        let rows: Vec<Measurement> = [(0, 10.0), (3, 20.0), (7, 30.0), (12, 40.0)]
            .into_iter()
            .map(|(m, v)| {
                Measurement::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, m, 0).unwrap())
                    .with_metric(Metric::Download, v)
            })
            .collect();
        netzbremse::aggregate_to_intervals(&rows, 10).unwrap()
    }

    #[test]
    fn test_json_buckets() {
        let out = render(buckets(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["timestamp"], "2024-01-15T10:00:00Z");
        assert_eq!(value[0]["count"], 3);
        assert_eq!(value[0]["download"], 20.0);
        assert_eq!(value[1]["count"], 1);
    }

    #[test]
    fn test_csv_buckets() {
        let out = render(buckets(), OutputFormat::Csv).unwrap();
        assert_eq!(
            out,
            "timestamp,download\n2024-01-15T10:00:00.000Z,20\n2024-01-15T10:10:00.000Z,40\n"
        );
    }

    #[test]
    fn test_zero_interval_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default()
            .with_data_dir(dir.path().join("absent"))
            .with_cache_dir(dir.path());
        let err = aggregate(&config, 0, OutputFormat::Table, None).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
