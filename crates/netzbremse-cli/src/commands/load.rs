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


//! Load command - one incremental load cycle with a summary

use crate::error::CliError;
use chrono::Utc;
use colored::Colorize;
use netzbremse::{Config, Dataset, IncrementalLoader, LoadReport};
use serde_json::json;

/// Run one load cycle and print what it found.
///
/// The cycle is the same one every consumer runs: discover, diff against the
/// snapshot, parse new files, merge, persist. The summary reports the
/// counters of that cycle and warns when the newest record is older than
/// [`netzbremse::STALE_AFTER`].
///
/// # Errors
///
/// Returns `Err` only if the JSON summary cannot be serialized; loading
/// itself degrades to an empty dataset instead of failing.
pub fn load(config: &Config, json: bool) -> Result<(), CliError> {
    let loader = IncrementalLoader::new(config);
    let (dataset, report) = loader.load_with_report();

    if json {
        let summary = summary_json(config, &dataset, &report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Speedtest Data".bold().underline());
    println!();
    println!("  {:<16} {}", "Data directory:".cyan(), config.data_dir.display());
    println!(
        "  {:<16} {} ({})",
        "Cache:".cyan(),
        loader.store().path().display(),
        if report.cache_hit { "hit".green() } else { "miss".yellow() }
    );
    println!(
        "  {:<16} {} discovered, {} new, {} parsed, {} skipped",
        "Result files:".cyan(),
        report.discovered,
        report.new_files,
        report.parsed,
        report.skipped
    );
    println!("  {:<16} {}", "Records:".cyan(), report.records);

    match dataset.span() {
        Some((first, last)) => println!(
            "  {:<16} {} .. {}",
            "Range:".cyan(),
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        ),
        None => println!("  {:<16} {}", "Range:".cyan(), "no data yet".dimmed()),
    }

    if !report.cache_written && report.parsed > report.skipped {
        eprintln!("{} snapshot was not updated", "Warning:".yellow().bold());
    }
    let now = Utc::now();
    if let Some(age) = dataset.staleness(now).filter(|_| dataset.is_stale(now)) {
        eprintln!(
            "{} No new data in ~{} hours",
            "Warning:".yellow().bold(),
            age.as_secs() / 3600
        );
    }
    Ok(())
}

fn summary_json(config: &Config, dataset: &Dataset, report: &LoadReport) -> serde_json::Value {
    let span = dataset.span();
    json!({
        "data_dir": config.data_dir,
        "discovered": report.discovered,
        "cached": report.cached,
        "new_files": report.new_files,
        "parsed": report.parsed,
        "skipped": report.skipped,
        "records": report.records,
        "cache_hit": report.cache_hit,
        "cache_written": report.cache_written,
        "first": span.map(|(first, _)| first),
        "last": span.map(|(_, last)| last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use netzbremse::Measurement;

    #[test]
    fn test_summary_json_fields() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let dataset = Dataset::from_unsorted(vec![Measurement::new(t)]);
        let report = LoadReport {
            discovered: 3,
            parsed: 3,
            skipped: 2,
            records: 1,
            cache_written: true,
            ..LoadReport::default()
        };
        let config = Config::default().with_data_dir("/srv/results");
        let value = summary_json(&config, &dataset, &report);
        assert_eq!(value["data_dir"], "/srv/results");
        assert_eq!(value["skipped"], 2);
        assert_eq!(value["cache_hit"], false);
        assert_eq!(value["first"], value["last"]);
        assert_eq!(value["first"], "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_summary_json_empty_dataset() {
        let value = summary_json(&Config::default(), &Dataset::new(), &LoadReport::default());
        assert!(value["first"].is_null());
        assert_eq!(value["records"], 0);
    }
}
