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


//! Plain-text table rendering for record listings.

use chrono::{DateTime, Utc};
use netzbremse::{Bucket, Measurement, Metric, MetricValues};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING: &str = "-";

/// Metrics with at least one value among `values`, in column order.
pub(crate) fn present_metrics<'a, I>(values: I) -> Vec<Metric>
where
    I: IntoIterator<Item = &'a MetricValues>,
{
    let mut seen = [false; Metric::COUNT];
    for v in values {
        for (metric, _) in v.present() {
            seen[metric.index()] = true;
        }
    }
    Metric::ALL
        .into_iter()
        .filter(|m| seen[m.index()])
        .collect()
}

pub(crate) fn render_measurements(rows: &[Measurement]) -> String {
    let metrics = present_metrics(rows.iter().map(|m| &m.metrics));
    let mut headers = vec!["Time (UTC)".to_string()];
    headers.extend(metrics.iter().map(|m| column_title(*m)));
    let body = rows
        .iter()
        .map(|m| row(m.timestamp, &m.metrics, &metrics, None))
        .collect();
    render(headers, body)
}

pub(crate) fn render_buckets(buckets: &[Bucket]) -> String {
    let metrics = present_metrics(buckets.iter().map(|b| &b.metrics));
    let mut headers = vec!["Interval (UTC)".to_string(), "Runs".to_string()];
    headers.extend(metrics.iter().map(|m| column_title(*m)));
    let body = buckets
        .iter()
        .map(|b| row(b.start, &b.metrics, &metrics, Some(b.count)))
        .collect();
    render(headers, body)
}

fn column_title(metric: Metric) -> String {
    format!("{} ({})", metric.name(), metric.unit())
}

fn row(
    timestamp: DateTime<Utc>,
    values: &MetricValues,
    metrics: &[Metric],
    count: Option<usize>,
) -> Vec<String> {
    let mut cells = vec![timestamp.format(TIME_FORMAT).to_string()];
    if let Some(count) = count {
        cells.push(count.to_string());
    }
    cells.extend(metrics.iter().map(|m| match values.get(*m) {
        Some(v) => format!("{:.2}", v),
        None => MISSING.to_string(),
    }));
    cells
}

fn render(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                // timestamps left-aligned, numbers right-aligned
                if i == 0 {
                    format!("{:<w$}", cell, w = *w)
                } else {
                    format!("{:>w$}", cell, w = *w)
                }
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&headers));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for cells in &rows {
        out.push_str(&line(cells));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, m, 0).unwrap()
    }

    #[test]
    fn test_only_present_metrics_become_columns() {
        let rows = vec![
            Measurement::new(at(0)).with_metric(Metric::Download, 250.0),
            Measurement::new(at(5)).with_metric(Metric::Latency, 12.5),
        ];
        let table = render_measurements(&rows);
        let header = table.lines().next().unwrap();
        assert!(header.contains("Download (Mbps)"));
        assert!(header.contains("Latency (ms)"));
        assert!(!header.contains("Upload"));
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        let rows = vec![
            Measurement::new(at(0)).with_metric(Metric::Download, 250.0),
            Measurement::new(at(5)).with_metric(Metric::Latency, 12.5),
        ];
        let table = render_measurements(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("2024-01-15 10:00:00"));
        assert!(lines[2].contains("250.00"));
        assert!(lines[2].trim_end().ends_with(MISSING));
        assert!(lines[3].contains("12.50"));
    }

    #[test]
    fn test_bucket_table_has_run_count() {
        let buckets = vec![Bucket {
            start: at(0),
            count: 3,
            metrics: Measurement::new(at(0)).with_metric(Metric::Upload, 48.0).metrics,
        }];
        let table = render_buckets(&buckets);
        assert!(table.lines().next().unwrap().contains("Runs"));
        assert!(table.lines().nth(2).unwrap().contains("  3  "));
    }
}
