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

//! Convert datasets to CSV.

use std::io::Write;

use netzbremse_core::{Dataset, Measurement, Metric};

use crate::error::{CsvError, Result};

/// Timestamp format of the `timestamp` column (ISO-8601 UTC, milliseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct ToCsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Include header row (default: true)
    pub include_headers: bool,
    /// Quote style for fields (default: necessary)
    pub quote_style: csv::QuoteStyle,
    /// Metric columns to write; `None` writes every metric present in the
    /// dataset (default: `None`)
    pub metrics: Option<Vec<Metric>>,
    /// Write `sessionID` / `endpoint` columns when any row has them
    /// (default: true)
    pub include_identifiers: bool,
}

impl Default for ToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
            quote_style: csv::QuoteStyle::Necessary,
            metrics: None,
            include_identifiers: true,
        }
    }
}

enum Column {
    Timestamp,
    SessionId,
    Endpoint,
    Metric(Metric),
}

impl Column {
    fn header(&self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::SessionId => "sessionID",
            Column::Endpoint => "endpoint",
            Column::Metric(m) => m.key(),
        }
    }

    fn cell(&self, row: &Measurement) -> String {
        match self {
            Column::Timestamp => row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            Column::SessionId => row.session_id.clone().unwrap_or_default(),
            Column::Endpoint => row.endpoint.clone().unwrap_or_default(),
            Column::Metric(m) => row.get(*m).map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

/// Columns are always `timestamp`, then identifiers, then metrics in
/// table order.
fn select_columns(dataset: &Dataset, config: &ToCsvConfig) -> Vec<Column> {
    let mut columns = vec![Column::Timestamp];
    if config.include_identifiers {
        let (has_session, has_endpoint) = dataset.has_identifiers();
        if has_session {
            columns.push(Column::SessionId);
        }
        if has_endpoint {
            columns.push(Column::Endpoint);
        }
    }
    let metrics = match &config.metrics {
        Some(selected) => Metric::ALL
            .into_iter()
            .filter(|m| selected.contains(m))
            .collect(),
        None => dataset.present_metrics(),
    };
    columns.extend(metrics.into_iter().map(Column::Metric));
    columns
}

/// Convert a dataset to a CSV string.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use netzbremse_core::{Dataset, Measurement, Metric};
/// use netzbremse_csv::to_csv;
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let dataset = Dataset::from_unsorted(vec![
///     Measurement::new(ts).with_metric(Metric::Download, 250.5),
/// ]);
///
/// let csv = to_csv(&dataset).unwrap();
/// assert_eq!(csv, "timestamp,download\n2024-01-15T10:30:00.000Z,250.5\n");
/// ```
pub fn to_csv(dataset: &Dataset) -> Result<String> {
    to_csv_with_config(dataset, ToCsvConfig::default())
}

/// Convert a dataset to a CSV string with custom configuration.
pub fn to_csv_with_config(dataset: &Dataset, config: ToCsvConfig) -> Result<String> {
    // ~24 bytes for the timestamp plus ~10 per metric cell
    let mut buffer = Vec::with_capacity((dataset.len() * 100).max(1024));

    to_csv_writer_with_config(dataset, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|_| CsvError::InvalidUtf8 {
        context: "CSV output".to_string(),
    })
}

/// Write a dataset as CSV to a writer.
///
/// # Example
///
/// ```no_run
/// use netzbremse_core::Dataset;
/// use netzbremse_csv::to_csv_writer;
/// use std::fs::File;
///
/// let file = File::create("speedtest.csv").unwrap();
/// to_csv_writer(&Dataset::new(), file).unwrap();
/// ```
pub fn to_csv_writer<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    to_csv_writer_with_config(dataset, writer, ToCsvConfig::default())
}

/// Write a dataset as CSV to a writer with custom configuration.
pub fn to_csv_writer_with_config<W: Write>(
    dataset: &Dataset,
    writer: W,
    config: ToCsvConfig,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote_style(config.quote_style)
        .from_writer(writer);

    let columns = select_columns(dataset, &config);

    if config.include_headers {
        wtr.write_record(columns.iter().map(Column::header))?;
    }

    for row in dataset {
        wtr.write_record(columns.iter().map(|c| c.cell(row)))?;
    }

    wtr.flush()?;
    Ok(())
}
