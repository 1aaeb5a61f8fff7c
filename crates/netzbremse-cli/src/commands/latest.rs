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


//! Latest command - most recent measurements

use super::table::render_measurements;
use super::OutputFormat;
use crate::error::CliError;
use netzbremse::{csv::to_csv, get_latest, load_all_data, Config, Dataset, Measurement};

/// Print the `count` most recent measurements, most recent first.
///
/// CSV output is in chronological order, like every other CSV export.
///
/// # Errors
///
/// Returns `Err` if serialization to the requested format fails.
pub fn latest(config: &Config, count: usize, format: OutputFormat) -> Result<(), CliError> {
    let dataset = load_all_data(config);
    let rows = get_latest(&dataset, count);
    if rows.is_empty() {
        eprintln!("No data yet in {}", config.data_dir.display());
        return Ok(());
    }
    print!("{}", render_rows(rows, format)?);
    Ok(())
}

pub(crate) fn render_rows(rows: Vec<Measurement>, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_measurements(&rows),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&rows)?;
            out.push('\n');
            out
        }
        OutputFormat::Csv => to_csv(&Dataset::from_unsorted(rows))?,
    })
}
