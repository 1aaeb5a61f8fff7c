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


//! Export command - CSV download of the loaded dataset

use super::write_output;
use crate::error::CliError;
use chrono::NaiveDate;
use netzbremse::csv::{to_csv_with_config, ToCsvConfig};
use netzbremse::{load_all_data, Config, Dataset, Metric};
use std::path::Path;

/// Selection applied before export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportFilter {
    /// First UTC date to include.
    pub from: Option<NaiveDate>,
    /// Last UTC date to include.
    pub to: Option<NaiveDate>,
    /// Metric columns to emit; all present metrics when empty.
    pub metrics: Vec<Metric>,
}

impl ExportFilter {
    fn apply(&self, dataset: Dataset) -> Dataset {
        match (self.from, self.to) {
            (None, None) => dataset,
            (from, to) => dataset.between(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            ),
        }
    }

    fn csv_config(&self) -> ToCsvConfig {
        ToCsvConfig {
            metrics: (!self.metrics.is_empty()).then(|| self.metrics.clone()),
            ..ToCsvConfig::default()
        }
    }
}

/// Export the loaded dataset as CSV to `output` or stdout.
///
/// # Errors
///
/// Returns `Err` if:
/// - `from` lies after `to`
/// - CSV encoding fails
/// - The output cannot be written
pub fn export(config: &Config, filter: &ExportFilter, output: Option<&Path>) -> Result<(), CliError> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(CliError::invalid_input(format!(
                "--from {} is after --to {}",
                from, to
            )));
        }
    }

    let dataset = filter.apply(load_all_data(config));
    let content = to_csv_with_config(&dataset, filter.csv_config())?;
    write_output(&content, output)?;

    if let Some(path) = output {
        log::info!("Exported {} records to {}", dataset.len(), path.display());
    }
    Ok(())
}

/// Parse a metric from its result-file key, as used for `--metric`.
pub fn parse_metric(key: &str) -> Result<Metric, String> {
    Metric::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = Metric::ALL.iter().map(|m| m.key()).collect();
        format!("unknown metric '{}' (expected one of: {})", key, known.join(", "))
    })
}
