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


//! CLI command implementations

mod aggregate;
mod export;
mod invalidate;
mod latest;
mod load;
mod table;
mod watch;

pub use aggregate::aggregate;
pub use export::{export, parse_metric, ExportFilter};
pub use invalidate::invalidate;
pub use latest::latest;
pub use load::load;
pub use watch::watch;

use crate::error::CliError;
use clap::ValueEnum;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Rendering of record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable columns
    #[default]
    Table,
    /// A JSON array of objects
    Json,
    /// Comma-separated values with a header row
    Csv,
}

/// Write content to a file or stdout.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the file cannot be written or stdout is closed.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}
