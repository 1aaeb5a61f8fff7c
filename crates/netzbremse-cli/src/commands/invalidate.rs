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


//! Invalidate command - drop the on-disk snapshot

use crate::error::CliError;
use colored::Colorize;
use netzbremse::Config;

/// Remove the snapshot for the configured data directory.
///
/// The next load parses every result file again. Removing a snapshot that
/// does not exist is not an error.
///
/// # Errors
///
/// Returns [`CliError::Cache`] if the snapshot exists but cannot be removed.
pub fn invalidate(config: &Config) -> Result<(), CliError> {
    let store = config.cache_store();
    if store.clear()? {
        println!("{} {}", "Removed".green().bold(), store.path().display());
    } else {
        println!("No snapshot at {}", store.path().display());
    }
    Ok(())
}
