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


//! CLI command definitions and argument parsing.
//!
//! # Organization
//!
//! ```text
//! Commands
//! ├── load        one load cycle with a summary
//! ├── latest      most recent records
//! ├── aggregate   interval averages
//! ├── export      CSV export with date and metric filters
//! ├── invalidate  drop the on-disk snapshot
//! └── watch       periodic reload
//! ```
//!
//! Options shared by every command live in [`GlobalArgs`] and are layered
//! over the environment configuration.

use crate::commands::{self, parse_metric, ExportFilter, OutputFormat};
use crate::error::CliError;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use log::LevelFilter;
use netzbremse::{parse_log_level, Config, Metric};
use std::path::PathBuf;

/// Options accepted by every command. Each overrides its environment
/// variable.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory containing speedtest-*.json result files [env: DATA_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for the Parquet snapshot [env: CACHE_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error [env: LOG_LEVEL]
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LevelFilter>,
}

impl GlobalArgs {
    /// Layer the command-line overrides over `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if let Some(level) = self.log_level {
            config = config.with_log_level(level);
        }
        config
    }
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one load cycle and print a summary
    ///
    /// Parses only result files that are not yet in the snapshot, then
    /// reports discovered, new, parsed and skipped counts.
    Load {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent measurements
    Latest {
        /// Number of records to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Average measurements into fixed-width time intervals
    Aggregate {
        /// Interval width in minutes
        #[arg(short, long, default_value_t = 10)]
        interval: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export measurements as CSV
    Export {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First UTC date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last UTC date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Metric column to include, by result-file key (repeatable)
        #[arg(short, long = "metric", value_name = "KEY", value_parser = parse_metric)]
        metrics: Vec<Metric>,
    },

    /// Delete the snapshot so the next load parses every file
    Invalidate,

    /// Reload every refresh interval and print the newest records
    Watch {
        /// Number of records to show per cycle
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
}

impl Commands {
    /// Execute the command against `config`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if arguments are unusable, output cannot be written, or
    /// the snapshot cannot be removed.
    pub fn execute(self, config: &Config) -> Result<(), CliError> {
        match self {
            Commands::Load { json } => commands::load(config, json),
            Commands::Latest { count, format } => commands::latest(config, count, format),
            Commands::Aggregate {
                interval,
                format,
                output,
            } => commands::aggregate(config, interval, format, output.as_deref()),
            Commands::Export {
                output,
                from,
                to,
                metrics,
            } => {
                let filter = ExportFilter { from, to, metrics };
                commands::export(config, &filter, output.as_deref())
            }
            Commands::Invalidate => commands::invalidate(config),
            Commands::Watch { count, cycles } => commands::watch(config, count, cycles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args_override_config() {
        let args = GlobalArgs {
            data_dir: Some(PathBuf::from("/srv/results")),
            cache_dir: None,
            log_level: Some(LevelFilter::Debug),
        };
        let base = Config::default().with_cache_dir("/var/cache");
        let config = args.apply(base);
        assert_eq!(config.data_dir, PathBuf::from("/srv/results"));
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_empty_global_args_keep_config() {
        let base = Config::default().with_data_dir("/x");
        assert_eq!(GlobalArgs::default().apply(base.clone()), base);
    }
}
