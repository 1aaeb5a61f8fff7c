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


//! Netzbremse Command Line Interface

use clap::Parser;
use log::LevelFilter;
use netzbremse::Config;
use netzbremse_cli::cli::{Commands, GlobalArgs};
use std::process::ExitCode;

/// Netzbremse - speedtest result pipeline
///
/// Loads periodic speed-test result files into a timestamp-ordered dataset,
/// keeping a Parquet snapshot so that each run only parses new files.
///
/// # Examples
///
/// ```bash
/// # Load once and print a summary
/// netzbremse --data-dir /data load
///
/// # Ten-minute averages as JSON
/// netzbremse aggregate --interval 10 --format json
///
/// # Export one week of download and upload figures
/// netzbremse export --from 2024-01-08 --to 2024-01-14 -m download -m upload -o week.csv
/// ```
#[derive(Parser)]
#[command(name = "netzbremse")]
#[command(author, version, about = "Netzbremse - speedtest result pipeline", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// `RUST_LOG` still wins over `level` when set.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str().to_ascii_lowercase()),
    )
    .target(env_logger::Target::Stderr)
    .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (env_config, warnings) = Config::from_env_with_warnings();
    let config = cli.global.apply(env_config);
    init_logging(config.log_level);
    for warning in warnings {
        log::warn!("{}", warning);
    }

    match cli.command.execute(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
