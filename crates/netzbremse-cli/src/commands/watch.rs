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


//! Watch command - periodic reload as a dashboard would run it

use super::table::render_measurements;
use crate::error::CliError;
use chrono::Utc;
use colored::Colorize;
use netzbremse::{Config, Pipeline};
use std::thread;
use std::time::Duration;

/// Reload every refresh interval and print the newest records.
///
/// Reads go through a [`Pipeline`], so the snapshot and result cache behave
/// as they do for a long-running consumer. Runs until interrupted, or for
/// `cycles` iterations.
pub fn watch(config: &Config, count: usize, cycles: Option<u64>) -> Result<(), CliError> {
    let interval = config.refresh_interval.max(Duration::from_secs(1));
    let pipeline = Pipeline::new(config.clone());
    log::info!(
        "Watching {} every {}s",
        config.data_dir.display(),
        interval.as_secs()
    );

    let mut cycle = 0u64;
    loop {
        let dataset = pipeline.load_all_data();
        println!(
            "{} {} records",
            format!("[{}]", Utc::now().format("%H:%M:%S")).dimmed(),
            dataset.len()
        );
        let latest = dataset.latest(count);
        if !latest.is_empty() {
            print!("{}", render_measurements(&latest));
        }
        if dataset.is_stale(Utc::now()) {
            eprintln!("{} newest record is more than 2 hours old", "Warning:".yellow().bold());
        }

        cycle += 1;
        if cycles.is_some_and(|limit| cycle >= limit) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}
