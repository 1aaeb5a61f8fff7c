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

//! # Netzbremse - Speedtest Result Pipeline
//!
//! Loads periodic speed-test result files (`speedtest-<timestamp>.json`)
//! from a data directory into a timestamp-ordered [`Dataset`], keeping a
//! Parquet snapshot of everything parsed so far so that each cycle only
//! parses files it has not seen.
//!
//! ## Quick Start
//!
//! ```no_run
//! use netzbremse::{aggregate, Config, Pipeline};
//!
//! let pipeline = Pipeline::new(Config::from_env());
//!
//! let dataset = pipeline.load_all_data();
//! for m in pipeline.get_latest(5) {
//!     println!("{} {:?}", m.timestamp, m.get(netzbremse::Metric::Download));
//! }
//!
//! let buckets = aggregate(&dataset, 10).unwrap();
//! println!("{} ten-minute intervals", buckets.len());
//! ```
//!
//! ## Crates
//!
//! - [`netzbremse_core`]: filename codec, record parser, dataset, aggregation
//! - [`netzbremse_parquet`]: the on-disk snapshot
//! - `netzbremse_csv`: CSV export (feature = "csv", re-exported as [`csv`])
//!
//! ## Failure Model
//!
//! Loading never returns an error. Unreadable or malformed files are
//! skipped and logged, a broken snapshot is rebuilt from the source files,
//! and a failed snapshot write still returns the freshly loaded data. An
//! empty dataset means "no data yet".

use std::sync::Arc;
use std::time::Duration;

mod batch;
mod config;
mod loader;
mod refresh;

pub use batch::{parallel_map, worker_count, BatchResults, FileLoader};
pub use config::{
    parse_log_level, Config, DEFAULT_DATA_DIR, DEFAULT_MAX_WORKERS, DEFAULT_REFRESH_INTERVAL,
    ENV_CACHE_DIR, ENV_DATA_DIR, ENV_LOG_LEVEL, ENV_MAX_WORKERS, ENV_REFRESH_INTERVAL,
    ENV_THROUGHPUT_UNIT, MIN_RESULT_TTL,
};
pub use loader::{IncrementalLoader, LoadReport};
pub use refresh::ResultCache;

// Re-export the data model
pub use netzbremse_core::{
    aggregate_to_intervals, AggregateError, Bucket, Dataset, Measurement, Metric, MetricValues,
    Outcome, RecordParser, SkipReason, SourcedMeasurement, ThroughputUnit, Unit, STALE_AFTER,
};
pub use netzbremse_parquet::{CacheError, CacheStore};

#[cfg(feature = "csv")]
pub mod csv {
    //! CSV export
    pub use netzbremse_csv::{
        to_csv, to_csv_with_config, to_csv_writer, to_csv_writer_with_config, CsvError,
        ToCsvConfig, TIMESTAMP_FORMAT,
    };
}

/// Run one load cycle with `config`, bypassing any result caching.
pub fn load_all_data(config: &Config) -> Dataset {
    IncrementalLoader::new(config).load()
}

/// The `count` most recent records of `dataset`, most recent first.
pub fn get_latest(dataset: &Dataset, count: usize) -> Vec<Measurement> {
    dataset.latest(count)
}

/// Average `dataset` into `interval_minutes` wide buckets.
pub fn aggregate(dataset: &Dataset, interval_minutes: u32) -> Result<Vec<Bucket>, AggregateError> {
    aggregate_to_intervals(dataset.as_slice(), interval_minutes)
}

/// A loader plus the caller-side result cache, as a long-running consumer
/// holds them.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    loader: IncrementalLoader,
    results: ResultCache,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let loader = IncrementalLoader::new(&config);
        let results = ResultCache::new(config.result_ttl());
        Self {
            config,
            loader,
            results,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loader(&self) -> &IncrementalLoader {
        &self.loader
    }

    /// The current dataset, reloading if the held one has expired.
    pub fn load_all_data(&self) -> Arc<Dataset> {
        self.results.get_or_load(|| self.loader.load())
    }

    /// The `count` most recent records, most recent first.
    pub fn get_latest(&self, count: usize) -> Vec<Measurement> {
        self.load_all_data().latest(count)
    }

    /// Force the next read to run the loader.
    pub fn invalidate(&self) {
        log::info!("Result cache invalidated");
        self.results.invalidate();
    }

    /// Force the next read to rebuild the snapshot from every source file.
    pub fn clear_cache(&self) -> Result<bool, CacheError> {
        self.results.invalidate();
        self.loader.store().clear()
    }

    /// Time until the held dataset expires.
    pub fn time_until_refresh(&self) -> Option<Duration> {
        self.results.time_until_refresh()
    }
}
