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

//! Bounded parallel parsing of result files.
//!
//! [`parallel_map`] is the generic part: a fixed-width rayon pool over
//! independent tasks. [`FileLoader`] applies it to the record parser and
//! tallies outcomes.
//!
//! # Worker Count
//!
//! The pool is `min(max_workers, tasks)` wide, so a batch of three new files
//! spawns three threads and a cold start over ten thousand files is capped.
//! Batches of one run on the calling thread.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use netzbremse_core::{Outcome, RecordParser, SourcedMeasurement};

/// Width of the pool for `tasks` items under a cap of `max_workers`.
pub fn worker_count(max_workers: usize, tasks: usize) -> usize {
    max_workers.max(1).min(tasks)
}

/// Apply `f` to every task on a pool of at most `max_workers` threads.
///
/// Tasks run independently; a failure in one (expressed through
/// `R`) never affects another. Results are collected in task order, but
/// callers must not rely on completion order.
///
/// # Examples
///
/// ```
/// use netzbremse::parallel_map;
///
/// let squares = parallel_map((1..=5).collect(), 2, |n: u64| n * n);
/// assert_eq!(squares.iter().sum::<u64>(), 55);
///
/// let checked: Vec<Result<u32, String>> = parallel_map(vec![1, 0, 4], 8, |d: u32| {
///     100u32.checked_div(d).ok_or_else(|| "division by zero".to_string())
/// });
/// assert_eq!(checked.iter().filter(|r| r.is_err()).count(), 1);
/// ```
pub fn parallel_map<T, R, F>(tasks: Vec<T>, max_workers: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    let width = worker_count(max_workers, tasks.len());
    if width <= 1 {
        return tasks.into_iter().map(f).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(width)
        .thread_name(|i| format!("netzbremse-worker-{}", i))
        .build()
    {
        Ok(pool) => pool.install(|| tasks.into_par_iter().map(&f).collect()),
        Err(e) => {
            log::warn!("Worker pool unavailable ({}), parsing serially", e);
            tasks.into_iter().map(f).collect()
        }
    }
}

/// Outcome tallies of one batch.
///
/// Uses atomic counters so workers can record concurrently.
#[derive(Debug, Default)]
struct OutcomeCounter {
    parsed: AtomicUsize,
    expected: AtomicUsize,
    malformed: AtomicUsize,
    environment: AtomicUsize,
}

impl OutcomeCounter {
    fn record(&self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Parsed(_) => &self.parsed,
            Outcome::SkippedExpected(_) => &self.expected,
            Outcome::SkippedMalformed(_) => &self.malformed,
            Outcome::SkippedEnvironmentError(_) => &self.environment,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> (usize, usize, usize, usize) {
        (
            self.parsed.load(Ordering::Relaxed),
            self.expected.load(Ordering::Relaxed),
            self.malformed.load(Ordering::Relaxed),
            self.environment.load(Ordering::Relaxed),
        )
    }
}

/// Result of parsing one batch of files.
#[derive(Debug, Clone, Default)]
pub struct BatchResults {
    /// Successfully parsed records, in no particular order.
    pub records: Vec<SourcedMeasurement>,
    /// Files handed to the parser.
    pub attempted: usize,
    /// Files skipped as failed or incomplete runs.
    pub skipped_expected: usize,
    /// Files skipped for a naming or content violation.
    pub skipped_malformed: usize,
    /// Files that could not be read.
    pub environment_errors: usize,
    pub elapsed: Duration,
}

impl BatchResults {
    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped_expected + self.skipped_malformed + self.environment_errors
    }
}

/// Parses batches of result files on a bounded worker pool.
#[derive(Debug, Clone, Copy)]
pub struct FileLoader {
    parser: RecordParser,
    max_workers: usize,
}

impl FileLoader {
    pub fn new(parser: RecordParser, max_workers: usize) -> Self {
        Self {
            parser,
            max_workers,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Parse every file in `paths`, keeping the successes.
    pub fn load(&self, paths: Vec<PathBuf>) -> BatchResults {
        let start = Instant::now();
        let attempted = paths.len();
        if attempted == 0 {
            return BatchResults::default();
        }

        let counter = OutcomeCounter::default();
        let parser = self.parser;
        let outcomes = parallel_map(paths, self.max_workers, |path| {
            let outcome = parser.classify(&path);
            counter.record(&outcome);
            outcome
        });

        let records: Vec<SourcedMeasurement> =
            outcomes.into_iter().filter_map(Outcome::into_record).collect();
        let (_, expected, malformed, environment) = counter.snapshot();
        let elapsed = start.elapsed();

        let results = BatchResults {
            records,
            attempted,
            skipped_expected: expected,
            skipped_malformed: malformed,
            environment_errors: environment,
            elapsed,
        };
        log::info!(
            "Parallel load complete: {} successful, {} skipped/failed ({:.1} ms)",
            results.success_count(),
            results.skip_count(),
            elapsed.as_secs_f64() * 1000.0
        );
        results
    }
}
