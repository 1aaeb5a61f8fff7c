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

//! The incremental loader.
//!
//! Each call to [`IncrementalLoader::load`] runs the full cycle and keeps no
//! state between calls apart from the on-disk snapshot:
//!
//! 1. Missing data directory: empty dataset.
//! 2. Discover `speedtest-*.json` files. None: empty dataset.
//! 3. Read the snapshot.
//! 4. Snapshot present and non-empty: parse only files whose names are not
//!    in it. Nothing new returns the snapshot untouched; otherwise merge,
//!    sort, persist.
//! 5. Snapshot absent or empty: parse everything. Zero records returns an
//!    empty dataset without writing; otherwise sort, persist.
//!
//! A file is identified by its name alone. Once cached it is never parsed
//! again, even if its content later changes.
//!
//! Two loaders must not run against the same snapshot at the same time;
//! callers serialize invocations.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use netzbremse_core::{is_result_file_name, sort_sourced, Dataset, SourcedMeasurement};
use netzbremse_parquet::CacheStore;

use crate::batch::FileLoader;
use crate::config::Config;

/// Counters describing one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Result files found in the data directory.
    pub discovered: usize,
    /// Records read from the snapshot.
    pub cached: usize,
    /// Discovered files not represented in the snapshot.
    pub new_files: usize,
    /// Files handed to the parser.
    pub parsed: usize,
    /// Parsed files that did not yield a record.
    pub skipped: usize,
    /// Records in the returned dataset.
    pub records: usize,
    /// Whether a non-empty snapshot was used.
    pub cache_hit: bool,
    /// Whether the snapshot was rewritten successfully.
    pub cache_written: bool,
}

/// Runs the discover / diff / parse / merge / persist cycle.
#[derive(Debug, Clone)]
pub struct IncrementalLoader {
    data_dir: PathBuf,
    store: CacheStore,
    files: FileLoader,
}

impl IncrementalLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            store: config.cache_store(),
            files: FileLoader::new(config.parser(), config.max_workers),
        }
    }

    /// Loader with an explicit snapshot location.
    pub fn with_store(data_dir: impl Into<PathBuf>, store: CacheStore, files: FileLoader) -> Self {
        Self {
            data_dir: data_dir.into(),
            store,
            files,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Run one cycle and return the outward dataset.
    pub fn load(&self) -> Dataset {
        self.load_with_report().0
    }

    /// Run one cycle, also returning what it did.
    pub fn load_with_report(&self) -> (Dataset, LoadReport) {
        let start = Instant::now();
        log::info!("Loading speedtest data from {}", self.data_dir.display());

        let mut report = LoadReport::default();
        let dataset = self.run(&mut report);
        report.records = dataset.len();

        log::info!(
            "Load complete: {} records ({:.1} ms)",
            report.records,
            start.elapsed().as_secs_f64() * 1000.0
        );
        (dataset, report)
    }

    fn run(&self, report: &mut LoadReport) -> Dataset {
        let Some(discovered) = self.discover() else {
            return Dataset::new();
        };
        report.discovered = discovered.len();
        if discovered.is_empty() {
            log::warn!("No speedtest files found in {}", self.data_dir.display());
            return Dataset::new();
        }
        log::info!("Found {} speedtest files", discovered.len());

        match self.store.read() {
            Some(cached) if !cached.is_empty() => self.merge(cached, discovered, report),
            _ => self.cold_start(discovered, report),
        }
    }

    fn merge(
        &self,
        mut cached: Vec<SourcedMeasurement>,
        discovered: Vec<(String, PathBuf)>,
        report: &mut LoadReport,
    ) -> Dataset {
        report.cache_hit = true;
        report.cached = cached.len();

        let known: HashSet<&str> = cached.iter().map(|r| r.source_file.as_str()).collect();
        let new_paths: Vec<PathBuf> = discovered
            .into_iter()
            .filter(|(name, _)| !known.contains(name.as_str()))
            .map(|(_, path)| path)
            .collect();
        report.new_files = new_paths.len();

        if new_paths.is_empty() {
            log::info!("Cache hit: {} records, no new files", cached.len());
            return Dataset::from_sourced(cached);
        }
        log::info!(
            "Cache hit: {} cached records, {} new files to load",
            cached.len(),
            new_paths.len()
        );

        let batch = self.files.load(new_paths);
        report.parsed = batch.attempted;
        report.skipped = batch.skip_count();

        if batch.records.is_empty() {
            // Nothing to persist; the skipped files will be retried next cycle
            return Dataset::from_sourced(cached);
        }

        let added = batch.records.len();
        cached.extend(batch.records);
        sort_sourced(&mut cached);
        log::info!("Merged {} new records, {} total", added, cached.len());

        report.cache_written = self.store.write(&cached);
        Dataset::from_sourced(cached)
    }

    fn cold_start(&self, discovered: Vec<(String, PathBuf)>, report: &mut LoadReport) -> Dataset {
        log::info!("Building cache from scratch (cold start)");
        report.new_files = discovered.len();

        let batch = self
            .files
            .load(discovered.into_iter().map(|(_, path)| path).collect());
        report.parsed = batch.attempted;
        report.skipped = batch.skip_count();

        let mut records = batch.records;
        if records.is_empty() {
            log::warn!("No valid records found in {}", self.data_dir.display());
            return Dataset::new();
        }

        sort_sourced(&mut records);
        report.cache_written = self.store.write(&records);
        Dataset::from_sourced(records)
    }

    /// Result files in the data directory as `(name, path)`, sorted by name.
    ///
    /// `None` if the directory cannot be listed.
    fn discover(&self) -> Option<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Data directory does not exist: {}", self.data_dir.display());
                return None;
            }
            Err(e) => {
                log::warn!("Cannot list data directory {}: {}", self.data_dir.display(), e);
                return None;
            }
        };

        let mut files: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(raw) => {
                        let lossy = raw.to_string_lossy();
                        if is_result_file_name(&lossy) {
                            log::warn!("Skipping non-UTF-8 file name: {}", lossy);
                        }
                        return None;
                    }
                };
                let path = entry.path();
                (is_result_file_name(&name) && path.is_file()).then_some((name, path))
            })
            .collect();
        files.sort();
        Some(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netzbremse_core::RecordParser;
    use netzbremse_test::fixtures::{self, FixtureDir, ResultFileBuilder};

    fn loader_for(dir: &Path, cache: &Path) -> IncrementalLoader {
        IncrementalLoader::with_store(
            dir,
            CacheStore::new(cache.join("cache.parquet")),
            FileLoader::new(RecordParser::default(), 4),
        )
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let cache = tempfile::tempdir().unwrap();
        let loader = loader_for(&cache.path().join("nope"), cache.path());
        let (dataset, report) = loader.load_with_report();
        assert!(dataset.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_file_as_data_dir_is_empty() {
        let cache = tempfile::tempdir().unwrap();
        let not_a_dir = cache.path().join("plain");
        fs::write(&not_a_dir, b"").unwrap();
        assert!(loader_for(&not_a_dir, cache.path()).load().is_empty());
    }

    #[test]
    fn test_discovery_filters_names_and_directories() {
        let dir = FixtureDir::new();
        let cache = tempfile::tempdir().unwrap();
        dir.write_result(fixtures::base_time(), &ResultFileBuilder::complete());
        dir.write_raw("notes.txt", "hello");
        dir.write_raw("speedtest-latest.json", "{}");
        fs::create_dir(dir.path().join("speedtest-dir.json")).unwrap();

        let names: Vec<String> = loader_for(dir.path(), cache.path())
            .discover()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "speedtest-2024-01-15T10-00-00-000Z.json".to_string(),
                "speedtest-latest.json".to_string(),
            ]
        );
    }

    #[test]
    fn test_leap_second_name_skipped_on_every_run() {
        let dir = FixtureDir::new();
        let cache = tempfile::tempdir().unwrap();
        dir.write_result(fixtures::base_time(), &ResultFileBuilder::complete());
        dir.write_raw(
            "speedtest-2024-01-15T10-30-60-000Z.json",
            &ResultFileBuilder::complete().build(),
        );

        let loader = loader_for(dir.path(), cache.path());
        let (first, cold) = loader.load_with_report();
        let (second, warm) = loader.load_with_report();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first.as_slice()[0].timestamp, fixtures::base_time());
        assert_eq!(cold.skipped, 1);
        assert!(warm.cache_hit);
        assert_eq!(warm.parsed, 1);
        assert_eq!(warm.skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_not_discovered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = FixtureDir::new();
        let cache = tempfile::tempdir().unwrap();
        dir.write_result(fixtures::base_time(), &ResultFileBuilder::complete());
        let raw = OsStr::from_bytes(b"speedtest-\xff.json");
        if fs::write(dir.path().join(raw), b"{}").is_err() {
            // filesystem refuses non-UTF-8 names
            return;
        }

        let found = loader_for(dir.path(), cache.path()).discover().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "speedtest-2024-01-15T10-00-00-000Z.json");
    }

    #[test]
    fn test_all_files_skipped_writes_no_cache() {
        let dir = FixtureDir::new();
        let cache = tempfile::tempdir().unwrap();
        dir.write_result(fixtures::base_time(), &ResultFileBuilder::failed());

        let loader = loader_for(dir.path(), cache.path());
        let (dataset, report) = loader.load_with_report();
        assert!(dataset.is_empty());
        assert_eq!(report.parsed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.cache_written);
        assert!(!loader.store().path().exists());
    }
}
