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

//! The on-disk snapshot: location, atomic write, tolerant read.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use netzbremse_core::SourcedMeasurement;

use crate::error::Result;
use crate::from_parquet::from_parquet_bytes;
use crate::to_parquet::to_parquet_bytes;

/// Filename prefix of every snapshot.
pub const CACHE_FILE_PREFIX: &str = "speedtest_cache_";

/// Filename extension of every snapshot.
pub const CACHE_FILE_EXTENSION: &str = ".parquet";

/// Hex digits of the path hash kept in the filename.
const HASH_LEN: usize = 12;

/// Snapshot filename for a data directory.
///
/// The hash covers the path exactly as configured; `/data` and `/data/` are
/// different sources.
///
/// ```
/// use std::path::Path;
/// use netzbremse_parquet::cache_file_name;
///
/// let name = cache_file_name(Path::new("/data"));
/// assert!(name.starts_with("speedtest_cache_"));
/// assert!(name.ends_with(".parquet"));
/// assert_eq!(name, cache_file_name(Path::new("/data")));
/// assert_ne!(name, cache_file_name(Path::new("/srv/data")));
/// ```
pub fn cache_file_name(data_dir: &Path) -> String {
    let digest = Sha256::digest(data_dir.to_string_lossy().as_bytes());
    let hash = hex::encode(digest);
    format!("{}{}{}", CACHE_FILE_PREFIX, &hash[..HASH_LEN], CACHE_FILE_EXTENSION)
}

/// Full snapshot path for a data directory under `cache_dir`.
pub fn cache_location(cache_dir: &Path, data_dir: &Path) -> PathBuf {
    cache_dir.join(cache_file_name(data_dir))
}

/// Handle on one snapshot file.
///
/// The `try_*` methods report errors; [`read`](Self::read) and
/// [`write`](Self::write) log them and degrade instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the derived location for `data_dir`.
    pub fn for_data_dir(cache_dir: &Path, data_dir: &Path) -> Self {
        let path = cache_location(cache_dir, data_dir);
        log::debug!("Cache path for {}: {}", data_dir.display(), path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot; `Ok(None)` if no file exists.
    pub fn try_read(&self) -> Result<Option<Vec<SourcedMeasurement>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        from_parquet_bytes(&bytes).map(Some)
    }

    /// Read the snapshot, treating any failure as absent.
    pub fn read(&self) -> Option<Vec<SourcedMeasurement>> {
        match self.try_read() {
            Ok(Some(records)) => Some(records),
            Ok(None) => {
                log::info!("Cache miss: no snapshot at {}", self.path.display());
                None
            }
            Err(e) => {
                log::warn!("Cache corrupted, will rebuild: {}", e);
                None
            }
        }
    }

    /// Replace the snapshot atomically.
    ///
    /// The new content is written to a temporary file in the same directory
    /// and renamed over the old one, so a reader sees either the previous
    /// snapshot or the new one.
    pub fn try_write(&self, records: &[SourcedMeasurement]) -> Result<()> {
        let bytes = to_parquet_bytes(records)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.into_temp_path()
            .persist(&self.path)
            .map_err(|e| e.error)?;
        Ok(())
    }

    /// Replace the snapshot, logging failure. Returns whether it was written.
    pub fn write(&self, records: &[SourcedMeasurement]) -> bool {
        match self.try_write(records) {
            Ok(()) => {
                log::info!("Cache saved: {} records", records.len());
                true
            }
            Err(e) => {
                log::error!("Cache save failed (non-fatal): {}", e);
                false
            }
        }
    }

    /// Delete the snapshot. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Cache cleared: {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use netzbremse_core::{Measurement, Metric};
    use std::sync::Mutex;

    fn record(minute: u32) -> SourcedMeasurement {
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 8, minute, 0).unwrap();
        SourcedMeasurement::new(
            netzbremse_core::filename_for(ts),
            Measurement::new(ts).with_metric(Metric::Latency, f64::from(minute)),
        )
    }

    #[test]
    fn test_cache_file_name_shape() {
        let name = cache_file_name(Path::new("/data"));
        assert_eq!(name.len(), CACHE_FILE_PREFIX.len() + HASH_LEN + CACHE_FILE_EXTENSION.len());
        let hash = &name[CACHE_FILE_PREFIX.len()..CACHE_FILE_PREFIX.len() + HASH_LEN];
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    struct CaptureLog(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for CaptureLog {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLog = CaptureLog(Mutex::new(Vec::new()));

    /// Levels of captured lines containing `needle`. Shared by every test in
    /// this binary, so match on something unique.
    fn logged_levels(needle: &str) -> Vec<log::Level> {
        CAPTURE
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, line)| line.contains(needle))
            .map(|(level, _)| *level)
            .collect()
    }

    #[test]
    fn test_missing_snapshot_logged_as_info_miss() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("never-written.parquet"));
        assert!(store.read().is_none());

        let needle = store.path().display().to_string();
        let levels = logged_levels(&needle);
        assert!(levels.contains(&log::Level::Info), "{levels:?}");
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("absent.parquet"));
        assert!(store.try_read().unwrap().is_none());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::for_data_dir(dir.path(), Path::new("/data"));
        let records = vec![record(1), record(2)];
        assert!(store.write(&records));
        assert_eq!(store.read(), Some(records));
    }

    #[test]
    fn test_write_creates_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested").join("cache.parquet"));
        store.try_write(&[record(5)]).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache.parquet"));
        store.try_write(&[record(1)]).unwrap();
        store.try_write(&[record(1), record(2)]).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.read().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_corrupt_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache.parquet"));
        fs::write(store.path(), b"PAR1 definitely not parquet PAR1").unwrap();
        assert!(store.try_read().is_err());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_write_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the cache directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let store = CacheStore::new(blocker.join("cache.parquet"));
        assert!(!store.write(&[record(1)]));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache.parquet"));
        assert!(!store.clear().unwrap());
        store.try_write(&[record(3)]).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }
}
