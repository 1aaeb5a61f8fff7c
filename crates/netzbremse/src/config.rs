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

//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATA_DIR` | `/data` |
//! | `REFRESH_INTERVAL_SECONDS` | `60` |
//! | `LOG_LEVEL` | `info` |
//! | `THROUGHPUT_UNIT` | `bits` |
//! | `CACHE_DIR` | system temp dir |
//! | `MAX_WORKERS` | `32` |
//!
//! An unparseable value falls back to its default with a warning; reading
//! the configuration never fails.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use netzbremse_core::{RecordParser, ThroughputUnit};
use netzbremse_parquet::{cache_location, CacheStore};

pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const ENV_REFRESH_INTERVAL: &str = "REFRESH_INTERVAL_SECONDS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_THROUGHPUT_UNIT: &str = "THROUGHPUT_UNIT";
pub const ENV_CACHE_DIR: &str = "CACHE_DIR";
pub const ENV_MAX_WORKERS: &str = "MAX_WORKERS";

pub const DEFAULT_DATA_DIR: &str = "/data";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_WORKERS: usize = 32;

/// Floor of the caller-side result TTL.
pub const MIN_RESULT_TTL: Duration = Duration::from_secs(5);

/// Margin by which the result TTL undercuts the refresh interval.
const TTL_MARGIN: Duration = Duration::from_secs(5);

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory scanned for result files.
    pub data_dir: PathBuf,
    /// Expected re-scan interval of the caller.
    pub refresh_interval: Duration,
    /// Diagnostic verbosity.
    pub log_level: LevelFilter,
    /// Raw unit of the throughput fields.
    pub throughput_unit: ThroughputUnit,
    /// Directory holding cache snapshots.
    pub cache_dir: PathBuf,
    /// Upper bound on parser worker threads.
    pub max_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            log_level: LevelFilter::Info,
            throughput_unit: ThroughputUnit::default(),
            cache_dir: std::env::temp_dir(),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], but returns the fallback warnings instead
    /// of logging them, for callers that set up logging from the result.
    pub fn from_env_with_warnings() -> (Self, Vec<String>) {
        Self::from_lookup_with_warnings(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// ```
    /// use std::time::Duration;
    /// use netzbremse::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "DATA_DIR" => Some("/srv/speedtest".to_string()),
    ///     "REFRESH_INTERVAL_SECONDS" => Some("300".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.data_dir.to_str(), Some("/srv/speedtest"));
    /// assert_eq!(config.result_ttl(), Duration::from_secs(295));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, warnings) = Self::from_lookup_with_warnings(lookup);
        for warning in warnings {
            log::warn!("{}", warning);
        }
        config
    }

    /// Read the configuration through `lookup`, returning one message per
    /// value that fell back to its default.
    pub fn from_lookup_with_warnings<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut warnings = Vec::new();

        let refresh_interval = parse_or_default(
            ENV_REFRESH_INTERVAL,
            value(ENV_REFRESH_INTERVAL),
            defaults.refresh_interval,
            |s| s.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| e.to_string()),
            &mut warnings,
        );
        let log_level = parse_or_default(
            ENV_LOG_LEVEL,
            value(ENV_LOG_LEVEL),
            defaults.log_level,
            parse_log_level,
            &mut warnings,
        );
        let throughput_unit = parse_or_default(
            ENV_THROUGHPUT_UNIT,
            value(ENV_THROUGHPUT_UNIT),
            defaults.throughput_unit,
            ThroughputUnit::from_str,
            &mut warnings,
        );
        let max_workers = parse_or_default(
            ENV_MAX_WORKERS,
            value(ENV_MAX_WORKERS),
            defaults.max_workers,
            |s| match s.trim().parse::<usize>() {
                Ok(0) => Err("must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(e) => Err(e.to_string()),
            },
            &mut warnings,
        );

        let config = Self {
            data_dir: value(ENV_DATA_DIR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            cache_dir: value(ENV_CACHE_DIR).map(PathBuf::from).unwrap_or(defaults.cache_dir),
            refresh_interval,
            log_level,
            throughput_unit,
            max_workers,
        };
        (config, warnings)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// How long a caller may hold a loaded dataset before reloading:
    /// five seconds under the refresh interval, but never below five seconds.
    pub fn result_ttl(&self) -> Duration {
        self.refresh_interval
            .saturating_sub(TTL_MARGIN)
            .max(MIN_RESULT_TTL)
    }

    /// Snapshot path for the configured data directory.
    pub fn cache_path(&self) -> PathBuf {
        cache_location(&self.cache_dir, &self.data_dir)
    }

    pub fn cache_store(&self) -> CacheStore {
        CacheStore::for_data_dir(&self.cache_dir, &self.data_dir)
    }

    pub fn parser(&self) -> RecordParser {
        RecordParser::new(self.throughput_unit)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Parse a log level name, also accepting `warning` and `critical`.
pub fn parse_log_level(s: &str) -> Result<LevelFilter, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "warning" => Ok(LevelFilter::Warn),
        "critical" | "fatal" => Ok(LevelFilter::Error),
        other => LevelFilter::from_str(other).map_err(|_| format!("unknown log level '{}'", s)),
    }
}

fn parse_or_default<T, E, P>(
    key: &str,
    raw: Option<String>,
    default: T,
    parse: P,
    warnings: &mut Vec<String>,
) -> T
where
    T: std::fmt::Debug,
    E: std::fmt::Display,
    P: Fn(&str) -> Result<T, E>,
{
    let Some(raw) = raw else {
        return default;
    };
    match parse(&raw) {
        Ok(v) => v,
        Err(e) => {
            warnings.push(format!(
                "Invalid {}={:?} ({}), using default {:?}",
                key, raw, e, default
            ));
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.throughput_unit, ThroughputUnit::BitsPerSecond);
        assert_eq!(config.max_workers, 32);
        assert_eq!(config.cache_dir, std::env::temp_dir());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATA_DIR", "/srv/results"),
            ("REFRESH_INTERVAL_SECONDS", "120"),
            ("LOG_LEVEL", "WARNING"),
            ("THROUGHPUT_UNIT", "bytes"),
            ("CACHE_DIR", "/var/cache/netzbremse"),
            ("MAX_WORKERS", "4"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/results"));
        assert_eq!(config.refresh_interval, Duration::from_secs(120));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.throughput_unit, ThroughputUnit::BytesPerSecond);
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/netzbremse"));
        assert_eq!(config.max_workers, 4);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("REFRESH_INTERVAL_SECONDS", "soon"),
            ("LOG_LEVEL", "chatty"),
            ("THROUGHPUT_UNIT", "furlongs"),
            ("MAX_WORKERS", "0"),
            ("DATA_DIR", "   "),
        ]);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_fallback_warnings_are_returned() {
        let (config, warnings) = Config::from_lookup_with_warnings(|key| match key {
            "MAX_WORKERS" => Some("zero".to_string()),
            "LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Invalid MAX_WORKERS=\"zero\""));
        assert!(warnings[0].ends_with("using default 32"));
    }

    #[test]
    fn test_result_ttl() {
        let ttl = |secs| Config {
            refresh_interval: Duration::from_secs(secs),
            ..Config::default()
        }
        .result_ttl();
        assert_eq!(ttl(60), Duration::from_secs(55));
        assert_eq!(ttl(10), Duration::from_secs(5));
        assert_eq!(ttl(7), Duration::from_secs(5));
        assert_eq!(ttl(0), Duration::from_secs(5));
    }

    #[test]
    fn test_cache_path_depends_on_data_dir() {
        let a = Config::default().with_cache_dir("/tmp/c").with_data_dir("/data/a");
        let b = a.clone().with_data_dir("/data/b");
        assert_ne!(a.cache_path(), b.cache_path());
        assert_eq!(a.cache_path(), a.clone().cache_path());
        assert!(a.cache_path().starts_with("/tmp/c"));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(parse_log_level("INFO"), Ok(LevelFilter::Info));
        assert_eq!(parse_log_level("critical"), Ok(LevelFilter::Error));
        assert!(parse_log_level("loud").is_err());
    }
}
