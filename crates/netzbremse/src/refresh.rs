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

//! Caller-side result holder with a time-to-live.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use netzbremse_core::Dataset;

#[derive(Debug)]
struct Held {
    dataset: Arc<Dataset>,
    computed_at: Instant,
}

/// Holds the last loaded dataset for a fixed TTL.
///
/// Reads within the TTL return the held value without running the loader.
/// Expiry or [`invalidate`](Self::invalidate) makes the next read reload.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use netzbremse::ResultCache;
/// use netzbremse_core::Dataset;
///
/// let cache = ResultCache::new(Duration::from_secs(55));
/// let mut loads = 0;
/// cache.get_or_load(|| { loads += 1; Dataset::new() });
/// cache.get_or_load(|| { loads += 1; Dataset::new() });
/// assert_eq!(loads, 1);
///
/// cache.invalidate();
/// cache.get_or_load(|| { loads += 1; Dataset::new() });
/// assert_eq!(loads, 2);
/// ```
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    held: Mutex<Option<Held>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            held: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The held dataset if still fresh, otherwise the result of `load`.
    ///
    /// The lock is held while `load` runs, so concurrent callers wait for
    /// one load instead of starting their own.
    pub fn get_or_load<F>(&self, load: F) -> Arc<Dataset>
    where
        F: FnOnce() -> Dataset,
    {
        self.get_or_load_at(Instant::now(), load)
    }

    fn get_or_load_at<F>(&self, now: Instant, load: F) -> Arc<Dataset>
    where
        F: FnOnce() -> Dataset,
    {
        let mut held = self.lock();
        if let Some(h) = held.as_ref() {
            if now.saturating_duration_since(h.computed_at) < self.ttl {
                return Arc::clone(&h.dataset);
            }
        }

        let dataset = Arc::new(load());
        *held = Some(Held {
            dataset: Arc::clone(&dataset),
            computed_at: now,
        });
        dataset
    }

    /// The held dataset without loading, if still fresh.
    pub fn peek(&self) -> Option<Arc<Dataset>> {
        let now = Instant::now();
        self.lock()
            .as_ref()
            .filter(|h| now.saturating_duration_since(h.computed_at) < self.ttl)
            .map(|h| Arc::clone(&h.dataset))
    }

    /// Drop the held dataset.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Time left before the held dataset expires; `None` if nothing is held.
    pub fn time_until_refresh(&self) -> Option<Duration> {
        self.time_until_refresh_at(Instant::now())
    }

    fn time_until_refresh_at(&self, now: Instant) -> Option<Duration> {
        self.lock().as_ref().map(|h| {
            self.ttl
                .saturating_sub(now.saturating_duration_since(h.computed_at))
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Held>> {
        // A panicking loader leaves the previous value intact
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use netzbremse_core::Measurement;

    fn one_row() -> Dataset {
        Dataset::from_unsorted(vec![Measurement::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )])
    }

    #[test]
    fn test_expiry() {
        let cache = ResultCache::new(Duration::from_secs(55));
        let t0 = Instant::now();

        let first = cache.get_or_load_at(t0, one_row);
        assert_eq!(first.len(), 1);

        let held = cache.get_or_load_at(t0 + Duration::from_secs(54), Dataset::new);
        assert_eq!(held.len(), 1);

        let reloaded = cache.get_or_load_at(t0 + Duration::from_secs(55), Dataset::new);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_time_until_refresh() {
        let cache = ResultCache::new(Duration::from_secs(30));
        let t0 = Instant::now();
        assert_eq!(cache.time_until_refresh_at(t0), None);

        cache.get_or_load_at(t0, Dataset::new);
        assert_eq!(
            cache.time_until_refresh_at(t0 + Duration::from_secs(10)),
            Some(Duration::from_secs(20))
        );
        assert_eq!(
            cache.time_until_refresh_at(t0 + Duration::from_secs(90)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let cache = ResultCache::new(Duration::from_secs(3600));
        cache.get_or_load(one_row);
        assert!(cache.peek().is_some());

        cache.invalidate();
        assert!(cache.peek().is_none());
        assert!(cache.get_or_load(Dataset::new).is_empty());
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(3600)));
        cache.get_or_load(one_row);

        let c = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            c.get_or_load_at(Instant::now() + Duration::from_secs(7200), || {
                panic!("loader failed")
            });
        })
        .join();

        assert_eq!(cache.peek().map(|d| d.len()), Some(1));
    }
}
