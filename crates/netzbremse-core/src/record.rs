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

//! Measurement records and the canonical dataset.
//!
//! Two record shapes exist:
//!
//! - [`SourcedMeasurement`]: a record plus the name of the file it came
//!   from. This is what the parser produces and what the cache persists; the
//!   source name is how the incremental loader knows which files are new.
//! - [`Measurement`]: the outward-facing record, without the source name.
//!
//! A [`Dataset`] is a sequence of [`Measurement`]s that is always sorted
//! ascending by timestamp. Every constructor sorts, so the invariant cannot
//! be broken from outside.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::metric::{Metric, MetricValues};

/// Age of the newest record after which a dataset counts as stale.
pub const STALE_AFTER: Duration = Duration::from_secs(2 * 60 * 60);

/// One normalized speed test result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Measurement {
    /// Instant the test ran, decoded from the filename.
    pub timestamp: DateTime<Utc>,
    /// Opaque session identifier (`sessionID` in the result file).
    #[cfg_attr(feature = "serde", serde(rename = "sessionID"))]
    pub session_id: Option<String>,
    /// Opaque endpoint identifier.
    pub endpoint: Option<String>,
    /// Converted metric values.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: MetricValues,
}

impl Measurement {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            session_id: None,
            endpoint: None,
            metrics: MetricValues::new(),
        }
    }

    /// Builder-style setter for a metric value.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.set(metric, Some(value));
        self
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric)
    }
}

/// A measurement together with the name of the file that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedMeasurement {
    /// Filename (not path) of the originating result file.
    pub source_file: String,
    pub measurement: Measurement,
}

impl SourcedMeasurement {
    pub fn new(source_file: impl Into<String>, measurement: Measurement) -> Self {
        Self {
            source_file: source_file.into(),
            measurement,
        }
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.measurement.timestamp
    }
}

/// Sort sourced records into canonical order.
///
/// Ascending by timestamp; ties are broken by source filename so that the
/// order does not depend on how the records arrived.
pub fn sort_sourced(records: &mut [SourcedMeasurement]) {
    records.sort_by(|a, b| {
        a.timestamp()
            .cmp(&b.timestamp())
            .then_with(|| a.source_file.cmp(&b.source_file))
    });
}

/// The canonical, timestamp-ordered dataset handed to consumers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Dataset {
    rows: Vec<Measurement>,
}

impl Dataset {
    /// An empty dataset ("no data yet").
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from rows in any order.
    pub fn from_unsorted(mut rows: Vec<Measurement>) -> Self {
        rows.sort_by_key(|m| m.timestamp);
        Self { rows }
    }

    /// Build the outward dataset from sourced records, dropping `source_file`.
    pub fn from_sourced(mut records: Vec<SourcedMeasurement>) -> Self {
        sort_sourced(&mut records);
        Self {
            rows: records.into_iter().map(|r| r.measurement).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn into_vec(self) -> Vec<Measurement> {
        self.rows
    }

    /// The most recent `count` records, most recent first.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use netzbremse_core::{Dataset, Measurement};
    ///
    /// let rows = (0..10)
    ///     .map(|h| Measurement::new(Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()))
    ///     .collect();
    /// let dataset = Dataset::from_unsorted(rows);
    ///
    /// let latest = dataset.latest(3);
    /// assert_eq!(latest.len(), 3);
    /// assert_eq!(latest[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    /// ```
    pub fn latest(&self, count: usize) -> Vec<Measurement> {
        self.rows.iter().rev().take(count).cloned().collect()
    }

    /// Records whose UTC date lies in `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Dataset {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|m| {
                    let day = m.timestamp.date_naive();
                    day >= start && day <= end
                })
                .cloned()
                .collect(),
        }
    }

    /// Timestamps of the oldest and newest record.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Time elapsed between the newest record and `now`.
    ///
    /// `None` for an empty dataset; zero if the newest record lies in the future.
    pub fn staleness(&self, now: DateTime<Utc>) -> Option<Duration> {
        let newest = self.rows.last()?.timestamp;
        Some((now - newest).to_std().unwrap_or(Duration::ZERO))
    }

    /// Whether the newest record is older than [`STALE_AFTER`].
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.staleness(now).is_some_and(|age| age > STALE_AFTER)
    }

    /// Metrics with at least one value in the dataset, in column order.
    pub fn present_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| self.rows.iter().any(|row| row.get(*m).is_some()))
            .collect()
    }

    /// Whether any record carries a session or endpoint identifier.
    pub fn has_identifiers(&self) -> (bool, bool) {
        (
            self.rows.iter().any(|m| m.session_id.is_some()),
            self.rows.iter().any(|m| m.endpoint.is_some()),
        )
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Measurement> for Dataset {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}
