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

//! Fixed-width interval aggregation.
//!
//! Each measurement run produces several data points a few seconds apart.
//! [`aggregate_to_intervals`] groups records into buckets of
//! `interval_minutes` and averages every metric per bucket, which gives one
//! point per run for charting.
//!
//! Bucket starts are aligned to the Unix epoch, so `floor(t, 10min)` for
//! `10:37:12` is `10:30:00` regardless of what else is in the input.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::AggregateError;
use crate::metric::{Metric, MetricValues};
use crate::record::Measurement;

/// One aggregated interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bucket {
    /// Start of the interval (inclusive).
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub start: DateTime<Utc>,
    /// Number of records that fell into the interval.
    pub count: usize,
    /// Mean of the non-null values of each metric; absent if no record in
    /// the bucket had the metric.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: MetricValues,
}

impl Bucket {
    #[inline]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(metric)
    }
}

impl From<Bucket> for Measurement {
    fn from(bucket: Bucket) -> Self {
        Measurement {
            timestamp: bucket.start,
            session_id: None,
            endpoint: None,
            metrics: bucket.metrics,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    rows: usize,
    sums: [f64; Metric::COUNT],
    counts: [usize; Metric::COUNT],
}

impl Accumulator {
    fn add(&mut self, values: &MetricValues) {
        self.rows += 1;
        for (metric, value) in values.present() {
            self.sums[metric.index()] += value;
            self.counts[metric.index()] += 1;
        }
    }

    fn finish(self, start: DateTime<Utc>) -> Bucket {
        let mut metrics = MetricValues::new();
        for metric in Metric::ALL {
            let i = metric.index();
            if self.counts[i] > 0 {
                metrics.set(metric, Some(self.sums[i] / self.counts[i] as f64));
            }
        }
        Bucket {
            start,
            count: self.rows,
            metrics,
        }
    }
}

/// Start of the `width_ms` bucket containing `timestamp`.
fn floor_millis(timestamp: DateTime<Utc>, width_ms: i64) -> i64 {
    timestamp.timestamp_millis().div_euclid(width_ms) * width_ms
}

/// Bucket records into `interval_minutes` wide intervals and average each metric.
///
/// Output is sorted ascending by bucket start. Input order does not matter.
/// An empty input yields an empty output.
///
/// # Errors
///
/// Returns [`AggregateError::ZeroInterval`] if `interval_minutes` is zero.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use netzbremse_core::{aggregate_to_intervals, Measurement, Metric};
///
/// let t = |m| Utc.with_ymd_and_hms(2024, 1, 15, 10, m, 0).unwrap();
/// let rows = vec![
///     Measurement::new(t(0)).with_metric(Metric::Download, 10.0),
///     Measurement::new(t(3)).with_metric(Metric::Download, 20.0),
///     Measurement::new(t(7)).with_metric(Metric::Download, 30.0),
/// ];
///
/// let buckets = aggregate_to_intervals(&rows, 10).unwrap();
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets[0].start, t(0));
/// assert_eq!(buckets[0].get(Metric::Download), Some(20.0));
/// ```
pub fn aggregate_to_intervals(
    rows: &[Measurement],
    interval_minutes: u32,
) -> Result<Vec<Bucket>, AggregateError> {
    if interval_minutes == 0 {
        return Err(AggregateError::ZeroInterval);
    }
    if rows.is_empty() {
        log::debug!("Aggregation skipped: empty dataset");
        return Ok(Vec::new());
    }

    let width_ms = i64::from(interval_minutes) * 60_000;
    let mut buckets: BTreeMap<i64, Accumulator> = BTreeMap::new();
    for row in rows {
        buckets
            .entry(floor_millis(row.timestamp, width_ms))
            .or_default()
            .add(&row.metrics);
    }

    let out: Vec<Bucket> = buckets
        .into_iter()
        .filter_map(|(start_ms, acc)| {
            DateTime::from_timestamp_millis(start_ms).map(|start| acc.finish(start))
        })
        .collect();

    log::debug!(
        "Aggregated {} records into {} intervals ({}-min buckets)",
        rows.len(),
        out.len(),
        interval_minutes
    );
    Ok(out)
}
