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

//! The fixed metric table.
//!
//! Every result file carries up to eight named metrics in its `result`
//! section. Each metric has a JSON key, a display name, a unit and a
//! conversion applied once at parse time. Latency and jitter values are
//! already in milliseconds; throughput values are converted to Mbps according
//! to the configured [`ThroughputUnit`].

use std::fmt;
use std::str::FromStr;

/// Number of bits in one megabit (decimal, as used for line speeds).
pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// A named measurement metric.
///
/// The discriminant doubles as the column index into [`MetricValues`], so the
/// declaration order here is the canonical column order everywhere (cache,
/// CSV export, aggregation output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Download,
    Upload,
    Latency,
    Jitter,
    DownLoadedLatency,
    DownLoadedJitter,
    UpLoadedLatency,
    UpLoadedJitter,
}

impl Metric {
    /// Number of metrics in the table.
    pub const COUNT: usize = 8;

    /// All metrics in canonical column order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Download,
        Metric::Upload,
        Metric::Latency,
        Metric::Jitter,
        Metric::DownLoadedLatency,
        Metric::DownLoadedJitter,
        Metric::UpLoadedLatency,
        Metric::UpLoadedJitter,
    ];

    /// The primary metrics shown by default.
    pub const DEFAULTS: [Metric; 4] = [
        Metric::Download,
        Metric::Upload,
        Metric::Latency,
        Metric::Jitter,
    ];

    /// Column index of this metric.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The key used in the `result` section of a result file.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Download => "download",
            Metric::Upload => "upload",
            Metric::Latency => "latency",
            Metric::Jitter => "jitter",
            Metric::DownLoadedLatency => "downLoadedLatency",
            Metric::DownLoadedJitter => "downLoadedJitter",
            Metric::UpLoadedLatency => "upLoadedLatency",
            Metric::UpLoadedJitter => "upLoadedJitter",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Download => "Download",
            Metric::Upload => "Upload",
            Metric::Latency => "Latency",
            Metric::Jitter => "Jitter",
            Metric::DownLoadedLatency => "Loaded Latency (Down)",
            Metric::DownLoadedJitter => "Loaded Jitter (Down)",
            Metric::UpLoadedLatency => "Loaded Latency (Up)",
            Metric::UpLoadedJitter => "Loaded Jitter (Up)",
        }
    }

    /// Unit of the converted value.
    pub fn unit(self) -> Unit {
        match self {
            Metric::Download | Metric::Upload => Unit::Mbps,
            _ => Unit::Milliseconds,
        }
    }

    /// Look up a metric by its result-file key.
    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Convert a raw value from a result file into this metric's unit.
    pub fn convert(self, raw: f64, throughput: ThroughputUnit) -> f64 {
        match self.unit() {
            Unit::Mbps => throughput.to_mbps(raw),
            Unit::Milliseconds => raw,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Display unit of a converted metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mbps,
    Milliseconds,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Mbps => "Mbps",
            Unit::Milliseconds => "ms",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw unit of the `download` / `upload` fields as emitted by the measurement tool.
///
/// The upstream tool has been observed in both variants, so the factor is
/// configuration rather than a literal in the parser. Defaults to
/// [`ThroughputUnit::BitsPerSecond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThroughputUnit {
    /// Raw value is bits per second; divided by 1,000,000.
    #[default]
    BitsPerSecond,
    /// Raw value is bytes per second; multiplied by 8 then divided by 1,000,000.
    BytesPerSecond,
}

impl ThroughputUnit {
    /// Convert a raw throughput value to Mbps.
    #[inline]
    pub fn to_mbps(self, raw: f64) -> f64 {
        match self {
            ThroughputUnit::BitsPerSecond => raw / BITS_PER_MEGABIT,
            ThroughputUnit::BytesPerSecond => raw * 8.0 / BITS_PER_MEGABIT,
        }
    }
}

impl FromStr for ThroughputUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bits" | "bps" | "bits_per_second" => Ok(ThroughputUnit::BitsPerSecond),
            "bytes" | "bytes_per_second" => Ok(ThroughputUnit::BytesPerSecond),
            other => Err(format!(
                "unknown throughput unit '{}' (expected 'bits' or 'bytes')",
                other
            )),
        }
    }
}

/// Per-metric values of one row; absent metrics are `None`, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricValues([Option<f64>; Metric::COUNT]);

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0[metric.index()]
    }

    #[inline]
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.0[metric.index()] = value;
    }

    /// Metrics that carry a value, with their values, in column order.
    pub fn present(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|v| (m, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MetricValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        for (metric, value) in self.present() {
            map.serialize_entry(metric.key(), &value)?;
        }
        map.end()
    }
}
