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

//! Builder for result-file JSON documents.

use serde_json::{json, Map, Value};

/// Builder for the JSON content of one result file.
///
/// Metric values are given in the raw units the measurement tool writes:
/// bits per second for throughput, milliseconds for latency and jitter.
///
/// # Examples
///
/// ```
/// use netzbremse_test::ResultFileBuilder;
///
/// let json = ResultFileBuilder::new()
///     .metric("download", 100_000_000.0)
///     .session("abc")
///     .build();
///
/// assert!(json.contains("\"success\":true"));
/// assert!(json.contains("\"sessionID\":\"abc\""));
/// ```
#[derive(Debug, Clone)]
pub struct ResultFileBuilder {
    success: Option<Value>,
    result: Option<Map<String, Value>>,
    session_id: Option<String>,
    endpoint: Option<String>,
}

impl Default for ResultFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFileBuilder {
    /// A successful run with an empty result section.
    pub fn new() -> Self {
        Self {
            success: Some(Value::Bool(true)),
            result: Some(Map::new()),
            session_id: None,
            endpoint: None,
        }
    }

    /// A successful run with all eight metrics and both identifiers.
    ///
    /// Converted values: 250 Mbps down, 50 Mbps up, 12.5 ms latency,
    /// 1.5 ms jitter, loaded variants 30/4 (down) and 40/5 (up).
    pub fn complete() -> Self {
        Self::new()
            .session("3f2a9c")
            .endpoint("fra")
            .metric("download", 250_000_000.0)
            .metric("upload", 50_000_000.0)
            .metric("latency", 12.5)
            .metric("jitter", 1.5)
            .metric("downLoadedLatency", 30.0)
            .metric("downLoadedJitter", 4.0)
            .metric("upLoadedLatency", 40.0)
            .metric("upLoadedJitter", 5.0)
    }

    /// A run that reported `success: false` but still carries numbers.
    pub fn failed() -> Self {
        Self::complete().success(false)
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = Some(Value::Bool(success));
        self
    }

    /// Drop the `success` key entirely.
    pub fn without_success(mut self) -> Self {
        self.success = None;
        self
    }

    /// Drop the `result` section entirely.
    pub fn without_result(mut self) -> Self {
        self.result = None;
        self
    }

    /// Set a metric in the result section (creating it if dropped).
    pub fn metric(mut self, key: &str, value: f64) -> Self {
        self.result
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), json!(value));
        self
    }

    /// Set an arbitrary raw value in the result section.
    pub fn raw_metric(mut self, key: &str, value: Value) -> Self {
        self.result
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn session(mut self, id: &str) -> Self {
        self.session_id = Some(id.to_string());
        self
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        if let Some(success) = &self.success {
            root.insert("success".to_string(), success.clone());
        }
        if let Some(id) = &self.session_id {
            root.insert("sessionID".to_string(), json!(id));
        }
        if let Some(endpoint) = &self.endpoint {
            root.insert("endpoint".to_string(), json!(endpoint));
        }
        if let Some(result) = &self.result {
            root.insert("result".to_string(), Value::Object(result.clone()));
        }
        Value::Object(root)
    }

    /// Serialize to compact JSON.
    pub fn build(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_has_all_metrics() {
        let value = ResultFileBuilder::complete().to_value();
        let result = value["result"].as_object().unwrap();
        assert_eq!(result.len(), 8);
        assert_eq!(value["success"], json!(true));
    }

    #[test]
    fn test_without_keys() {
        let value = ResultFileBuilder::new().without_success().without_result().to_value();
        assert!(value.get("success").is_none());
        assert!(value.get("result").is_none());
    }
}
