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

//! Scratch data directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use netzbremse_core::filename_for;
use tempfile::TempDir;

use super::ResultFileBuilder;

/// A temporary data directory populated with result files.
///
/// The directory is deleted when the value is dropped. Panics on I/O
/// failure, which is what a test wants.
#[derive(Debug)]
pub struct FixtureDir {
    root: TempDir,
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDir {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("Failed to create fixture directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a correctly named result file for `timestamp`.
    pub fn write_result(&self, timestamp: DateTime<Utc>, content: &ResultFileBuilder) -> PathBuf {
        self.write_raw(&filename_for(timestamp), &content.build())
    }

    /// Write arbitrary content under an arbitrary name.
    pub fn write_raw(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.root.path().join(name)).expect("Failed to remove fixture file");
    }

    /// Sorted names of all regular files in the directory.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root.path())
            .expect("Failed to list fixture directory")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
