// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filtering configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LesezeichenError, Result};
use crate::types::{DEFAULT_PATTERNS, FilterSpec};

/// Persistent filtering settings, loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Bookmark title patterns to remove (case-insensitive substrings).
    pub patterns: Vec<String>,
    /// Wall-clock limit for one worker run, in seconds (default 60).
    pub timeout_secs: u64,
    /// Where outputs go when no explicit output path is given. `None` writes
    /// next to the input.
    pub work_dir: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            timeout_secs: 60,
            work_dir: None,
        }
    }
}

impl FilterConfig {
    /// Read a config file. Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(LesezeichenError::InvalidConfig(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(&self.patterns)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }
}
