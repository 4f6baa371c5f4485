//! Scanner configuration
//!
//! All keys are optional in the TOML file; defaults apply for anything
//! omitted. A file that is present but unparsable is a caller-input error,
//! not a silent fallback to defaults.

use std::path::Path;

use serde::Deserialize;

use crate::error::ScanError;
use crate::models::IssueType;

/// Minimum contrast ratios per WCAG AA.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContrastThresholds {
    pub normal: f64,
    pub large: f64,
}

impl Default for ContrastThresholds {
    fn default() -> Self {
        Self {
            normal: 4.5,
            large: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Restrict the registry to these issue types; `None` enables all.
    pub enabled_checks: Option<Vec<IssueType>>,
    pub vague_link_phrases: Vec<String>,
    pub contrast_thresholds: ContrastThresholds,
    pub dedup_enabled: bool,
    /// Per-URL fetch deadline for batch scans
    pub timeout_secs: u64,
    /// Concurrent URL pipelines in a batch scan
    pub max_concurrency: usize,
    pub user_agent: String,
}

pub fn default_vague_phrases() -> Vec<String> {
    [
        "click here",
        "here",
        "more",
        "more info",
        "read more",
        "learn more",
        "continue",
        "next",
        "previous",
        "back",
        "forward",
        "details",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled_checks: None,
            vague_link_phrases: default_vague_phrases(),
            contrast_thresholds: ContrastThresholds::default(),
            dedup_enabled: true,
            timeout_secs: 30,
            max_concurrency: 3,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))
    }
}
