//! Dashboard settings from a JSON file and the environment.

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/audit_rater.log";

/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "sheet_url": "https://docs.google.com/spreadsheets/d/abc123/edit",
///   "log_file_path": "logs/audit_rater.log"
/// }
/// ```
/// Both keys are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sheet_url: Option<String>,
    pub log_file_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        serde_json::from_str(&content).with_context(|| format!("invalid config file {path}"))
    }

    /// Overrides fields from `AUDIT_SHEET_URL` and `LOG_FILE_PATH`.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`. Blank values are ignored.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_blank("AUDIT_SHEET_URL") {
            self.sheet_url = Some(url);
        }
        if let Some(path) = non_blank("LOG_FILE_PATH") {
            self.log_file_path = path;
        }
        self
    }

    /// File (when given) then environment.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.apply_env(|key| std::env::var(key).ok()))
    }
}
