use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "LINKEDIN_ANALYTICS_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Tunables for loading, ranking and exporting.  Every field has a default,
/// so a config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Worksheet holding the post table.
    pub sheet_name: String,
    /// Zero-based row holding the column names; rows above it are discarded.
    pub header_row: usize,
    /// Number of posts shown in the ranking charts.
    pub top_n: usize,
    /// File-name prefix for CSV exports.
    pub export_prefix: String,
    pub summary: SummaryRules,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_name: "All posts".to_string(),
            header_row: 1,
            top_n: 10,
            export_prefix: "linkedin_analytics".to_string(),
            summary: SummaryRules::default(),
        }
    }
}

/// Thresholds used when deriving a display title from post text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryRules {
    /// A first sentence shorter than this gets the second one appended.
    pub min_sentence_chars: usize,
    /// Upper bound on the summary length, ellipsis included.
    pub max_chars: usize,
    pub ellipsis: String,
}

impl Default for SummaryRules {
    fn default() -> Self {
        Self {
            min_sentence_chars: 20,
            max_chars: 100,
            ellipsis: "...".to_string(),
        }
    }
}

impl SummaryRules {
    /// Characters kept before the ellipsis when a summary is too long.
    pub fn truncate_to(&self) -> usize {
        self.max_chars.saturating_sub(self.ellipsis.chars().count())
    }
}

impl DashboardConfig {
    /// Load the config named by [`CONFIG_ENV_VAR`], or the defaults when the
    /// variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_linkedin_export() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.sheet_name, "All posts");
        assert_eq!(cfg.header_row, 1);
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.summary.truncate_to(), 97);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 5, "summary": {{ "max_chars": 60 }} }}"#).unwrap();

        let cfg = DashboardConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.summary.max_chars, 60);
        assert_eq!(cfg.summary.min_sentence_chars, 20);
        assert_eq!(cfg.sheet_name, "All posts");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_path(file.path()).is_err());
    }
}
