use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

/// Analysis configuration from `.archscan.toml`. Consumed, not owned,
/// by the engine; validated once before any analysis starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum descendant-node count for a syntax subtree to become a
    /// duplication candidate.
    #[serde(default = "default_min_duplicate_tokens")]
    pub min_duplicate_tokens: usize,
    /// Cap on related positions reported per duplicate group; further
    /// occurrences are summarized as a count.
    #[serde(default = "default_max_reported")]
    pub max_reported_duplicates_per_group: usize,
    /// File-stem suffixes marking generated files, which are exempt
    /// from naming checks.
    #[serde(default = "default_generated_suffixes")]
    pub generated_file_suffixes: Vec<String>,
    /// Regular expression that file names must match.
    #[serde(default = "default_filename_pattern")]
    pub filename_pattern: String,
}

fn default_min_duplicate_tokens() -> usize {
    15
}

fn default_max_reported() -> usize {
    3
}

fn default_generated_suffixes() -> Vec<String> {
    vec![
        "_gen".to_string(),
        "_generated".to_string(),
        ".pb".to_string(),
    ]
}

fn default_filename_pattern() -> String {
    r"^[a-z][a-z0-9_]*(_test)?\.[a-z0-9]+$".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_duplicate_tokens: default_min_duplicate_tokens(),
            max_reported_duplicates_per_group: default_max_reported(),
            generated_file_suffixes: default_generated_suffixes(),
            filename_pattern: default_filename_pattern(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from an `.archscan.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: AnalysisConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(config)
    }

    /// Load from `.archscan.toml` in the given directory or any
    /// ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".archscan.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}; using defaults",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Reject invalid configuration before analysis starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_duplicate_tokens == 0 {
            return Err(EngineError::Config(
                "min_duplicate_tokens must be positive".to_string(),
            ));
        }
        if self.max_reported_duplicates_per_group == 0 {
            return Err(EngineError::Config(
                "max_reported_duplicates_per_group must be positive".to_string(),
            ));
        }
        if let Err(e) = regex::Regex::new(&self.filename_pattern) {
            return Err(EngineError::Config(format!(
                "invalid filename_pattern '{}': {e}",
                self.filename_pattern
            )));
        }
        Ok(())
    }

    /// Generate default TOML content for `archscan init`.
    pub fn default_toml() -> String {
        r#"# Archscan - Static Analysis Configuration

# Minimum syntax-node count for a block to count toward duplication
min_duplicate_tokens = 15

# How many duplicate occurrences to list per group before summarizing
max_reported_duplicates_per_group = 3

# File-stem suffixes exempt from naming checks
generated_file_suffixes = ["_gen", "_generated", ".pb"]

# File names must match this pattern
filename_pattern = "^[a-z][a-z0-9_]*(_test)?\\.[a-z0-9]+$"
"#
        .to_string()
    }
}
