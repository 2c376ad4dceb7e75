use std::path::Path;

use annotator_editor::{TagKind, DEFAULT_DEBOUNCE_MS};
use annotator_reconcile::MAX_DISPLAY_LENGTH;
use serde::{Deserialize, Serialize};

use crate::error::{WorkspaceError, WorkspaceResult};

pub const DEFAULT_CONFIG_NAME: &str = "annotator.config.json";

/// Annotator configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Characters of a token's text shown in pools and zones
    #[serde(default = "default_max_display_length")]
    pub max_display_length: usize,

    /// Quiet period before typed text is re-parsed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Language used for labels and new terms
    #[serde(default = "default_language")]
    pub language: String,

    /// Tagging buttons offered by the text editor
    #[serde(default = "default_tag_types")]
    pub tag_types: Vec<TagKind>,

    /// Upper bound on a record search before it counts as failed
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
}

fn default_max_display_length() -> usize {
    MAX_DISPLAY_LENGTH
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_language() -> String {
    "en".to_string()
}

fn default_tag_types() -> Vec<TagKind> {
    TagKind::ALL.to_vec()
}

fn default_search_timeout_ms() -> u64 {
    5000
}

impl AnnotatorConfig {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> WorkspaceResult<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> WorkspaceResult<Self> {
        let config: AnnotatorConfig =
            serde_json::from_str(content).map_err(|e| WorkspaceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WorkspaceResult<()> {
        if self.max_display_length == 0 {
            return Err(WorkspaceError::Config(
                "maxDisplayLength must be at least 1".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(WorkspaceError::Config("language must not be empty".to_string()));
        }
        if self.tag_types.is_empty() {
            return Err(WorkspaceError::Config(
                "tagTypes must offer at least one tag type".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            max_display_length: default_max_display_length(),
            debounce_ms: default_debounce_ms(),
            language: default_language(),
            tag_types: default_tag_types(),
            search_timeout_ms: default_search_timeout_ms(),
        }
    }
}
