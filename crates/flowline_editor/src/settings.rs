// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings, stored as RON next to the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::filter::{Directive, ParseError};

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "flowline.ron";

/// Default undo depth
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON encoding failed
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// RON text could not be parsed
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

/// Editor-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undo steps kept
    pub history_depth: usize,
    /// Comma-separated tracing directives applied on top of `RUST_LOG`
    pub log_filter: String,
    /// Where the document is written when the editor exits
    pub autosave_path: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            log_filter: "flowline_editor=debug,flowline_graph=debug".to_string(),
            autosave_path: None,
        }
    }
}

impl EditorSettings {
    /// Parse each entry of `log_filter`, keeping failures so they can be
    /// reported once logging is up
    pub fn log_directives(&self) -> Vec<(String, Result<Directive, ParseError>)> {
        self.log_filter
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| (entry.to_string(), entry.parse()))
            .collect()
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
