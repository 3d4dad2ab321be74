// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flow documents: the graph, its game metadata and the flow name, as stored on disk.
//!
//! Files ending in `.json` are read and written as JSON, everything else as RON.

use flowline_graph::{GameMetadata, Graph, GraphViolation};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON encoding failed
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// RON text could not be parsed
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// JSON encoding or parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by a newer version of the editor
    #[error("Document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Rusty Object Notation
    Ron,
    /// JSON
    Json,
}

impl DocumentFormat {
    /// Pick the encoding from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Ron,
        }
    }
}

/// A saved flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Format version
    pub version: u32,
    /// Flow name
    pub flow_name: String,
    /// Catalog the flow's recipes come from
    pub metadata: GameMetadata,
    /// The production graph
    pub graph: Graph,
}

impl Default for FlowDocument {
    fn default() -> Self {
        Self::new("New Flow")
    }
}

impl FlowDocument {
    /// Create an empty document
    pub fn new(flow_name: impl Into<String>) -> Self {
        let flow_name = flow_name.into();
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            graph: Graph::new(flow_name.clone()),
            flow_name,
            metadata: GameMetadata::default(),
        }
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self> {
        let doc: Self = ron::from_str(s)?;
        doc.check_version()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(s: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(s)?;
        doc.check_version()
    }

    fn check_version(self) -> Result<Self> {
        if self.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version,
                supported: DOCUMENT_FORMAT_VERSION,
            });
        }
        Ok(self)
    }

    /// Save the document, choosing the encoding from the extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match DocumentFormat::from_path(path) {
            DocumentFormat::Ron => self.to_ron()?,
            DocumentFormat::Json => self.to_json()?,
        };
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "saved flow document");
        Ok(())
    }

    /// Load a document.
    ///
    /// Invariant violations in the stored graph are logged and returned
    /// alongside the document; they are not repaired.
    pub fn load(path: &Path) -> Result<(Self, Vec<GraphViolation>)> {
        let content = std::fs::read_to_string(path)?;
        let doc = match DocumentFormat::from_path(path) {
            DocumentFormat::Ron => Self::from_ron(&content)?,
            DocumentFormat::Json => Self::from_json(&content)?,
        };

        let violations = doc.graph.check_invariants();
        for violation in &violations {
            tracing::warn!(path = %path.display(), ?violation, "stored graph breaks an invariant");
        }
        tracing::info!(
            path = %path.display(),
            nodes = doc.graph.node_count(),
            edges = doc.graph.edge_count(),
            "loaded flow document"
        );
        Ok((doc, violations))
    }
}
