// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless `Flowline` editor entry point.
//!
//! Loads a flow document, reports its shape and any broken invariants, and
//! writes it to the configured autosave path.

use flowline_editor::settings::SETTINGS_FILE_NAME;
use flowline_editor::{EditorSettings, FlowDocument, FlowEditor};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let settings = EditorSettings::load_or_default(Path::new(SETTINGS_FILE_NAME));
    let directives = settings
        .as_ref()
        .map(EditorSettings::log_directives)
        .unwrap_or_else(|_| EditorSettings::default().log_directives());

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let mut rejected = Vec::new();
    for (entry, parsed) in directives {
        match parsed {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => rejected.push((entry, e)),
        }
    }
    if !rejected.is_empty() {
        env_filter = env_filter.add_directive(LevelFilter::INFO.into());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    for (entry, e) in rejected {
        tracing::warn!("Ignoring log filter entry {entry:?}: {e}");
    }

    tracing::info!("Starting Flowline editor v{}", env!("CARGO_PKG_VERSION"));

    let settings = settings.unwrap_or_else(|e| {
        tracing::warn!("Failed to load {SETTINGS_FILE_NAME}: {e}. Using defaults.");
        EditorSettings::default()
    });

    let document = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match FlowDocument::load(&path) {
            Ok((doc, violations)) => {
                if !violations.is_empty() {
                    tracing::warn!(
                        "{} invariant violation(s) in {}",
                        violations.len(),
                        path.display()
                    );
                }
                doc
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => FlowDocument::default(),
    };

    for problem in document.metadata.validate() {
        tracing::warn!("Game metadata: {problem}");
    }

    let editor = FlowEditor::from_document(document, &settings);
    tracing::info!(
        flow = editor.flow_name(),
        nodes = editor.graph().node_count(),
        edges = editor.graph().edge_count(),
        "flow ready"
    );

    if let Some(path) = &settings.autosave_path {
        if let Err(e) = editor.document().save(path) {
            tracing::error!("Failed to autosave: {e}");
            std::process::exit(1);
        }
    }
}
