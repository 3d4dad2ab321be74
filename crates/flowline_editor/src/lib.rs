// SPDX-License-Identifier: MIT OR Apache-2.0
//! `Flowline` editor - the collaborators around the connection engine.
//!
//! - Flow documents and their RON/JSON storage
//! - Editor settings
//! - Snapshot undo/redo history
//! - The [`FlowEditor`] façade that canvas gestures are routed through

pub mod document;
pub mod editor;
pub mod history;
pub mod settings;

pub use document::{DocumentError, DocumentFormat, FlowDocument};
pub use editor::{EditorError, FlowEditor};
pub use history::{History, HistoryError, HistoryStats};
pub use settings::{EditorSettings, SettingsError};
