// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built from serialized graph snapshots.
//!
//! Each committed operation stores the graph before and after the change,
//! so undo and redo are plain restores.

use flowline_graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Unique operation ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(u64);

impl OperationId {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Serialized graph state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Encoded graph
    pub data: Vec<u8>,
    /// Size in bytes
    pub size: usize,
}

impl Snapshot {
    /// Encode a graph
    pub fn capture(graph: &Graph) -> Result<Self> {
        let data = bincode::serialize(graph)?;
        let size = data.len();
        Ok(Self { data, size })
    }

    /// Decode the graph
    pub fn restore(&self) -> Result<Graph> {
        Ok(bincode::deserialize(&self.data)?)
    }
}

/// An operation that can be undone/redone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation ID
    pub id: OperationId,
    /// Human-readable description
    pub description: String,
    /// State before operation (for undo)
    pub before: Snapshot,
    /// State after operation (for redo)
    pub after: Snapshot,
    /// Timestamp
    pub timestamp: u64,
}

impl Operation {
    /// Get memory size of this operation
    pub fn memory_size(&self) -> usize {
        self.before.size + self.after.size
    }
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Total operations in undo stack
    pub undo_count: usize,
    /// Total operations in redo stack
    pub redo_count: usize,
    /// Total memory used by history (bytes)
    pub memory_used: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Operation>,
    redo_stack: VecDeque<Operation>,
    next_id: u64,
    max_depth: usize,
    memory_used: usize,
}

impl History {
    /// Create with a maximum depth (at least one step)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            max_depth: max_depth.max(1),
            memory_used: 0,
        }
    }

    /// Record a completed change. Clears the redo stack.
    pub fn commit(
        &mut self,
        description: impl Into<String>,
        before: Snapshot,
        after: &Graph,
    ) -> Result<OperationId> {
        let id = OperationId(self.next_id);
        self.next_id += 1;

        let operation = Operation {
            id,
            description: description.into(),
            before,
            after: Snapshot::capture(after)?,
            timestamp: now_secs(),
        };

        self.redo_stack.clear();
        tracing::debug!(id = id.value(), description = %operation.description, "history commit");
        self.undo_stack.push_back(operation);

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        self.recount_memory();
        Ok(id)
    }

    /// Undo the last operation, returning the graph to restore
    pub fn undo(&mut self) -> Result<Graph> {
        let operation = self.undo_stack.pop_back().ok_or(HistoryError::NothingToUndo)?;
        let graph = operation.before.restore()?;
        self.redo_stack.push_back(operation);
        self.recount_memory();
        Ok(graph)
    }

    /// Redo the last undone operation, returning the graph to restore
    pub fn redo(&mut self) -> Result<Graph> {
        let operation = self.redo_stack.pop_back().ok_or(HistoryError::NothingToRedo)?;
        let graph = operation.after.restore()?;
        self.undo_stack.push_back(operation);
        self.recount_memory();
        Ok(graph)
    }

    fn recount_memory(&mut self) {
        self.memory_used = self
            .undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Operation::memory_size)
            .sum();
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            memory_used: self.memory_used,
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|op| op.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|op| op.description.as_str())
    }
}
