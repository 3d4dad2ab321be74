// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editor façade: routes canvas gestures into the connection engine and
//! records every successful change in the undo history.

use crate::document::FlowDocument;
use crate::history::{History, HistoryError, Snapshot};
use crate::settings::EditorSettings;
use flowline_graph::{
    ConnectionEngine, ConnectionError, DragOrigin, EdgeId, GameMetadata, Graph, MetadataError,
    Node, NodeId, PortAddress, PortDirection,
};
use indexmap::IndexSet;
use thiserror::Error;

/// Editor errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// The engine refused the gesture
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A catalog lookup failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Undo/redo failed
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// An open flow with its gesture state and history
#[derive(Debug)]
pub struct FlowEditor {
    engine: ConnectionEngine,
    metadata: GameMetadata,
    history: History,
}

impl FlowEditor {
    /// Open an empty flow
    pub fn new(settings: &EditorSettings) -> Self {
        Self::from_document(FlowDocument::default(), settings)
    }

    /// Open a loaded document. The document's flow name becomes the graph name.
    pub fn from_document(document: FlowDocument, settings: &EditorSettings) -> Self {
        let mut graph = document.graph;
        graph.name = document.flow_name;
        Self {
            engine: ConnectionEngine::new(graph),
            metadata: document.metadata,
            history: History::with_max_depth(settings.history_depth),
        }
    }

    /// Snapshot of the current state as a document
    pub fn document(&self) -> FlowDocument {
        let mut doc = FlowDocument::new(self.flow_name());
        doc.metadata = self.metadata.clone();
        doc.graph = self.engine.graph().clone();
        doc
    }

    /// Current graph
    pub fn graph(&self) -> &Graph {
        self.engine.graph()
    }

    /// The underlying engine
    pub fn engine(&self) -> &ConnectionEngine {
        &self.engine
    }

    /// Game metadata in use
    pub fn metadata(&self) -> &GameMetadata {
        &self.metadata
    }

    /// Replace the game metadata. Nodes keep the recipe copies they already carry.
    pub fn set_metadata(&mut self, metadata: GameMetadata) {
        for problem in metadata.validate() {
            tracing::warn!(%problem, "game metadata problem");
        }
        self.metadata = metadata;
    }

    /// Flow name, stored on the graph
    pub fn flow_name(&self) -> &str {
        &self.engine.graph().name
    }

    /// Rename the flow
    pub fn rename_flow(&mut self, name: impl Into<String>) -> Result<&Graph> {
        let name = name.into();
        self.record("Rename flow", |engine| {
            engine.rename_graph(name);
            Ok(())
        })?;
        Ok(self.engine.graph())
    }

    /// Undo/redo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run a mutation and record it in history if it succeeds
    fn record<T>(
        &mut self,
        description: &str,
        mutate: impl FnOnce(&mut ConnectionEngine) -> std::result::Result<T, ConnectionError>,
    ) -> Result<T> {
        let before = Snapshot::capture(self.engine.graph())?;
        let out = mutate(&mut self.engine)?;
        self.history.commit(description, before, self.engine.graph())?;
        Ok(out)
    }

    /// Place a fixed node for a catalog recipe
    pub fn place_recipe_node(&mut self, recipe: &str, position: [f32; 2]) -> Result<NodeId> {
        let node = self
            .metadata
            .create_recipe_node(recipe)?
            .with_position(position[0], position[1]);
        self.add_node(node)
    }

    /// Place a fixed node with no recipe yet
    pub fn place_empty_recipe_node(&mut self, position: [f32; 2]) -> Result<NodeId> {
        self.add_node(Node::fixed("Recipe", None).with_position(position[0], position[1]))
    }

    /// Place an untyped splitter/merger
    pub fn place_splitter(&mut self, position: [f32; 2]) -> Result<NodeId> {
        self.add_node(Node::splitter().with_position(position[0], position[1]))
    }

    /// Place an untyped sink
    pub fn place_sink(&mut self, position: [f32; 2]) -> Result<NodeId> {
        self.add_node(Node::sink().with_position(position[0], position[1]))
    }

    /// Add a prepared node
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        let id = node.id;
        let description = format!("Add {}", node.label);
        self.record(&description, |engine| {
            engine.add_node(node);
            Ok(id)
        })
    }

    /// Assign a catalog recipe to a fixed node, or clear it with `None`
    pub fn assign_recipe(&mut self, node: NodeId, recipe: Option<&str>) -> Result<&Graph> {
        let recipe = recipe
            .map(|name| {
                self.metadata
                    .recipe(name)
                    .cloned()
                    .ok_or_else(|| MetadataError::RecipeNotFound(name.to_string()))
            })
            .transpose()?;
        self.record("Assign recipe", |engine| engine.replace_recipe(node, recipe).map(|_| ()))?;
        Ok(self.engine.graph())
    }

    /// Move a node on the canvas
    pub fn move_node(&mut self, node: NodeId, position: [f32; 2]) -> Result<&Graph> {
        self.record("Move node", |engine| engine.move_node(node, position).map(|_| ()))?;
        Ok(self.engine.graph())
    }

    /// Change a node's label
    pub fn rename_node(&mut self, node: NodeId, label: impl Into<String>) -> Result<&Graph> {
        let label = label.into();
        self.record("Rename node", |engine| engine.rename_node(node, label).map(|_| ()))?;
        Ok(self.engine.graph())
    }

    /// Remove a node and its edges
    pub fn remove_node(&mut self, node: NodeId) -> Result<&Graph> {
        self.record("Delete node", |engine| engine.remove_node(node).map(|_| ()))?;
        Ok(self.engine.graph())
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<&Graph> {
        self.record("Delete edge", |engine| engine.remove_edge(edge).map(|_| ()))?;
        Ok(self.engine.graph())
    }

    /// Remove several edges as one undo step
    pub fn apply_edge_batch_removal(&mut self, edges: &[EdgeId]) -> Result<&Graph> {
        self.record("Delete edges", |engine| {
            engine.apply_edge_batch_removal(edges).map(|_| ())
        })?;
        Ok(self.engine.graph())
    }

    /// Add an edge without a drag gesture
    pub fn add_edge(&mut self, source: PortAddress, target: PortAddress) -> Result<EdgeId> {
        self.record("Connect", |engine| engine.add_edge(source, target))
    }

    /// Begin dragging a connection from a port
    pub fn start_drag(
        &mut self,
        node: NodeId,
        port_index: usize,
        direction: PortDirection,
    ) -> Result<&DragOrigin> {
        Ok(self.engine.start_drag(node, port_index, direction)?)
    }

    /// Cancel the current drag
    pub fn end_drag(&mut self) {
        self.engine.end_drag();
    }

    /// Drop the current drag on a port
    pub fn attempt_connect(&mut self, target_node: NodeId, target_port: usize) -> Result<EdgeId> {
        if !self.engine.session().is_dragging() {
            return Err(ConnectionError::NoActiveDrag.into());
        }
        self.record("Connect", |engine| engine.attempt_connect(target_node, target_port))
    }

    /// Ports to highlight for the current drag
    pub fn highlights(&self) -> IndexSet<PortAddress> {
        self.engine.highlights()
    }

    /// Undo the last change
    pub fn undo(&mut self) -> Result<&Graph> {
        let graph = self.history.undo()?;
        tracing::debug!("undo");
        Ok(self.engine.restore(graph))
    }

    /// Redo the last undone change
    pub fn redo(&mut self) -> Result<&Graph> {
        let graph = self.history.redo()?;
        tracing::debug!("redo");
        Ok(self.engine.restore(graph))
    }
}
