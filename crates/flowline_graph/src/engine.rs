// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection engine: the single entry point editor gestures are routed through.
//!
//! The engine owns the graph and the drag session. Each operation runs to
//! completion before returning, so readers only ever observe a fully
//! mutated graph. Every successful mutation bumps [`ConnectionEngine::version`].

use crate::compatibility;
use crate::drag::{DragOrigin, DragSession};
use crate::edge::EdgeId;
use crate::graph::{ConnectionError, Graph};
use crate::item::ItemType;
use crate::metadata::Recipe;
use crate::node::{Node, NodeId};
use crate::port::{PortAddress, PortDirection};
use indexmap::IndexSet;

/// Graph plus drag session
#[derive(Debug, Clone, Default)]
pub struct ConnectionEngine {
    graph: Graph,
    session: DragSession,
    version: u64,
}

impl ConnectionEngine {
    /// Create an engine over an initial snapshot
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            session: DragSession::Idle,
            version: 0,
        }
    }

    /// Current graph snapshot
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current drag session
    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Number of successful mutations applied so far
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole graph, ending any drag
    pub fn restore(&mut self, graph: Graph) -> &Graph {
        self.session.end();
        self.graph = graph;
        self.bump()
    }

    fn bump(&mut self) -> &Graph {
        self.version += 1;
        &self.graph
    }

    /// Resolve the item type at a port
    pub fn resolve_port_type(
        &self,
        port: PortAddress,
    ) -> Result<Option<&ItemType>, ConnectionError> {
        compatibility::resolve_port_type(&self.graph, port)
    }

    /// Whether an edge from `source` to `target` passes the type rules
    pub fn is_compatible(&self, source: PortAddress, target: PortAddress) -> bool {
        compatibility::is_compatible(&self.graph, source, target)
    }

    /// Whether a port is a legal counterpart to the given origin
    pub fn is_compatible_with_origin(&self, candidate: PortAddress, origin: &DragOrigin) -> bool {
        compatibility::is_compatible_with_origin(&self.graph, candidate, origin)
    }

    /// Begin a connection drag from a port
    pub fn start_drag(
        &mut self,
        node: NodeId,
        port_index: usize,
        direction: PortDirection,
    ) -> Result<&DragOrigin, ConnectionError> {
        self.session.start(&self.graph, node, port_index, direction)
    }

    /// End the current drag without connecting
    pub fn end_drag(&mut self) {
        self.session.end();
    }

    /// Drop the current drag on a port of another node.
    ///
    /// The session always returns to idle. The edge is only created if the
    /// oracle accepts it.
    pub fn attempt_connect(
        &mut self,
        target_node: NodeId,
        target_port: usize,
    ) -> Result<EdgeId, ConnectionError> {
        let origin = self.session.end().ok_or(ConnectionError::NoActiveDrag)?;
        let (source, target) = origin.edge_to(target_node, target_port);
        self.add_edge(source, target)
    }

    /// Ports to highlight for the current drag
    pub fn highlights(&self) -> IndexSet<PortAddress> {
        self.session.highlights(&self.graph)
    }

    /// Insert an edge directly, bypassing the drag session
    pub fn add_edge(
        &mut self,
        source: PortAddress,
        target: PortAddress,
    ) -> Result<EdgeId, ConnectionError> {
        let id = self.graph.add_edge(source, target)?;
        self.bump();
        Ok(id)
    }

    /// Add a node
    pub fn add_node(&mut self, node: Node) -> &Graph {
        self.graph.add_node(node);
        self.bump()
    }

    /// Remove a node and its edges. A drag from that node is cancelled.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<&Graph, ConnectionError> {
        self.graph.remove_node(node_id)?;
        if self.session.origin().is_some_and(|o| o.node == node_id) {
            self.session.end();
        }
        Ok(self.bump())
    }

    /// Remove one edge
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Result<&Graph, ConnectionError> {
        self.graph.remove_edge(edge_id)?;
        Ok(self.bump())
    }

    /// Remove a set of edges as one change
    pub fn apply_edge_batch_removal(
        &mut self,
        edge_ids: &[EdgeId],
    ) -> Result<&Graph, ConnectionError> {
        self.graph.remove_edges(edge_ids)?;
        Ok(self.bump())
    }

    /// Assign or clear a fixed node's recipe
    pub fn replace_recipe(
        &mut self,
        node_id: NodeId,
        recipe: Option<Recipe>,
    ) -> Result<&Graph, ConnectionError> {
        self.graph.replace_recipe(node_id, recipe)?;
        if self.session.origin().is_some_and(|o| o.node == node_id) {
            self.session.end();
        }
        Ok(self.bump())
    }

    /// Move a node on the canvas
    pub fn move_node(
        &mut self,
        node_id: NodeId,
        position: [f32; 2],
    ) -> Result<&Graph, ConnectionError> {
        self.graph.move_node(node_id, position)?;
        Ok(self.bump())
    }

    /// Change a node's label
    pub fn rename_node(
        &mut self,
        node_id: NodeId,
        label: impl Into<String>,
    ) -> Result<&Graph, ConnectionError> {
        self.graph.rename_node(node_id, label)?;
        Ok(self.bump())
    }

    /// Change the graph's name
    pub fn rename_graph(&mut self, name: impl Into<String>) -> &Graph {
        self.graph.name = name.into();
        self.bump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_connect_without_drag() {
        let mut engine = ConnectionEngine::default();
        let sink = Node::sink();
        let id = sink.id;
        engine.add_node(sink);
        assert_eq!(engine.attempt_connect(id, 0), Err(ConnectionError::NoActiveDrag));
    }

    #[test]
    fn test_attempt_connect_from_input_orients_edge() {
        let mut engine = ConnectionEngine::default();
        let producer = Node::recipe(Recipe::new("Iron", "Mine").with_output("iron", 1));
        let sink = Node::sink();
        let (p, s) = (producer.id, sink.id);
        engine.add_node(producer);
        engine.add_node(sink);

        engine.start_drag(s, 0, PortDirection::Input).unwrap();
        let edge = engine.attempt_connect(p, 0).unwrap();

        let edge = engine.graph().edge(edge).unwrap();
        assert_eq!(edge.source(), PortAddress::output(p, 0));
        assert_eq!(edge.target(), PortAddress::input(s, 0));
        assert!(!engine.session().is_dragging());
    }

    #[test]
    fn test_rejected_connect_returns_to_idle() {
        let mut engine = ConnectionEngine::default();
        let iron = Node::recipe(Recipe::new("Iron", "Mine").with_output("iron", 1));
        let copper = Node::recipe(Recipe::new("Wire", "Press").with_input("copper", 1));
        let (i, c) = (iron.id, copper.id);
        engine.add_node(iron);
        engine.add_node(copper);
        let version = engine.version();

        engine.start_drag(i, 0, PortDirection::Output).unwrap();
        assert!(matches!(
            engine.attempt_connect(c, 0),
            Err(ConnectionError::IncompatibleTypes { .. })
        ));
        assert!(!engine.session().is_dragging());
        assert_eq!(engine.version(), version);
        assert_eq!(engine.graph().edge_count(), 0);
    }

    #[test]
    fn test_connect_onto_occupied_port_returns_to_idle() {
        let mut engine = ConnectionEngine::default();
        let first = Node::recipe(Recipe::new("Iron", "Mine").with_output("iron", 1));
        let second = Node::recipe(Recipe::new("Iron", "Mine").with_output("iron", 1));
        let sink = Node::sink();
        let (a, b, s) = (first.id, second.id, sink.id);
        engine.add_node(first);
        engine.add_node(second);
        engine.add_node(sink);
        engine
            .add_edge(PortAddress::output(a, 0), PortAddress::input(s, 0))
            .unwrap();
        let before = engine.graph().clone();
        let version = engine.version();

        engine.start_drag(b, 0, PortDirection::Output).unwrap();
        assert_eq!(
            engine.attempt_connect(s, 0),
            Err(ConnectionError::PortOccupied(PortAddress::input(s, 0)))
        );
        assert!(!engine.session().is_dragging());
        assert_eq!(engine.graph(), &before);
        assert_eq!(engine.version(), version);
    }

    #[test]
    fn test_rename_node_and_graph() {
        let mut engine = ConnectionEngine::default();
        let splitter = Node::splitter();
        let id = splitter.id;
        engine.add_node(splitter);
        let version = engine.version();

        engine.rename_node(id, "Main bus").unwrap();
        engine.rename_graph("Smelting");
        assert_eq!(engine.graph().node(id).map(|n| n.label.as_str()), Some("Main bus"));
        assert_eq!(engine.graph().name, "Smelting");
        assert_eq!(engine.version(), version + 2);

        let ghost = NodeId::new();
        assert_eq!(
            engine.rename_node(ghost, "x").err(),
            Some(ConnectionError::NodeNotFound(ghost))
        );
        assert_eq!(engine.version(), version + 2);
    }

    #[test]
    fn test_removing_origin_node_cancels_drag() {
        let mut engine = ConnectionEngine::default();
        let splitter = Node::splitter();
        let id = splitter.id;
        engine.add_node(splitter);

        engine.start_drag(id, 0, PortDirection::Output).unwrap();
        engine.remove_node(id).unwrap();
        assert!(!engine.session().is_dragging());
        assert!(engine.highlights().is_empty());
    }

    #[test]
    fn test_not_found_is_reported_without_mutation() {
        let mut engine = ConnectionEngine::default();
        let ghost = NodeId::new();
        let version = engine.version();
        assert_eq!(engine.remove_node(ghost).err(), Some(ConnectionError::NodeNotFound(ghost)));
        let edge = EdgeId::new();
        assert_eq!(engine.remove_edge(edge).err(), Some(ConnectionError::EdgeNotFound(edge)));
        assert_eq!(engine.version(), version);
    }
}
