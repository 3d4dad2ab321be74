// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and edges, and the mutations that
//! keep dynamic node types consistent.

use crate::compatibility;
use crate::edge::{Edge, EdgeId};
use crate::item::ItemType;
use crate::metadata::Recipe;
use crate::node::{Node, NodeId, NodeKind};
use crate::port::PortAddress;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A production-chain graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Edges between nodes
    edges: IndexMap<EdgeId, Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    /// Add a node to the graph.
    ///
    /// A dynamic node always enters untyped since it has no edges yet.
    /// A node reusing an existing id replaces it, dropping the old node's edges.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id;
        if let Ok(old) = self.remove_node(id) {
            tracing::debug!(node = ?id, label = %old.label, "node replaced");
        }
        node.set_dynamic_type(None);
        tracing::debug!(node = ?id, label = %node.label, "node added");
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every edge incident to it, then reset dynamic
    /// neighbours that lost their last edge.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node, ConnectionError> {
        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;

        let mut touched = IndexSet::new();
        self.edges.retain(|_, e| {
            if let Some(other) = e.other_end(node_id) {
                touched.insert(other);
                false
            } else {
                true
            }
        });
        self.reset_orphans(touched);

        tracing::debug!(node = ?node_id, "node removed");
        Ok(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Move a node on the canvas
    pub fn move_node(
        &mut self,
        node_id: NodeId,
        position: [f32; 2],
    ) -> Result<(), ConnectionError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        node.position = position;
        Ok(())
    }

    /// Change a node's label
    pub fn rename_node(
        &mut self,
        node_id: NodeId,
        label: impl Into<String>,
    ) -> Result<(), ConnectionError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        node.label = label.into();
        Ok(())
    }

    /// Assign or clear the recipe of a fixed node.
    ///
    /// The node's ports may change shape, so its edges are dropped first.
    pub fn replace_recipe(
        &mut self,
        node_id: NodeId,
        recipe: Option<Recipe>,
    ) -> Result<(), ConnectionError> {
        match self.nodes.get(&node_id).map(|n| &n.kind) {
            None => return Err(ConnectionError::NodeNotFound(node_id)),
            Some(NodeKind::Dynamic { .. }) => {
                return Err(ConnectionError::NotARecipeNode(node_id));
            }
            Some(NodeKind::Fixed { .. }) => {}
        }

        let incident: Vec<EdgeId> = self.incident_edges(node_id).map(|e| e.id).collect();
        self.remove_edges(&incident)?;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.kind = NodeKind::Fixed { recipe };
        }
        tracing::debug!(node = ?node_id, dropped = incident.len(), "recipe replaced");
        Ok(())
    }

    /// Insert an edge after consulting the compatibility oracle.
    ///
    /// An untyped dynamic endpoint takes the other end's type, and that type
    /// spreads across existing edges to any further untyped dynamic nodes.
    pub fn add_edge(
        &mut self,
        source: PortAddress,
        target: PortAddress,
    ) -> Result<EdgeId, ConnectionError> {
        let seed = match compatibility::check_edge(self, source, target) {
            Ok(seed) => seed,
            Err(err) => {
                tracing::trace!(?source, ?target, %err, "edge rejected");
                return Err(err);
            }
        };

        let edge = Edge::new(source, target);
        let id = edge.id;
        self.edges.insert(id, edge);

        if let Some(ty) = seed {
            for endpoint in [source.node, target.node] {
                self.propagate_type(endpoint, &ty);
            }
        }

        tracing::debug!(edge = ?id, ?source, ?target, "edge added");
        Ok(id)
    }

    /// Remove an edge, resetting dynamic endpoints left without edges
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Result<Edge, ConnectionError> {
        self.remove_edges(&[edge_id])?
            .pop()
            .ok_or(ConnectionError::EdgeNotFound(edge_id))
    }

    /// Remove a batch of edges atomically.
    ///
    /// Every id must exist or nothing is removed. Dynamic endpoints are
    /// evaluated once, against the final edge set.
    pub fn remove_edges(&mut self, edge_ids: &[EdgeId]) -> Result<Vec<Edge>, ConnectionError> {
        if let Some(missing) = edge_ids.iter().find(|id| !self.edges.contains_key(*id)) {
            return Err(ConnectionError::EdgeNotFound(*missing));
        }

        let mut removed = Vec::with_capacity(edge_ids.len());
        let mut touched = IndexSet::new();
        for id in edge_ids {
            if let Some(edge) = self.edges.shift_remove(id) {
                touched.insert(edge.source_node);
                touched.insert(edge.target_node);
                removed.push(edge);
            }
        }
        self.reset_orphans(touched);

        tracing::debug!(count = removed.len(), "edges removed");
        Ok(removed)
    }

    /// Get an edge by ID
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge_id)
    }

    /// Get all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges occupying a specific port
    pub fn edges_at(&self, port: PortAddress) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.involves_port(port))
    }

    /// Edges touching a node
    pub fn incident_edges(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.involves_node(node_id))
    }

    /// Type untyped dynamic nodes reachable from `start` through edges
    fn propagate_type(&mut self, start: NodeId, ty: &ItemType) {
        let mut stack = vec![start];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&node_id) else {
                continue;
            };
            if node.dynamic_type() != Some(None) {
                continue;
            }
            node.set_dynamic_type(Some(ty.clone()));
            tracing::debug!(node = ?node_id, item = %ty, "dynamic node typed");

            stack.extend(
                self.edges
                    .values()
                    .filter_map(|e| e.other_end(node_id)),
            );
        }
    }

    /// Reset dynamic nodes among `candidates` that have no incident edges left
    fn reset_orphans(&mut self, candidates: IndexSet<NodeId>) {
        for node_id in candidates {
            if self.incident_edges(node_id).next().is_some() {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(&node_id) {
                if matches!(node.dynamic_type(), Some(Some(_))) {
                    node.set_dynamic_type(None);
                    tracing::debug!(node = ?node_id, "dynamic node reset");
                }
            }
        }
    }

    /// Collect every structural invariant violation.
    ///
    /// Mutations through this type never produce violations; this vets
    /// graphs that arrive from storage.
    pub fn check_invariants(&self) -> Vec<GraphViolation> {
        let mut violations = Vec::new();

        for edge in self.edges.values() {
            let source = compatibility::resolve_port_type(self, edge.source());
            let target = compatibility::resolve_port_type(self, edge.target());
            match (source, target) {
                (Err(_), _) => violations.push(GraphViolation::DanglingEdge {
                    edge: edge.id,
                    port: edge.source(),
                }),
                (_, Err(_)) => violations.push(GraphViolation::DanglingEdge {
                    edge: edge.id,
                    port: edge.target(),
                }),
                (Ok(s), Ok(t)) if s != t => {
                    violations.push(GraphViolation::TypeMismatch(edge.id));
                }
                _ => {}
            }
            if edge.source_node == edge.target_node {
                violations.push(GraphViolation::SelfLoop(edge.id));
            }
        }

        for node in self.nodes.values() {
            let typed = matches!(node.dynamic_type(), Some(Some(_)));
            if typed && self.incident_edges(node.id).next().is_none() {
                violations.push(GraphViolation::StaleDynamicType(node.id));
            }
        }

        let mut occupied = IndexSet::new();
        for edge in self.edges.values() {
            for port in [edge.source(), edge.target()] {
                let multi = self
                    .node(port.node)
                    .is_some_and(|n| n.multi_connect(port.direction));
                if !multi && !occupied.insert(port) {
                    violations.push(GraphViolation::PortOverloaded(port));
                }
            }
        }

        violations
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("New Flow")
    }
}

/// Reason a connection or mutation was refused.
///
/// Every variant is a recoverable outcome; the graph is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The addressed port does not exist on its node
    #[error("Invalid port address: {0:?}")]
    InvalidPortAddress(PortAddress),

    /// Both ports are typed and the types differ
    #[error("Incompatible item types: {output} -> {input}")]
    IncompatibleTypes {
        /// Type on the output end
        output: ItemType,
        /// Type on the input end
        input: ItemType,
    },

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Edge not found
    #[error("Edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    /// Source and target are the same node
    #[error("Cannot connect a node to itself: {0:?}")]
    SelfConnection(NodeId),

    /// Single-edge port already carries an edge
    #[error("Port already connected: {0:?}")]
    PortOccupied(PortAddress),

    /// A connection was attempted with no drag in progress
    #[error("No connection drag in progress")]
    NoActiveDrag,

    /// Recipe operation on a dynamic node
    #[error("Node does not take a recipe: {0:?}")]
    NotARecipeNode(NodeId),
}

/// Broken invariant found by [`Graph::check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphViolation {
    /// Edge endpoint does not resolve to a port
    DanglingEdge {
        /// Offending edge
        edge: EdgeId,
        /// Unresolvable endpoint
        port: PortAddress,
    },
    /// Edge endpoints carry different item types
    TypeMismatch(EdgeId),
    /// Edge joins a node to itself
    SelfLoop(EdgeId),
    /// Dynamic node keeps a type with no edges
    StaleDynamicType(NodeId),
    /// Single-edge port carries several edges
    PortOverloaded(PortAddress),
}
