// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed edges between an output port and an input port.

use crate::node::NodeId;
use crate::port::{PortAddress, PortDirection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed edge. Endpoints are stored as ids and port indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Producing node
    pub source_node: NodeId,
    /// Output port index on the producing node
    pub source_port: usize,
    /// Consuming node
    pub target_node: NodeId,
    /// Input port index on the consuming node
    pub target_port: usize,
}

impl Edge {
    /// Create an edge from an output address to an input address
    pub fn new(source: PortAddress, target: PortAddress) -> Self {
        Self {
            id: EdgeId::new(),
            source_node: source.node,
            source_port: source.index,
            target_node: target.node,
            target_port: target.index,
        }
    }

    /// Address of the output end
    pub fn source(&self) -> PortAddress {
        PortAddress::output(self.source_node, self.source_port)
    }

    /// Address of the input end
    pub fn target(&self) -> PortAddress {
        PortAddress::input(self.target_node, self.target_port)
    }

    /// Check if this edge touches a node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.source_node == node_id || self.target_node == node_id
    }

    /// Check if this edge occupies a port
    pub fn involves_port(&self, port: PortAddress) -> bool {
        match port.direction {
            PortDirection::Output => self.source() == port,
            PortDirection::Input => self.target() == port,
        }
    }

    /// The endpoint opposite to `node_id`, if the edge touches it
    pub fn other_end(&self, node_id: NodeId) -> Option<NodeId> {
        if self.source_node == node_id {
            Some(self.target_node)
        } else if self.target_node == node_id {
            Some(self.source_node)
        } else {
            None
        }
    }
}
