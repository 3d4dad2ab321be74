// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port addressing and resolved port views.

use crate::item::ItemType;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Consumes items
    Input,
    /// Produces items
    Output,
}

impl PortDirection {
    /// The direction a counterpart port must have
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Address of a port: node, direction and position within that direction's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortAddress {
    /// Owning node
    pub node: NodeId,
    /// Port direction
    pub direction: PortDirection,
    /// Index among the node's ports of the same direction
    pub index: usize,
}

impl PortAddress {
    /// Create a port address
    pub fn new(node: NodeId, direction: PortDirection, index: usize) -> Self {
        Self { node, direction, index }
    }

    /// Address of an input port
    pub fn input(node: NodeId, index: usize) -> Self {
        Self::new(node, PortDirection::Input, index)
    }

    /// Address of an output port
    pub fn output(node: NodeId, index: usize) -> Self {
        Self::new(node, PortDirection::Output, index)
    }
}

/// A port as currently exposed by a node, with its resolved item type.
///
/// Ports are derived from the node on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Where the port lives
    pub address: PortAddress,
    /// Resolved item type, `None` while unconstrained
    pub item_type: Option<ItemType>,
    /// Whether the port may carry more than one edge
    pub multi_connect: bool,
}
