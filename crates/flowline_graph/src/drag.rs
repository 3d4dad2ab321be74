// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag session: the in-progress connection gesture and its highlight projection.

use crate::compatibility;
use crate::graph::{ConnectionError, Graph};
use crate::item::ItemType;
use crate::node::NodeId;
use crate::port::{PortAddress, PortDirection};
use indexmap::IndexSet;

/// Type of the port a drag started from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginType {
    /// The origin port carries this item type
    Typed(ItemType),
    /// The origin port is untyped and matches any counterpart.
    /// Exists only for the duration of a drag.
    Wildcard,
}

/// Port a drag started from, captured when the gesture began
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOrigin {
    /// Node the drag started on
    pub node: NodeId,
    /// Port index within `direction`
    pub port_index: usize,
    /// Direction of the origin port
    pub direction: PortDirection,
    /// Resolved type at the origin port
    pub item_type: OriginType,
}

impl DragOrigin {
    /// Capture the origin for a port, resolving its current type
    pub fn resolve(graph: &Graph, port: PortAddress) -> Result<Self, ConnectionError> {
        let item_type = match compatibility::resolve_port_type(graph, port)? {
            Some(ty) => OriginType::Typed(ty.clone()),
            None => OriginType::Wildcard,
        };
        Ok(Self {
            node: port.node,
            port_index: port.index,
            direction: port.direction,
            item_type,
        })
    }

    /// Address of the origin port
    pub fn address(&self) -> PortAddress {
        PortAddress::new(self.node, self.direction, self.port_index)
    }

    /// Orient a drop target into `(source, target)` edge endpoints.
    ///
    /// The target port takes the direction opposite the origin.
    pub fn edge_to(&self, target_node: NodeId, target_port: usize) -> (PortAddress, PortAddress) {
        let other = PortAddress::new(target_node, self.direction.opposite(), target_port);
        match self.direction {
            PortDirection::Output => (self.address(), other),
            PortDirection::Input => (other, self.address()),
        }
    }
}

/// Connection gesture state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    /// No gesture in progress
    #[default]
    Idle,
    /// A connection is being dragged out of `origin`
    Dragging(DragOrigin),
}

impl DragSession {
    /// Begin a drag from a port.
    ///
    /// Replaces any drag already in progress. If the port cannot be resolved
    /// the session ends up `Idle`.
    pub fn start(
        &mut self,
        graph: &Graph,
        node: NodeId,
        port_index: usize,
        direction: PortDirection,
    ) -> Result<&DragOrigin, ConnectionError> {
        *self = Self::Idle;
        let origin = DragOrigin::resolve(graph, PortAddress::new(node, direction, port_index))?;
        tracing::debug!(?origin, "drag started");
        *self = Self::Dragging(origin);
        self.origin().ok_or(ConnectionError::NoActiveDrag)
    }

    /// End the gesture, returning the origin if one was active
    pub fn end(&mut self) -> Option<DragOrigin> {
        match std::mem::take(self) {
            Self::Dragging(origin) => {
                tracing::debug!(node = ?origin.node, "drag ended");
                Some(origin)
            }
            Self::Idle => None,
        }
    }

    /// The active origin, if dragging
    pub fn origin(&self) -> Option<&DragOrigin> {
        match self {
            Self::Dragging(origin) => Some(origin),
            Self::Idle => None,
        }
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Whether a port should be highlighted as a legal drop target
    pub fn is_highlighted(&self, graph: &Graph, port: PortAddress) -> bool {
        self.origin()
            .is_some_and(|origin| compatibility::is_compatible_with_origin(graph, port, origin))
    }

    /// Every port in the graph that is a legal counterpart to the origin.
    ///
    /// Recomputed from scratch on each call; empty while idle.
    pub fn highlights(&self, graph: &Graph) -> IndexSet<PortAddress> {
        let Some(origin) = self.origin() else {
            return IndexSet::new();
        };
        graph
            .nodes()
            .flat_map(|node| node.ports_in(origin.direction.opposite()))
            .map(|port| port.address)
            .filter(|&address| compatibility::is_compatible_with_origin(graph, address, origin))
            .collect()
    }
}
