// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions: fixed recipe nodes and type-inferring dynamic nodes.

use crate::graph::ConnectionError;
use crate::item::ItemType;
use crate::metadata::Recipe;
use crate::port::{Port, PortAddress, PortDirection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of a dynamic node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicKind {
    /// Splitter/merger: one input and one output, both may fan in/out
    Splitter,
    /// Sink: a single input
    Sink,
}

/// The two node variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ports fixed by a recipe. No recipe means no ports.
    Fixed {
        /// Assigned recipe
        recipe: Option<Recipe>,
    },
    /// Every port carries one shared, inferred item type.
    Dynamic {
        /// Node shape
        kind: DynamicKind,
        /// Inferred item type, `None` until an edge fixes it
        item_type: Option<ItemType>,
    },
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Canvas position, opaque to the engine
    pub position: [f32; 2],
    /// Variant data
    pub kind: NodeKind,
}

impl Node {
    fn with_kind(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
            position: [0.0, 0.0],
            kind,
        }
    }

    /// Create a fixed node, optionally with a recipe already assigned
    pub fn fixed(label: impl Into<String>, recipe: Option<Recipe>) -> Self {
        Self::with_kind(label, NodeKind::Fixed { recipe })
    }

    /// Create a fixed node labelled after its recipe
    pub fn recipe(recipe: Recipe) -> Self {
        let label = recipe.name.clone();
        Self::fixed(label, Some(recipe))
    }

    /// Create an untyped splitter/merger
    pub fn splitter() -> Self {
        Self::with_kind(
            "Splitter",
            NodeKind::Dynamic {
                kind: DynamicKind::Splitter,
                item_type: None,
            },
        )
    }

    /// Create an untyped sink
    pub fn sink() -> Self {
        Self::with_kind(
            "Sink",
            NodeKind::Dynamic {
                kind: DynamicKind::Sink,
                item_type: None,
            },
        )
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The inferred item type of a dynamic node.
    ///
    /// Returns `None` for fixed nodes and `Some(None)` for untyped dynamic nodes.
    pub fn dynamic_type(&self) -> Option<Option<&ItemType>> {
        match &self.kind {
            NodeKind::Dynamic { item_type, .. } => Some(item_type.as_ref()),
            NodeKind::Fixed { .. } => None,
        }
    }

    /// Overwrite a dynamic node's shared type. Returns false for fixed nodes.
    pub(crate) fn set_dynamic_type(&mut self, ty: Option<ItemType>) -> bool {
        match &mut self.kind {
            NodeKind::Dynamic { item_type, .. } => {
                *item_type = ty;
                true
            }
            NodeKind::Fixed { .. } => false,
        }
    }

    /// Number of ports exposed in a direction
    pub fn port_count(&self, direction: PortDirection) -> usize {
        match (&self.kind, direction) {
            (NodeKind::Fixed { recipe: None }, _) => 0,
            (NodeKind::Fixed { recipe: Some(r) }, PortDirection::Input) => r.inputs.len(),
            (NodeKind::Fixed { recipe: Some(r) }, PortDirection::Output) => r.outputs.len(),
            (NodeKind::Dynamic { kind: DynamicKind::Sink, .. }, PortDirection::Output) => 0,
            (NodeKind::Dynamic { .. }, _) => 1,
        }
    }

    /// Whether a port in this direction may carry several edges
    pub fn multi_connect(&self, direction: PortDirection) -> bool {
        match &self.kind {
            NodeKind::Dynamic { kind, .. } => {
                *kind == DynamicKind::Splitter && self.port_count(direction) > 0
            }
            NodeKind::Fixed { .. } => false,
        }
    }

    /// Resolve the item type at a port.
    ///
    /// `Ok(None)` means the port exists but is unconstrained. Addresses the
    /// node does not expose yield [`ConnectionError::InvalidPortAddress`].
    pub fn resolve_port_type(
        &self,
        direction: PortDirection,
        index: usize,
    ) -> Result<Option<&ItemType>, ConnectionError> {
        let address = PortAddress::new(self.id, direction, index);
        let invalid = || ConnectionError::InvalidPortAddress(address);
        match &self.kind {
            NodeKind::Fixed { recipe } => {
                let recipe = recipe.as_ref().ok_or_else(invalid)?;
                let items = match direction {
                    PortDirection::Input => &recipe.inputs,
                    PortDirection::Output => &recipe.outputs,
                };
                items.get(index).map(|i| Some(&i.item)).ok_or_else(invalid)
            }
            NodeKind::Dynamic { item_type, .. } => {
                if index < self.port_count(direction) {
                    Ok(item_type.as_ref())
                } else {
                    Err(invalid())
                }
            }
        }
    }

    /// Get a resolved port view
    pub fn port(&self, direction: PortDirection, index: usize) -> Option<Port> {
        let item_type = self.resolve_port_type(direction, index).ok()?.cloned();
        Some(Port {
            address: PortAddress::new(self.id, direction, index),
            item_type,
            multi_connect: self.multi_connect(direction),
        })
    }

    /// All ports in one direction
    pub fn ports_in(&self, direction: PortDirection) -> impl Iterator<Item = Port> + '_ {
        (0..self.port_count(direction)).filter_map(move |i| self.port(direction, i))
    }

    /// All ports, inputs first
    pub fn ports(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports_in(PortDirection::Input)
            .chain(self.ports_in(PortDirection::Output))
    }
}
