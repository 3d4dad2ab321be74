// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed connection engine for `Flowline` production-chain diagrams.
//!
//! Recipe nodes expose ports with fixed item types; splitter/merger and sink
//! nodes infer a single shared item type from the edges they receive.
//!
//! ## Architecture
//!
//! - [`port`] / [`node`]: port addressing and the two node variants
//! - [`compatibility`]: the pure oracle deciding edge legality
//! - [`drag`]: the connection gesture state machine and highlight projection
//! - [`graph`]: node/edge arena with the dynamic-type cascade
//! - [`engine`]: the entry point editor gestures are routed through
//! - [`metadata`]: the item, machine and recipe catalog

pub mod item;
pub mod port;
pub mod node;
pub mod edge;
pub mod metadata;
pub mod compatibility;
pub mod drag;
pub mod graph;
pub mod engine;

pub use item::ItemType;
pub use port::{Port, PortAddress, PortDirection};
pub use node::{DynamicKind, Node, NodeId, NodeKind};
pub use edge::{Edge, EdgeId};
pub use metadata::{GameMetadata, Item, Machine, MetadataError, Recipe, RecipeItem};
pub use drag::{DragOrigin, DragSession, OriginType};
pub use graph::{ConnectionError, Graph, GraphViolation};
pub use engine::ConnectionEngine;
