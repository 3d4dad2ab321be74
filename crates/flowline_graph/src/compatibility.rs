// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compatibility oracle: decides whether an edge or a drag counterpart is legal.
//!
//! Every function here is pure. Illegal input is reported as a rejection,
//! never by panicking or touching the graph.

use crate::drag::{DragOrigin, OriginType};
use crate::graph::{ConnectionError, Graph};
use crate::item::ItemType;
use crate::port::{PortAddress, PortDirection};

/// Check whether two resolved port types may be joined.
///
/// Typed ports must match exactly; an untyped port accepts anything.
pub fn types_compatible(a: Option<&ItemType>, b: Option<&ItemType>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Resolve the item type at an address in the graph
pub fn resolve_port_type(
    graph: &Graph,
    port: PortAddress,
) -> Result<Option<&ItemType>, ConnectionError> {
    graph
        .node(port.node)
        .ok_or(ConnectionError::NodeNotFound(port.node))?
        .resolve_port_type(port.direction, port.index)
}

/// Type-check a candidate edge from an output port to an input port.
///
/// On acceptance returns the item type that must be seeded into the untyped
/// endpoint, or `None` when both ends are typed or both are untyped.
/// Port occupancy is not considered here; see [`check_edge`].
pub fn check_types(
    graph: &Graph,
    source: PortAddress,
    target: PortAddress,
) -> Result<Option<ItemType>, ConnectionError> {
    if source.node == target.node {
        return Err(ConnectionError::SelfConnection(source.node));
    }
    if source.direction != PortDirection::Output {
        return Err(ConnectionError::InvalidPortAddress(source));
    }
    if target.direction != PortDirection::Input {
        return Err(ConnectionError::InvalidPortAddress(target));
    }

    let source_type = resolve_port_type(graph, source)?;
    let target_type = resolve_port_type(graph, target)?;

    match (source_type, target_type) {
        (Some(s), Some(t)) if s != t => Err(ConnectionError::IncompatibleTypes {
            output: s.clone(),
            input: t.clone(),
        }),
        (Some(s), None) => Ok(Some(s.clone())),
        (None, Some(t)) => Ok(Some(t.clone())),
        _ => Ok(None),
    }
}

/// Full legality check for inserting an edge: types plus port multiplicity.
///
/// Only splitter/merger ports may carry more than one edge, and the same
/// pair of ports is never joined twice.
pub fn check_edge(
    graph: &Graph,
    source: PortAddress,
    target: PortAddress,
) -> Result<Option<ItemType>, ConnectionError> {
    let seed = check_types(graph, source, target)?;

    if graph
        .edges()
        .any(|e| e.source() == source && e.target() == target)
    {
        return Err(ConnectionError::PortOccupied(target));
    }

    for port in [source, target] {
        let multi = graph
            .node(port.node)
            .is_some_and(|n| n.multi_connect(port.direction));
        if !multi && graph.edges_at(port).next().is_some() {
            return Err(ConnectionError::PortOccupied(port));
        }
    }

    Ok(seed)
}

/// Whether a candidate edge passes the type rules
pub fn is_compatible(graph: &Graph, source: PortAddress, target: PortAddress) -> bool {
    check_types(graph, source, target).is_ok()
}

/// Whether `candidate` is a legal counterpart for an in-progress drag.
///
/// Used for highlighting: only ports of the opposite direction on other
/// nodes qualify, and a wildcard origin matches every such port.
pub fn is_compatible_with_origin(
    graph: &Graph,
    candidate: PortAddress,
    origin: &DragOrigin,
) -> bool {
    if candidate.node == origin.node || candidate.direction != origin.direction.opposite() {
        return false;
    }
    let Ok(candidate_type) = resolve_port_type(graph, candidate) else {
        return false;
    };
    match &origin.item_type {
        OriginType::Wildcard => true,
        OriginType::Typed(ty) => types_compatible(Some(ty), candidate_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Recipe;
    use crate::node::{Node, NodeId};

    fn producer(item: &str) -> Node {
        Node::recipe(Recipe::new(format!("Make {item}"), "Machine").with_output(item, 1))
    }

    fn consumer(item: &str) -> Node {
        Node::recipe(Recipe::new(format!("Use {item}"), "Machine").with_input(item, 1))
    }

    #[test]
    fn test_fixed_pair_matches_on_type() {
        let mut graph = Graph::default();
        let iron = graph.add_node(producer("iron"));
        let iron_in = graph.add_node(consumer("iron"));
        let copper_in = graph.add_node(consumer("copper"));

        assert!(is_compatible(
            &graph,
            PortAddress::output(iron, 0),
            PortAddress::input(iron_in, 0)
        ));
        assert_eq!(
            check_types(&graph, PortAddress::output(iron, 0), PortAddress::input(copper_in, 0)),
            Err(ConnectionError::IncompatibleTypes {
                output: ItemType::new("iron"),
                input: ItemType::new("copper"),
            })
        );
    }

    #[test]
    fn test_self_loop_rejected_regardless_of_types() {
        let mut graph = Graph::default();
        let node = graph.add_node(Node::recipe(
            Recipe::new("Loop", "Machine").with_input("iron", 1).with_output("iron", 1),
        ));
        assert_eq!(
            check_types(&graph, PortAddress::output(node, 0), PortAddress::input(node, 0)),
            Err(ConnectionError::SelfConnection(node))
        );
    }

    #[test]
    fn test_untyped_endpoint_seeds_type() {
        let mut graph = Graph::default();
        let iron = graph.add_node(producer("iron"));
        let splitter = graph.add_node(Node::splitter());
        let other = graph.add_node(Node::splitter());

        assert_eq!(
            check_types(&graph, PortAddress::output(iron, 0), PortAddress::input(splitter, 0)),
            Ok(Some(ItemType::new("iron")))
        );
        assert_eq!(
            check_types(&graph, PortAddress::output(other, 0), PortAddress::input(splitter, 0)),
            Ok(None)
        );
    }

    #[test]
    fn test_malformed_addresses_rejected() {
        let mut graph = Graph::default();
        let iron = graph.add_node(producer("iron"));
        let empty = graph.add_node(Node::fixed("Empty", None));
        let ghost = NodeId::new();

        assert_eq!(
            check_types(&graph, PortAddress::output(iron, 3), PortAddress::input(empty, 0)),
            Err(ConnectionError::InvalidPortAddress(PortAddress::output(iron, 3)))
        );
        assert_eq!(
            check_types(&graph, PortAddress::output(iron, 0), PortAddress::input(empty, 0)),
            Err(ConnectionError::InvalidPortAddress(PortAddress::input(empty, 0)))
        );
        assert_eq!(
            check_types(&graph, PortAddress::output(iron, 0), PortAddress::input(ghost, 0)),
            Err(ConnectionError::NodeNotFound(ghost))
        );
        // Direction reversed
        assert!(!is_compatible(&graph, PortAddress::input(iron, 0), PortAddress::output(empty, 0)));
    }

    #[test]
    fn test_single_edge_ports_are_exclusive() {
        let mut graph = Graph::default();
        let a = graph.add_node(producer("iron"));
        let b = graph.add_node(producer("iron"));
        let sink = graph.add_node(consumer("iron"));

        graph.add_edge(PortAddress::output(a, 0), PortAddress::input(sink, 0)).unwrap();
        assert_eq!(
            check_edge(&graph, PortAddress::output(b, 0), PortAddress::input(sink, 0)),
            Err(ConnectionError::PortOccupied(PortAddress::input(sink, 0)))
        );
        // Occupancy does not affect the pure type check
        assert!(is_compatible(&graph, PortAddress::output(b, 0), PortAddress::input(sink, 0)));
    }

    #[test]
    fn test_fixed_output_takes_one_edge() {
        let mut graph = Graph::default();
        let source = graph.add_node(producer("iron"));
        let first = graph.add_node(consumer("iron"));
        let second = graph.add_node(consumer("iron"));

        graph.add_edge(PortAddress::output(source, 0), PortAddress::input(first, 0)).unwrap();
        let before = graph.clone();
        assert_eq!(
            graph.add_edge(PortAddress::output(source, 0), PortAddress::input(second, 0)),
            Err(ConnectionError::PortOccupied(PortAddress::output(source, 0)))
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn test_sink_input_takes_one_edge() {
        let mut graph = Graph::default();
        let first = graph.add_node(producer("iron"));
        let second = graph.add_node(producer("iron"));
        let sink = graph.add_node(Node::sink());

        graph.add_edge(PortAddress::output(first, 0), PortAddress::input(sink, 0)).unwrap();
        let before = graph.clone();
        assert_eq!(
            graph.add_edge(PortAddress::output(second, 0), PortAddress::input(sink, 0)),
            Err(ConnectionError::PortOccupied(PortAddress::input(sink, 0)))
        );
        assert_eq!(graph, before);
        assert!(graph.check_invariants().is_empty());
    }

    #[test]
    fn test_splitter_fans_out_but_rejects_duplicates() {
        let mut graph = Graph::default();
        let splitter = graph.add_node(Node::splitter());
        let first = graph.add_node(consumer("iron"));
        let second = graph.add_node(consumer("iron"));

        graph.add_edge(PortAddress::output(splitter, 0), PortAddress::input(first, 0)).unwrap();
        let fan_out = check_edge(
            &graph,
            PortAddress::output(splitter, 0),
            PortAddress::input(second, 0),
        );
        assert!(fan_out.is_ok());

        let merger = graph.add_node(Node::splitter());
        graph.add_edge(PortAddress::output(splitter, 0), PortAddress::input(merger, 0)).unwrap();
        assert_eq!(
            check_edge(&graph, PortAddress::output(splitter, 0), PortAddress::input(merger, 0)),
            Err(ConnectionError::PortOccupied(PortAddress::input(merger, 0)))
        );
    }

    #[test]
    fn test_origin_matching() {
        let mut graph = Graph::default();
        let iron = graph.add_node(producer("iron"));
        let iron_in = graph.add_node(consumer("iron"));
        let copper_in = graph.add_node(consumer("copper"));

        let origin = DragOrigin {
            node: iron,
            port_index: 0,
            direction: PortDirection::Output,
            item_type: OriginType::Typed(ItemType::new("iron")),
        };
        assert!(is_compatible_with_origin(&graph, PortAddress::input(iron_in, 0), &origin));
        assert!(!is_compatible_with_origin(&graph, PortAddress::input(copper_in, 0), &origin));
        assert!(!is_compatible_with_origin(&graph, PortAddress::output(iron, 0), &origin));

        let wildcard = DragOrigin {
            item_type: OriginType::Wildcard,
            ..origin
        };
        assert!(is_compatible_with_origin(&graph, PortAddress::input(copper_in, 0), &wildcard));
    }
}
