// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end connection scenarios through the public engine API.

use flowline_graph::{
    ConnectionEngine, ConnectionError, EdgeId, Graph, ItemType, Node, NodeId, PortAddress,
    PortDirection, Recipe,
};

struct Fixture {
    engine: ConnectionEngine,
    r1: NodeId,
    r2: NodeId,
    r3: NodeId,
    s1: NodeId,
}

fn place(engine: &mut ConnectionEngine, node: Node) -> NodeId {
    let id = node.id;
    engine.add_node(node);
    id
}

fn fixture() -> Fixture {
    let mut engine = ConnectionEngine::new(Graph::new("Scenarios"));
    let r1 = place(&mut engine, Node::recipe(Recipe::new("R1", "Mine").with_output("iron", 1)));
    let r2 = place(&mut engine, Node::recipe(Recipe::new("R2", "Press").with_input("iron", 1)));
    let r3 = place(&mut engine, Node::recipe(Recipe::new("R3", "Drawer").with_input("copper", 1)));
    let s1 = place(&mut engine, Node::splitter());
    Fixture { engine, r1, r2, r3, s1 }
}

fn item_type(engine: &ConnectionEngine, node: NodeId) -> Option<ItemType> {
    engine
        .graph()
        .node(node)
        .and_then(|n| n.dynamic_type())
        .flatten()
        .cloned()
}

/// Dynamic nodes are untyped exactly when they have no edges, and agree with every edge.
fn assert_dynamic_invariants(graph: &Graph) {
    for node in graph.nodes() {
        let Some(ty) = node.dynamic_type() else { continue };
        let edges: Vec<_> = graph.incident_edges(node.id).collect();
        if edges.is_empty() {
            assert_eq!(ty, None, "untouched dynamic node must be untyped");
        }
        for edge in edges {
            let port = if edge.source_node == node.id { edge.target() } else { edge.source() };
            let other = graph.node(port.node).unwrap();
            assert_eq!(other.resolve_port_type(port.direction, port.index).unwrap(), ty);
        }
    }
    assert!(graph.check_invariants().is_empty());
}

#[test]
fn scenario_a_matching_fixed_nodes_connect() {
    let Fixture { mut engine, r1, r2, .. } = fixture();

    engine.start_drag(r1, 0, PortDirection::Output).unwrap();
    let edge = engine.attempt_connect(r2, 0).unwrap();

    assert_eq!(engine.graph().edge_count(), 1);
    assert_eq!(engine.graph().edge(edge).unwrap().target(), PortAddress::input(r2, 0));
}

#[test]
fn scenario_b_mismatched_fixed_nodes_reject() {
    let Fixture { mut engine, r1, r3, .. } = fixture();

    engine.start_drag(r1, 0, PortDirection::Output).unwrap();
    assert_eq!(
        engine.attempt_connect(r3, 0),
        Err(ConnectionError::IncompatibleTypes {
            output: ItemType::new("iron"),
            input: ItemType::new("copper"),
        })
    );
    assert_eq!(engine.graph().edge_count(), 0);
}

#[test]
fn scenario_c_splitter_takes_first_type() {
    let Fixture { mut engine, r1, r3, s1, .. } = fixture();

    engine.start_drag(r1, 0, PortDirection::Output).unwrap();
    engine.attempt_connect(s1, 0).unwrap();
    assert_eq!(item_type(&engine, s1), Some(ItemType::new("iron")));

    engine.start_drag(s1, 0, PortDirection::Output).unwrap();
    assert!(matches!(
        engine.attempt_connect(r3, 0),
        Err(ConnectionError::IncompatibleTypes { .. })
    ));
    assert_dynamic_invariants(engine.graph());
}

#[test]
fn scenario_d_reset_only_on_last_edge() {
    let Fixture { mut engine, r1, r2, s1, .. } = fixture();
    let lone = engine.add_edge(PortAddress::output(r1, 0), PortAddress::input(s1, 0)).unwrap();
    engine.remove_edge(lone).unwrap();
    assert_eq!(item_type(&engine, s1), None);

    let first = engine.add_edge(PortAddress::output(r1, 0), PortAddress::input(s1, 0)).unwrap();
    engine.add_edge(PortAddress::output(s1, 0), PortAddress::input(r2, 0)).unwrap();
    engine.remove_edge(first).unwrap();
    assert_eq!(item_type(&engine, s1), Some(ItemType::new("iron")));
    assert_dynamic_invariants(engine.graph());
}

#[test]
fn scenario_e_highlight_follows_type() {
    let Fixture { mut engine, r1, r2, r3, s1 } = fixture();
    let sink = place(&mut engine, Node::sink());
    let typed_sink = place(&mut engine, Node::sink());
    let other = place(
        &mut engine,
        Node::recipe(Recipe::new("R4", "Mine").with_output("copper", 1)),
    );
    engine.add_edge(PortAddress::output(other, 0), PortAddress::input(typed_sink, 0)).unwrap();

    engine.start_drag(r1, 0, PortDirection::Output).unwrap();
    let lit = engine.highlights();

    assert!(lit.contains(&PortAddress::input(r2, 0)));
    assert!(lit.contains(&PortAddress::input(s1, 0)));
    assert!(lit.contains(&PortAddress::input(sink, 0)));
    assert!(!lit.contains(&PortAddress::input(r3, 0)));
    assert!(!lit.contains(&PortAddress::input(typed_sink, 0)));
    assert!(lit.iter().all(|p| p.direction == PortDirection::Input));

    // Pure projection: same graph, same origin, same answer
    assert_eq!(lit, engine.highlights());
    for port in &lit {
        assert!(engine.session().is_highlighted(engine.graph(), *port));
    }
}

#[test]
fn wildcard_origin_highlights_every_counterpart() {
    let Fixture { mut engine, r2, r3, s1, .. } = fixture();

    engine.start_drag(s1, 0, PortDirection::Output).unwrap();
    let lit = engine.highlights();
    assert!(lit.contains(&PortAddress::input(r2, 0)));
    assert!(lit.contains(&PortAddress::input(r3, 0)));
    assert!(!lit.contains(&PortAddress::input(s1, 0)));
}

#[test]
fn fixed_pairs_compatible_iff_types_equal() {
    let Fixture { engine, r1, r2, r3, .. } = fixture();
    let graph = engine.graph();
    let source = PortAddress::output(r1, 0);

    for target in [PortAddress::input(r2, 0), PortAddress::input(r3, 0)] {
        let same =
            engine.resolve_port_type(source).unwrap() == engine.resolve_port_type(target).unwrap();
        assert_eq!(engine.is_compatible(source, target), same);
        assert!(graph.node(target.node).is_some());
    }
    assert!(!engine.is_compatible(source, PortAddress::input(r1, 0)));
}

#[test]
fn every_removal_order_restores_untyped_splitter() {
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let mut engine = ConnectionEngine::default();
        let hub = place(&mut engine, Node::splitter());
        let mut edges: Vec<EdgeId> = Vec::new();
        for i in 0..3 {
            let recipe = Recipe::new(format!("Iron {i}"), "Mine").with_output("iron", 1);
            let src = place(&mut engine, Node::recipe(recipe));
            let edge = engine
                .add_edge(PortAddress::output(src, 0), PortAddress::input(hub, 0))
                .unwrap();
            edges.push(edge);
        }

        for (removed, &i) in order.iter().enumerate() {
            engine.remove_edge(edges[i]).unwrap();
            let remaining = 2 - removed;
            assert_eq!(item_type(&engine, hub).is_none(), remaining == 0);
            assert_dynamic_invariants(engine.graph());
        }
    }
}

#[test]
fn batch_removal_matches_sequential_outcome() {
    let Fixture { mut engine, r1, r2, s1, .. } = fixture();
    let sink = place(&mut engine, Node::sink());
    let a = engine.add_edge(PortAddress::output(r1, 0), PortAddress::input(s1, 0)).unwrap();
    let b = engine.add_edge(PortAddress::output(s1, 0), PortAddress::input(r2, 0)).unwrap();
    let c = engine.add_edge(PortAddress::output(s1, 0), PortAddress::input(sink, 0)).unwrap();

    let mut sequential = engine.clone();
    for id in [a, b, c] {
        sequential.remove_edge(id).unwrap();
    }
    engine.apply_edge_batch_removal(&[a, b, c]).unwrap();

    assert_eq!(engine.graph(), sequential.graph());
    assert_eq!(item_type(&engine, s1), None);
    assert_eq!(item_type(&engine, sink), None);
}

#[test]
fn removing_node_resets_neighbours() {
    let Fixture { mut engine, r1, s1, .. } = fixture();
    engine.add_edge(PortAddress::output(r1, 0), PortAddress::input(s1, 0)).unwrap();

    engine.remove_node(r1).unwrap();
    assert_eq!(item_type(&engine, s1), None);
    assert_eq!(engine.graph().edge_count(), 0);
}

#[test]
fn graph_survives_serialization() {
    let Fixture { mut engine, r1, s1, .. } = fixture();
    engine.add_edge(PortAddress::output(r1, 0), PortAddress::input(s1, 0)).unwrap();

    let text = ron::to_string(engine.graph()).unwrap();
    let loaded: Graph = ron::from_str(&text).unwrap();
    assert_eq!(&loaded, engine.graph());
    assert!(loaded.check_invariants().is_empty());
}
