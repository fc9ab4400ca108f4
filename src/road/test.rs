use crate::geo::Coord;
use crate::road::error::RoadError;
use crate::road::{
    AccessMask, NumberRange, NumberStyle, Numbers, RestrictionDescriptor, RestrictionKind,
    RoadDef, RoadFlags, RoadNetwork, RoadNodeRef,
};

fn straight(len: usize) -> Vec<Coord> {
    (0..len as i32).map(|i| Coord::new(0, i * 100)).collect()
}

fn node(index: usize, source_id: i64) -> RoadNodeRef {
    RoadNodeRef { index, source_id }
}

/// Two roads crossing at node 2, with nodes 1..=5 known.
fn junction() -> RoadNetwork {
    let mut network = RoadNetwork::new();

    let mut east = straight(3);
    network
        .add_road(
            RoadDef::new(10, 1000).with_nodes([node(0, 1), node(1, 2), node(2, 3)]),
            &mut east,
        )
        .unwrap();

    let mut north = straight(3);
    network
        .add_road(
            RoadDef::new(11, 1001).with_nodes([node(0, 4), node(1, 2), node(2, 5)]),
            &mut north,
        )
        .unwrap();

    network
}

#[test]
fn junction_nodes_are_shared() {
    let network = junction();

    assert_eq!(network.len(), 2);
    // Six references, five distinct nodes.
    assert_eq!(network.nodes().len(), 5);
    assert_eq!(network.node(2).map(|n| n.source_id), Some(2));
    assert!(network.node(6).is_none());
}

#[test]
fn registering_twice_keeps_one_def() {
    let mut network = RoadNetwork::new();
    let mut first = straight(4);
    let mut second = straight(4);

    let def = RoadDef::new(7, 70).with_nodes([node(0, 1), node(3, 2)]);
    let a = network.add_road(def.clone(), &mut first).unwrap();
    let b = network.add_road(def, &mut second).unwrap();

    assert_eq!(a, b);
    assert_eq!(network.len(), 1);
    assert!(second[0].is_routing_node());
    assert!(second[3].is_routing_node());
    assert!(!second[1].is_routing_node());
}

#[test]
fn node_reference_past_geometry_is_fatal() {
    let mut network = RoadNetwork::new();
    let mut points = straight(2);

    let result = network.add_road(RoadDef::new(1, 1).with_nodes([node(5, 9)]), &mut points);
    assert!(matches!(
        result,
        Err(RoadError::NodeIndex {
            index: 5,
            points: 2,
            ..
        })
    ));
}

#[test]
fn speed_is_shared_between_copies() {
    let mut network = RoadNetwork::new();
    let mut points = straight(3);
    let handle = network.add_road(RoadDef::new(3, 30), &mut points).unwrap();

    network.road_mut(handle).unwrap().set_speed(5).unwrap();
    network.freeze();

    // Two per-level copies only carry the handle.
    let (coarse, fine) = (handle, handle);
    assert_eq!(network.road(coarse).unwrap().speed().value(), 5);
    assert_eq!(
        network.road(coarse).unwrap().speed(),
        network.road(fine).unwrap().speed()
    );
}

#[test]
fn frozen_network_rejects_writes() {
    let mut network = junction();
    let handle = network.handle_of(10).unwrap();
    network.freeze();

    assert!(matches!(network.road_mut(handle), Err(RoadError::Frozen)));
    assert!(matches!(
        network.finalize_numbers(handle, &mut straight(3), vec![]),
        Err(RoadError::Frozen)
    ));

    let descriptor = RestrictionDescriptor::new(&[1, 2, 4], &[1000, 1001], AccessMask::empty());
    assert!(matches!(
        network.add_restriction(&descriptor),
        Err(RoadError::Frozen)
    ));
}

#[test]
fn numbers_count_preceding_nodes() {
    let mut network = RoadNetwork::new();
    let mut points = straight(6);
    let handle = network
        .add_road(
            RoadDef::new(1, 1).with_nodes([node(0, 1), node(5, 2)]),
            &mut points,
        )
        .unwrap();

    let odd = NumberRange::new(NumberStyle::Odd, 1, 9);
    let even = NumberRange::new(NumberStyle::Even, 2, 10);
    let numbers = vec![
        Numbers::new(3, odd, even),
        Numbers::new(0, odd, NumberRange::none()),
    ];

    network
        .finalize_numbers(handle, &mut points, numbers)
        .unwrap();

    assert!(points[3].is_number_node());
    assert!(points[0].is_number_node() && points[0].is_routing_node());

    let numbers = network.road(handle).unwrap().numbers();
    assert_eq!(numbers[0].index, 0);
    assert_eq!(numbers[0].node_number(), Some(0));
    assert_eq!(numbers[1].index, 3);
    assert_eq!(numbers[1].node_number(), Some(1));
}

#[test]
fn numbers_index_past_geometry_is_fatal() {
    let mut network = RoadNetwork::new();
    let mut points = straight(3);
    let handle = network.add_road(RoadDef::new(1, 1), &mut points).unwrap();

    let result = network.finalize_numbers(
        handle,
        &mut points,
        vec![Numbers::new(3, NumberRange::none(), NumberRange::none())],
    );

    assert!(matches!(
        result,
        Err(RoadError::NumbersIndex {
            index: 3,
            points: 3,
            ..
        })
    ));
    assert!(network.road(handle).unwrap().numbers().is_empty());
}

#[test_log::test]
fn resolves_three_node_restriction() {
    let network = junction();
    let descriptor = RestrictionDescriptor::new(&[1, 2, 5], &[1000, 1001], AccessMask::BUS);

    let restriction = network
        .resolve_restriction(&descriptor)
        .expect("all nodes are known");

    assert_eq!(restriction.from, network.node(1).unwrap().id);
    assert_eq!(restriction.via.as_slice(), &[network.node(2).unwrap().id]);
    assert_eq!(restriction.to, network.node(5).unwrap().id);
    assert_eq!(restriction.from_way, 1000);
    assert_eq!(restriction.to_way, 1001);
    assert!(restriction.via_ways.is_empty());
    assert_eq!(restriction.except, AccessMask::BUS);
    assert_eq!(restriction.kind, RestrictionKind::Not);
}

#[test_log::test]
fn missing_via_node_yields_no_restriction() {
    let network = junction();
    let descriptor = RestrictionDescriptor::new(&[1, 99, 5], &[1000, 1001], AccessMask::empty());

    assert!(network.resolve_restriction(&descriptor).is_none());
}

#[test_log::test]
fn four_node_restriction_keeps_via_way() {
    let network = junction();
    let descriptor = RestrictionDescriptor::new(&[1, 2, 3, 4], &[1000, 1002, 1001], AccessMask::empty())
        .with_kind(RestrictionKind::Only);

    let restriction = network.resolve_restriction(&descriptor).unwrap();
    assert_eq!(restriction.via.len(), 2);
    assert_eq!(restriction.via_ways.as_slice(), &[1002]);
    assert_eq!(restriction.to_way, 1001);
    assert_eq!(restriction.kind, RestrictionKind::Only);
}

#[test_log::test]
fn malformed_cardinality_is_dropped() {
    let mut network = junction();

    let two_nodes = RestrictionDescriptor::new(&[1, 2], &[1000], AccessMask::empty());
    let wrong_ways = RestrictionDescriptor::new(&[1, 2, 5], &[1000], AccessMask::empty());
    let five_nodes = RestrictionDescriptor::new(&[1, 2, 3, 4, 5], &[1, 2, 3, 4], AccessMask::empty());

    for descriptor in [two_nodes, wrong_ways, five_nodes] {
        assert!(network.resolve_restriction(&descriptor).is_none());
        assert!(!network.add_restriction(&descriptor).unwrap());
    }

    assert!(network.restrictions().is_empty());
}

#[test]
fn routing_graph_follows_direction() {
    let mut network = RoadNetwork::new();

    let mut two_way = straight(3);
    network
        .add_road(
            RoadDef::new(1, 1).with_nodes([node(0, 1), node(2, 2)]),
            &mut two_way,
        )
        .unwrap();

    let mut one_way = straight(3);
    network
        .add_road(
            RoadDef::new(2, 2)
                .with_flags(RoadFlags::ONEWAY)
                .with_nodes([node(0, 2), node(2, 3)]),
            &mut one_way,
        )
        .unwrap();

    let mut hidden = straight(2);
    network
        .add_road(
            RoadDef::new(3, 3)
                .with_flags(RoadFlags::SKIP_NOD)
                .with_nodes([node(0, 3), node(1, 4)]),
            &mut hidden,
        )
        .unwrap();

    let graph = network.routing_graph();
    let id = |source| network.node(source).unwrap().id;

    assert!(graph.contains_edge(id(1), id(2)));
    assert!(graph.contains_edge(id(2), id(1)));
    assert!(graph.contains_edge(id(2), id(3)));
    assert!(!graph.contains_edge(id(3), id(2)));
    assert!(!graph.contains_node(id(4)));
}
