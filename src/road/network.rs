use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use log::{debug, warn};
use petgraph::prelude::DiGraphMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::geo::{Coord, CoordFlags};
use crate::road::def::{RoadDef, RoadHandle};
use crate::road::error::RoadError;
use crate::road::node::{CoordNode, NodeId, NodeTable};
use crate::road::numbers::Numbers;
use crate::road::restriction::{GeneralRouteRestriction, RestrictionDescriptor};

pub type RoutingGraph = DiGraphMap<NodeId, RoadHandle>;

/// Owns every `RoadDef` of a tile, the routing node table and the
/// accepted turn restrictions.
///
/// The network has two phases. While open, roads are registered and
/// finalised through `&mut self`. Once [`RoadNetwork::freeze`] is called
/// every mutating operation fails with [`RoadError::Frozen`], and the
/// per-level copies of roads may read it freely.
#[derive(Default)]
pub struct RoadNetwork {
    roads: Vec<RoadDef>,
    by_road_id: FxHashMap<u64, RoadHandle>,
    nodes: NodeTable,
    restrictions: Vec<GeneralRouteRestriction>,
    frozen: bool,
}

impl Debug for RoadNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RoadNetwork with Roads: {}, Nodes: {}, Restrictions: {}",
            self.roads.len(),
            self.nodes.len(),
            self.restrictions.len()
        )
    }
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), RoadError> {
        if self.frozen {
            Err(RoadError::Frozen)
        } else {
            Ok(())
        }
    }

    /// Registers the road under its logical id and flags its routing nodes
    /// within `points`.
    ///
    /// Registering the same logical road again returns the existing handle;
    /// only the geometry of the new copy is flagged.
    pub fn add_road(&mut self, def: RoadDef, points: &mut [Coord]) -> Result<RoadHandle, RoadError> {
        self.ensure_open()?;

        if let Some(handle) = self.by_road_id.get(&def.road_id()).copied() {
            debug!("Road {} already registered as {:?}", def.road_id(), handle);
            let existing = &self.roads[handle.index()];
            Self::flag_nodes(existing, points, &mut self.nodes)?;
            return Ok(handle);
        }

        Self::flag_nodes(&def, points, &mut self.nodes)?;

        let handle = RoadHandle(self.roads.len() as u32);
        self.by_road_id.insert(def.road_id(), handle);
        self.roads.push(def);

        Ok(handle)
    }

    fn flag_nodes(def: &RoadDef, points: &mut [Coord], nodes: &mut NodeTable) -> Result<(), RoadError> {
        let len = points.len();

        for node in def.nodes() {
            let point = points.get_mut(node.index).ok_or(RoadError::NodeIndex {
                road_id: def.road_id(),
                index: node.index,
                points: len,
            })?;

            point.mark(CoordFlags::ROUTING_NODE);
            nodes.insert(node.source_id, *point);
        }

        Ok(())
    }

    /// Anchors the address ranges of a road to its geometry.
    ///
    /// Each referenced point is flagged as a number node, and each record
    /// learns its node number: how many node points precede its anchor.
    /// This must happen before any level splits the road, so the flags
    /// travel with the coordinates into every fragment.
    pub fn finalize_numbers(
        &mut self,
        handle: RoadHandle,
        points: &mut [Coord],
        mut numbers: Vec<Numbers>,
    ) -> Result<(), RoadError> {
        self.ensure_open()?;

        let def = self
            .roads
            .get_mut(handle.index())
            .ok_or(RoadError::UnknownRoad(handle))?;

        numbers.sort_by_key(|n| n.index);

        if let Some(bad) = numbers.iter().find(|n| n.index >= points.len()) {
            return Err(RoadError::NumbersIndex {
                road_id: def.road_id(),
                index: bad.index,
                points: points.len(),
            });
        }

        for record in &numbers {
            points[record.index].mark(CoordFlags::NUMBER_NODE);
        }

        // Prefix count of node points, so node_number(i) = flagged points before i.
        let mut preceding = Vec::with_capacity(points.len());
        points.iter().fold(0u32, |count, point| {
            preceding.push(count);
            count + point.is_preserved() as u32
        });

        for record in numbers.iter_mut() {
            record.assign_node_number(preceding[record.index]);
        }

        def.set_numbers(numbers);
        Ok(())
    }

    /// Resolves a raw descriptor against the node table.
    ///
    /// Yields `None`, with a warning, when the descriptor has the wrong
    /// shape or names a node which is not a routing node of this tile.
    pub fn resolve_restriction(
        &self,
        descriptor: &RestrictionDescriptor,
    ) -> Option<GeneralRouteRestriction> {
        if !descriptor.has_valid_cardinality() {
            warn!(
                "Dropping restriction with {} nodes and {} ways, expected 3 or 4 nodes joined by one fewer ways",
                descriptor.node_ids.len(),
                descriptor.way_ids.len()
            );
            return None;
        }

        let resolved = descriptor
            .node_ids
            .iter()
            .map(|id| self.nodes.resolve(*id).map(|node| node.id))
            .collect::<Option<SmallVec<[NodeId; 4]>>>();

        let Some(nodes) = resolved else {
            let missing = descriptor
                .node_ids
                .iter()
                .filter(|id| self.nodes.resolve(**id).is_none())
                .join(", ");
            warn!("Dropping restriction referencing unknown nodes: {missing}");
            return None;
        };

        let (from, via, to) = match nodes.as_slice() {
            [from, via @ .., to] => (*from, SmallVec::from_slice(via), *to),
            _ => return None,
        };

        let ways = &descriptor.way_ids;
        Some(GeneralRouteRestriction {
            kind: descriptor.kind,
            from,
            via,
            to,
            from_way: ways[0],
            via_ways: SmallVec::from_slice(&ways[1..ways.len() - 1]),
            to_way: ways[ways.len() - 1],
            except: descriptor.except,
        })
    }

    /// Resolves and stores a restriction. `Ok(false)` means it was dropped.
    pub fn add_restriction(&mut self, descriptor: &RestrictionDescriptor) -> Result<bool, RoadError> {
        self.ensure_open()?;

        match self.resolve_restriction(descriptor) {
            Some(restriction) => {
                self.restrictions.push(restriction);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ends the write phase.
    pub fn freeze(&mut self) {
        debug!("Freezing {:?}", self);
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn road(&self, handle: RoadHandle) -> Option<&RoadDef> {
        self.roads.get(handle.index())
    }

    pub fn road_mut(&mut self, handle: RoadHandle) -> Result<&mut RoadDef, RoadError> {
        self.ensure_open()?;
        self.roads
            .get_mut(handle.index())
            .ok_or(RoadError::UnknownRoad(handle))
    }

    pub fn handle_of(&self, road_id: u64) -> Option<RoadHandle> {
        self.by_road_id.get(&road_id).copied()
    }

    pub fn roads(&self) -> impl Iterator<Item = (RoadHandle, &RoadDef)> {
        self.roads
            .iter()
            .enumerate()
            .map(|(index, def)| (RoadHandle(index as u32), def))
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn node(&self, source_id: i64) -> Option<&CoordNode> {
        self.nodes.resolve(source_id)
    }

    pub fn restrictions(&self) -> &[GeneralRouteRestriction] {
        &self.restrictions
    }

    /// The directed node-to-node graph the routing data describes.
    ///
    /// Consecutive routing nodes along a road are joined by an edge
    /// weighted with the road's handle, in both directions unless the road
    /// is one way. Roads flagged `SKIP_NOD` take no part.
    pub fn routing_graph(&self) -> RoutingGraph {
        let mut graph = RoutingGraph::new();

        for (handle, def) in self.roads().filter(|(_, def)| !def.skip_nod()) {
            def.nodes()
                .iter()
                .filter_map(|node| self.nodes.resolve(node.source_id).map(|n| n.id))
                .tuple_windows()
                .for_each(|(a, b)| {
                    graph.add_edge(a, b, handle);
                    if !def.is_oneway() {
                        graph.add_edge(b, a, handle);
                    }
                });
        }

        graph
    }
}
