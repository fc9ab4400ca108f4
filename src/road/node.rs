use rustc_hash::FxHashMap;

use crate::geo::Coord;

/// Dense identifier of a routing graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// A coordinate acting as a vertex of the routing graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordNode {
    pub id: NodeId,
    pub source_id: i64,
    pub coord: Coord,
}

/// Every routing node of a tile, addressable by upstream node id.
#[derive(Debug, Default)]
pub struct NodeTable {
    nodes: Vec<CoordNode>,
    by_source: FxHashMap<i64, NodeId>,
}

impl NodeTable {
    /// Returns the node for `source_id`, creating it at `coord` when unseen.
    /// Roads meeting at a junction therefore share one `CoordNode`.
    pub fn insert(&mut self, source_id: i64, coord: Coord) -> NodeId {
        if let Some(id) = self.by_source.get(&source_id) {
            return *id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(CoordNode {
            id,
            source_id,
            coord,
        });
        self.by_source.insert(source_id, id);
        id
    }

    #[inline]
    pub fn resolve(&self, source_id: i64) -> Option<&CoordNode> {
        self.by_source
            .get(&source_id)
            .and_then(|id| self.nodes.get(id.0 as usize))
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&CoordNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoordNode> {
        self.nodes.iter()
    }
}
