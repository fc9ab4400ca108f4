//! Turn restrictions, as raw upstream descriptors and in their
//! resolved form against the node table.

use smallvec::SmallVec;
use strum::{AsRefStr, Display, EnumString};

use crate::road::def::AccessMask;
use crate::road::node::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RestrictionKind {
    /// The described manoeuvre is forbidden.
    #[default]
    Not,
    /// The described manoeuvre is the only one allowed.
    Only,
}

/// A restriction as it arrives from upstream: node and way ids in
/// travel order, not yet checked against anything.
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionDescriptor {
    pub node_ids: SmallVec<[i64; 4]>,
    pub way_ids: SmallVec<[i64; 3]>,
    pub except: AccessMask,
    pub kind: RestrictionKind,
}

impl RestrictionDescriptor {
    pub fn new(node_ids: &[i64], way_ids: &[i64], except: AccessMask) -> Self {
        RestrictionDescriptor {
            node_ids: SmallVec::from_slice(node_ids),
            way_ids: SmallVec::from_slice(way_ids),
            except,
            kind: RestrictionKind::Not,
        }
    }

    pub fn with_kind(self, kind: RestrictionKind) -> Self {
        RestrictionDescriptor { kind, ..self }
    }

    /// 3 or 4 nodes, joined by exactly one fewer ways.
    pub fn has_valid_cardinality(&self) -> bool {
        matches!(self.node_ids.len(), 3 | 4) && self.way_ids.len() + 1 == self.node_ids.len()
    }
}

/// A restriction whose every node resolved to a routing node.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralRouteRestriction {
    pub kind: RestrictionKind,
    pub from: NodeId,
    pub via: SmallVec<[NodeId; 2]>,
    pub to: NodeId,
    pub from_way: i64,
    pub via_ways: SmallVec<[i64; 1]>,
    pub to_way: i64,
    pub except: AccessMask,
}
