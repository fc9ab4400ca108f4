//! The routing data of a tile: logical roads, routing nodes,
//! address ranges and turn restrictions.

pub mod def;
#[doc(hidden)]
pub mod error;
pub mod network;
pub mod node;
pub mod numbers;
pub mod restriction;

#[doc(hidden)]
#[cfg(test)]
mod test;

#[doc(inline)]
pub use def::{
    AccessMask, RoadClass, RoadDef, RoadFlags, RoadHandle, RoadNodeRef, RoadSpeed, MAX_ROAD_CLASS,
};
#[doc(inline)]
pub use network::{RoadNetwork, RoutingGraph};
#[doc(inline)]
pub use node::{CoordNode, NodeId};
#[doc(inline)]
pub use numbers::{NumberRange, NumberStyle, Numbers};
#[doc(inline)]
pub use restriction::{GeneralRouteRestriction, RestrictionDescriptor, RestrictionKind};
