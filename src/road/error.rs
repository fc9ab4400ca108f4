use std::fmt::{Display, Formatter};

use crate::road::def::RoadHandle;
use crate::util::bits::FieldWidth;

#[derive(Debug)]
pub enum RoadError {
    UnknownRoad(RoadHandle),
    /// A routing node reference points past the end of the road geometry.
    NodeIndex {
        road_id: u64,
        index: usize,
        points: usize,
    },
    /// An address range is anchored to a point the road does not have.
    NumbersIndex {
        road_id: u64,
        index: usize,
        points: usize,
    },
    /// The network was frozen for rendering and can no longer be mutated.
    Frozen,
    Width(FieldWidth),
}

crate::impl_err!(FieldWidth, RoadError, Width);

impl Display for RoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadError::UnknownRoad(handle) => write!(f, "no road registered for {handle:?}"),
            RoadError::NodeIndex {
                road_id,
                index,
                points,
            } => write!(
                f,
                "road {road_id} references routing node at point {index}, but has {points} points"
            ),
            RoadError::NumbersIndex {
                road_id,
                index,
                points,
            } => write!(
                f,
                "road {road_id} has numbers at point {index}, but has {points} points"
            ),
            RoadError::Frozen => write!(f, "road network is frozen"),
            RoadError::Width(e) => write!(f, "{e}"),
        }
    }
}
