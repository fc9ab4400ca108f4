//! Per-level geometry filters.
//!
//! A [`FilterChain`] runs every element of a level through an ordered
//! list of [`Filter`]s. A filter receives one element and forwards zero,
//! one or many elements through [`Forward`]: onwards to the next filter,
//! or back into its own stage when it has produced new fragments that
//! must still see the filters after it.

pub mod chain;
pub mod remove_empty;
pub mod round;
pub mod roundabout;
pub mod size;
pub mod split_line;
pub mod split_polygon;
pub mod split_span;


use crate::config::LevelSpec;
use crate::element::Element;
use crate::geo::shift_for;
use crate::road::RoadNetwork;

#[doc(inline)]
pub use chain::{FilterChain, Forward};
#[doc(inline)]
pub use remove_empty::RemoveEmptyFilter;
#[doc(inline)]
pub use round::RoundCoordsFilter;
#[doc(inline)]
pub use roundabout::RoundaboutFilter;
#[doc(inline)]
pub use size::SizeFilter;
#[doc(inline)]
pub use split_line::LineSplitterFilter;
#[doc(inline)]
pub use split_polygon::{AreaBisect, IndexBisect, PolygonSplitterFilter, SplitStrategy};
#[doc(inline)]
pub use split_span::SpanSplitterFilter;

/// The level a chain is being run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub level: u8,
    pub resolution: u8,
    /// Bits dropped from full precision at this level.
    pub shift: u8,
    /// The tile carries routing data.
    pub has_net: bool,
    /// This is the most detailed level, where roads are routable.
    pub routable: bool,
}

impl FilterConfig {
    pub fn new(spec: LevelSpec, has_net: bool, routable: bool) -> Self {
        FilterConfig {
            level: spec.level,
            resolution: spec.resolution,
            shift: shift_for(spec.resolution),
            has_net,
            routable,
        }
    }
}

#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    pub config: &'a FilterConfig,
    /// Read only, the network is frozen before levels are filtered.
    pub network: &'a RoadNetwork,
}

impl<'a> FilterContext<'a> {
    pub fn new(config: &'a FilterConfig, network: &'a RoadNetwork) -> Self {
        Self { config, network }
    }
}

pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Consumes `element`, forwarding whatever should continue.
    /// Dropping an element is simply not forwarding it.
    fn apply(&self, element: Element, context: &FilterContext<'_>, forward: &mut Forward<'_>);
}
