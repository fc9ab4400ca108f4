//! The overview map: a coarse view over every tile of a batch, holding the
//! lines and shapes each tile shows at low resolution, a rectangle for the
//! area of each tile and the merged copyright notices.

pub mod aggregate;
#[doc(hidden)]
pub mod error;


#[doc(inline)]
pub use aggregate::{Overview, OverviewAggregator, COVERAGE_TYPE};
