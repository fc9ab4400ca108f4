//! The per-tile compilation boundary and the batch driver.
//!
//! A tile is compiled start to finish on its own: collected, filtered per
//! level and decomposed into subdivisions. Any error inside is attributed
//! to the tile and the stage it came from, and never reaches sibling tiles.
//! Only the overview joins the tiles of a batch back together.

pub mod batch;
pub mod compile;
pub mod summary;

#[doc(hidden)]
#[cfg(test)]
mod test;

#[doc(inline)]
pub use batch::{compile_batch, BatchOutput};
#[doc(inline)]
pub use compile::{compile_tile, CompiledTile, RoadSource, TileSource};
#[doc(inline)]
pub use summary::TileSummary;
