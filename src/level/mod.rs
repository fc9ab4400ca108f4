//! Level decomposition: the per-level element sets of a tile and the
//! tree of subdivisions partitioning them.
//!
//! Levels are listed coarsest first. Each level's subdivisions are the
//! children of the level before it, so the finer level can only be
//! partitioned once its parents are known, and a parent only learns its
//! first child once the finer level is complete.

pub mod decompose;
#[doc(hidden)]
pub mod error;
pub mod header;
pub mod subdivision;


#[doc(inline)]
pub use decompose::{Decomposition, Level, LevelDecomposer};
#[doc(inline)]
pub use header::SubdivisionHeader;
#[doc(inline)]
pub use subdivision::{Counts, Subdivision, TypeFlags};
