#![doc = include_str!("../README.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

use std::fmt::{Display, Formatter};

pub mod collector;
pub mod config;
pub mod element;
pub mod filter;
pub mod geo;
pub mod level;
pub mod overview;
pub mod road;
pub mod tile;
pub mod util;

#[cfg(test)]
pub(crate) mod fixtures;

#[doc(inline)]
pub use collector::FeatureCollector;
#[doc(inline)]
pub use config::CompileOptions;
#[doc(inline)]
pub use element::Element;
#[doc(inline)]
pub use filter::FilterChain;
#[doc(inline)]
pub use level::LevelDecomposer;
#[doc(inline)]
pub use overview::OverviewAggregator;
#[doc(inline)]
pub use road::RoadNetwork;

use crate::config::ConfigError;
use crate::geo::error::GeoError;
use crate::level::error::SubdivisionError;
use crate::overview::error::OverviewError;
use crate::road::error::RoadError;
use crate::util::bits::FieldWidth;

pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline stage a tile failed in, reported alongside the tile id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Subsystem {
    Collect,
    Road,
    Filter,
    Decompose,
    Overview,
}

#[derive(Debug)]
pub enum Error {
    Geo(GeoError),
    Subdivision(SubdivisionError),
    Road(RoadError),
    Overview(OverviewError),
    Config(ConfigError),
    FieldWidth(FieldWidth),
    Tile {
        tile: u32,
        subsystem: Subsystem,
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps the error at the tile-compilation boundary.
    pub fn in_tile(self, tile: u32, subsystem: Subsystem) -> Self {
        match self {
            // Already attributed, keep the innermost origin.
            Error::Tile { .. } => self,
            other => Error::Tile {
                tile,
                subsystem,
                source: Box::new(other),
            },
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Geo(e) => write!(f, "geo: {e}"),
            Error::Subdivision(e) => write!(f, "subdivision: {e}"),
            Error::Road(e) => write!(f, "road network: {e}"),
            Error::Overview(e) => write!(f, "overview: {e}"),
            Error::Config(e) => write!(f, "config: {e}"),
            Error::FieldWidth(e) => write!(f, "{e}"),
            Error::Tile {
                tile,
                subsystem,
                source,
            } => write!(f, "tile {tile} aborted in {subsystem}: {source}"),
        }
    }
}

impl std::error::Error for Error {}

impl_err!(GeoError, Geo);
impl_err!(SubdivisionError, Subdivision);
impl_err!(RoadError, Road);
impl_err!(OverviewError, Overview);
impl_err!(ConfigError, Config);
impl_err!(FieldWidth, FieldWidth);
