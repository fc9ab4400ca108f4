use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::geo::error::GeoError;
use crate::geo::{round_nearest, MapUnit, UNITS_PER_DEGREE};

pub type Degree = f64;

bitflags! {
    /// Roles a coordinate plays in the routing graph.
    ///
    /// Flags are only ever added. A simplification step may drop a
    /// whole coordinate that carries none of them, but never strips one.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CoordFlags: u8 {
        /// A vertex of the routing graph, shared between roads.
        const ROUTING_NODE = 1 << 0;
        /// Anchors an address range (`Numbers`) on its road.
        const NUMBER_NODE = 1 << 1;
        /// Must survive simplification even though it is not a vertex.
        const TREAT_AS_NODE = 1 << 2;
    }
}

/// `Coord`
/// A fixed-point latitude, longitude pair in 24-bit map units.
///
/// Equality and hashing only consider the position, two coordinates
/// at the same place with different flags compare equal.
///
/// ```rust
/// use mapc::geo::Coord;
/// let coord = Coord::from_degrees(51.5, -0.12).unwrap();
/// assert!((coord.lat_degrees() - 51.5).abs() < 1e-4);
/// ```
#[derive(Clone, Copy)]
pub struct Coord {
    pub lat: MapUnit,
    pub lon: MapUnit,
    flags: CoordFlags,
}

impl Coord {
    pub const fn new(lat: MapUnit, lon: MapUnit) -> Self {
        Coord {
            lat,
            lon,
            flags: CoordFlags::empty(),
        }
    }

    pub const fn with_flags(lat: MapUnit, lon: MapUnit, flags: CoordFlags) -> Self {
        Coord { lat, lon, flags }
    }

    pub fn from_degrees(lat: Degree, lon: Degree) -> Result<Self, GeoError> {
        if !(-90f64..=90f64).contains(&lat) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Latitude must be within -90 and 90. Given: {}",
                lat
            )));
        }

        if !(-180f64..=180f64).contains(&lon) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Longitude must be within -180 and 180. Given: {}",
                lon
            )));
        }

        Ok(Coord::new(
            (lat * UNITS_PER_DEGREE).round() as MapUnit,
            (lon * UNITS_PER_DEGREE).round() as MapUnit,
        ))
    }

    pub fn lat_degrees(&self) -> Degree {
        self.lat as f64 / UNITS_PER_DEGREE
    }

    pub fn lon_degrees(&self) -> Degree {
        self.lon as f64 / UNITS_PER_DEGREE
    }

    #[inline]
    pub fn flags(&self) -> CoordFlags {
        self.flags
    }

    /// Adds `flags` to the coordinate. There is deliberately no way to
    /// remove a flag once set.
    #[inline]
    pub fn mark(&mut self, flags: CoordFlags) {
        self.flags |= flags;
    }

    #[inline]
    pub fn is_routing_node(&self) -> bool {
        self.flags.contains(CoordFlags::ROUTING_NODE)
    }

    #[inline]
    pub fn is_number_node(&self) -> bool {
        self.flags.contains(CoordFlags::NUMBER_NODE)
    }

    /// True when simplification must keep this coordinate.
    #[inline]
    pub fn is_preserved(&self) -> bool {
        !self.flags.is_empty()
    }

    /// The coordinate snapped to the grid of a level with the given `shift`,
    /// keeping its flags.
    #[inline]
    pub fn rounded(&self, shift: u8) -> Coord {
        Coord {
            lat: round_nearest(self.lat, shift),
            lon: round_nearest(self.lon, shift),
            flags: self.flags,
        }
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

impl Eq for Coord {}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat.hash(state);
        self.lon.hash(state);
    }
}

impl From<(MapUnit, MapUnit)> for Coord {
    /// Format is: (Lat, Lon)
    fn from((lat, lon): (MapUnit, MapUnit)) -> Self {
        Coord::new(lat, lon)
    }
}

impl From<&Coord> for ::geo::Coord<f64> {
    fn from(value: &Coord) -> Self {
        ::geo::Coord {
            x: value.lon as f64,
            y: value.lat as f64,
        }
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {})", self.lon, self.lat)?;
        if !self.flags.is_empty() {
            write!(f, "[{:?}]", self.flags)?;
        }
        Ok(())
    }
}
