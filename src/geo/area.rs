use serde::{Deserialize, Serialize};

use crate::geo::{Coord, MapUnit};

/// An inclusive, axis aligned bounding box in map units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    pub min_lat: MapUnit,
    pub min_lon: MapUnit,
    pub max_lat: MapUnit,
    pub max_lon: MapUnit,
}

impl Area {
    pub const fn new(min_lat: MapUnit, min_lon: MapUnit, max_lat: MapUnit, max_lon: MapUnit) -> Self {
        Area {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// A zero-sized area around a single coordinate.
    pub const fn point(coord: &Coord) -> Self {
        Area::new(coord.lat, coord.lon, coord.lat, coord.lon)
    }

    /// The smallest area containing every coordinate, `None` if there are none.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let first = coords.next()?;

        Some(coords.fold(Area::point(first), |mut area, coord| {
            area.extend(coord);
            area
        }))
    }

    #[inline]
    pub fn extend(&mut self, coord: &Coord) {
        self.min_lat = self.min_lat.min(coord.lat);
        self.min_lon = self.min_lon.min(coord.lon);
        self.max_lat = self.max_lat.max(coord.lat);
        self.max_lon = self.max_lon.max(coord.lon);
    }

    #[inline]
    pub fn merge(&mut self, other: &Area) {
        self.min_lat = self.min_lat.min(other.min_lat);
        self.min_lon = self.min_lon.min(other.min_lon);
        self.max_lat = self.max_lat.max(other.max_lat);
        self.max_lon = self.max_lon.max(other.max_lon);
    }

    #[inline]
    pub fn contains(&self, coord: &Coord) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }

    #[inline]
    pub fn width(&self) -> MapUnit {
        self.max_lon - self.min_lon
    }

    #[inline]
    pub fn height(&self) -> MapUnit {
        self.max_lat - self.min_lat
    }

    #[inline]
    pub fn max_dimension(&self) -> MapUnit {
        self.width().max(self.height())
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            self.min_lat + self.height() / 2,
            self.min_lon + self.width() / 2,
        )
    }

    /// Splits the area into four, in the order SW, SE, NW, NE.
    ///
    /// The southern and western halves own the dividing line, the
    /// northern and eastern ones start one unit past it.
    pub fn quadrants(&self) -> [Area; 4] {
        let Coord { lat, lon, .. } = self.center();
        let upper_lat = (lat + 1).min(self.max_lat);
        let upper_lon = (lon + 1).min(self.max_lon);

        [
            Area::new(self.min_lat, self.min_lon, lat, lon),
            Area::new(self.min_lat, upper_lon, lat, self.max_lon),
            Area::new(upper_lat, self.min_lon, self.max_lat, lon),
            Area::new(upper_lat, upper_lon, self.max_lat, self.max_lon),
        ]
    }

    /// Index into [`Area::quadrants`] of the quadrant owning `coord`.
    pub fn quadrant_of(&self, coord: &Coord) -> usize {
        let center = self.center();
        let north = coord.lat > center.lat;
        let east = coord.lon > center.lon;

        (north as usize) * 2 + east as usize
    }

    /// Four corner coordinates, counter-clockwise from the south west,
    /// closed back onto the first.
    pub fn ring(&self) -> Vec<Coord> {
        vec![
            Coord::new(self.min_lat, self.min_lon),
            Coord::new(self.min_lat, self.max_lon),
            Coord::new(self.max_lat, self.max_lon),
            Coord::new(self.max_lat, self.min_lon),
            Coord::new(self.min_lat, self.min_lon),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_coords() {
        let coords = [Coord::new(4, -2), Coord::new(-1, 7), Coord::new(3, 3)];
        let area = Area::from_coords(&coords).unwrap();
        assert_eq!(area, Area::new(-1, -2, 4, 7));
        assert_eq!(area.max_dimension(), 9);
        assert!(Area::from_coords(&Vec::<Coord>::new()).is_none());
    }

    #[test]
    fn quadrants_partition_the_area() {
        let area = Area::new(0, 0, 10, 10);
        let quads = area.quadrants();

        for lat in 0..=10 {
            for lon in 0..=10 {
                let coord = Coord::new(lat, lon);
                let owners = quads.iter().filter(|q| q.contains(&coord)).count();
                assert_eq!(owners, 1, "{coord:?} owned by {owners} quadrants");
                assert!(quads[area.quadrant_of(&coord)].contains(&coord));
            }
        }
    }

    #[test]
    fn ring_is_closed() {
        let ring = Area::new(0, 0, 2, 3).ring();
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }
}
