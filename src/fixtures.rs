//! Synthetic map data shared by the tests.

use crate::element::{Feature, MapLine, MapPoint, MapShape};
use crate::geo::{Area, Coord};
use crate::road::{
    AccessMask, NumberRange, NumberStyle, Numbers, RestrictionDescriptor, RoadDef, RoadNodeRef,
};
use crate::tile::{RoadSource, TileSource};

/// Side of a sample tile, in map units.
pub const TILE_SIZE: i32 = 0x4000;

/// `len` points heading east from `origin`, `step` units apart.
pub fn eastward(origin: Coord, len: usize, step: i32) -> Vec<Coord> {
    (0..len as i32)
        .map(|i| Coord::new(origin.lat, origin.lon + i * step))
        .collect()
}

/// A closed, counter-clockwise square of `4 * per_side + 1` points,
/// with sides of `step * per_side` units.
pub fn square_ring(origin: Coord, step: i32, per_side: usize) -> Vec<Coord> {
    let size = step * per_side as i32;
    let Coord { lat, lon, .. } = origin;
    let steps = || (0..per_side as i32).map(|i| i * step);

    let mut ring = Vec::with_capacity(per_side * 4 + 1);
    ring.extend(steps().map(|d| Coord::new(lat, lon + d)));
    ring.extend(steps().map(|d| Coord::new(lat + d, lon + size)));
    ring.extend(steps().map(|d| Coord::new(lat + size, lon + size - d)));
    ring.extend(steps().map(|d| Coord::new(lat + size - d, lon)));
    ring.push(ring[0]);
    ring
}

pub fn line(type_code: u16, points: Vec<Coord>) -> MapLine {
    MapLine::new(Feature::new(type_code, 0), points)
}

pub fn shape(type_code: u16, points: Vec<Coord>) -> MapShape {
    MapShape::new(Feature::new(type_code, 0), points)
}

pub fn node(index: usize, source_id: i64) -> RoadNodeRef {
    RoadNodeRef { index, source_id }
}

/// A tile `TILE_SIZE` units square whose south west corner is at
/// `(0, west)`: a town, a river, a lake and two crossing roads with
/// one address range and one turn restriction.
pub fn sample_tile(id: u32, west: i32) -> TileSource {
    let bounds = Area::new(0, west, TILE_SIZE, west + TILE_SIZE);
    let center = bounds.center();

    let town = MapPoint::new(
        Feature::new(0x0d, 0).with_label("Town").with_resolution(18, 24),
        center,
    );
    let cafe = MapPoint::new(
        Feature::new(0x2a, 0x0e).with_resolution(22, 24),
        Coord::new(center.lat + 40, center.lon + 40),
    );

    let river = MapLine::new(
        Feature::new(0x1f, 0).with_resolution(16, 24),
        eastward(Coord::new(0x1000, west), 300, TILE_SIZE / 300),
    );

    let lake = MapShape::new(
        Feature::new(0x3c, 0).with_resolution(20, 24),
        square_ring(Coord::new(0x2000, west + 0x2000), 16, 75),
    );

    // Crossing at the centre, sharing node 2.
    let step = 0x400;
    let main_street = RoadSource {
        line: MapLine::new(
            Feature::new(0x01, 0).with_resolution(16, 24),
            eastward(Coord::new(center.lat, center.lon - 2 * step), 5, step),
        ),
        def: RoadDef::new(id as u64 * 100 + 1, 1001)
            .with_nodes([node(0, 1), node(2, 2), node(4, 3)]),
        numbers: vec![
            Numbers::new(
                0,
                NumberRange::new(NumberStyle::Odd, 1, 19),
                NumberRange::new(NumberStyle::Even, 2, 20),
            ),
            Numbers::new(2, NumberRange::new(NumberStyle::Odd, 21, 39), NumberRange::none()),
        ],
    };

    let high_street = RoadSource {
        line: MapLine::new(
            Feature::new(0x02, 0).with_resolution(20, 24),
            (0..5)
                .map(|i| Coord::new(center.lat + (i - 2) * step, center.lon))
                .collect(),
        ),
        def: RoadDef::new(id as u64 * 100 + 2, 1002)
            .with_nodes([node(0, 4), node(2, 2), node(4, 5)]),
        numbers: vec![],
    };

    TileSource::new(id)
        .with_bounds(bounds)
        .with_copyright(format!("tile {id} contributors"))
        .with_copyright("Sample Data")
        .with_point(town)
        .with_point(cafe)
        .with_line(river)
        .with_shape(lake)
        .with_road(main_street)
        .with_road(high_street)
        .with_restriction(RestrictionDescriptor::new(
            &[1, 2, 5],
            &[1001, 1002],
            AccessMask::EMERGENCY,
        ))
}
