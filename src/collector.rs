//! Gathers the elements of one tile, tracking the tile bounds, the
//! catalogue of feature types present, and the roads' routing data.

use std::collections::BTreeMap;

use log::{debug, trace};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::element::{Element, Feature, MapLine, MapPoint, MapRoad, MapShape};
use crate::geo::{Area, Coord};
use crate::road::error::RoadError;
use crate::road::{Numbers, RoadDef, RoadHandle, RoadNetwork};

/// Type code of the shape tracing the tile bounds.
pub const BACKGROUND_TYPE: u16 = 0x4b;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum OverviewKind {
    Point,
    Line,
    Polygon,
}

/// One catalogue entry: the coarsest resolution a type is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRecord {
    pub kind: OverviewKind,
    pub type_code: u16,
    pub sub_type: u8,
    pub min_resolution: u8,
}

#[derive(Debug, Default)]
pub struct FeatureCollector {
    points: Vec<Element>,
    lines: Vec<Element>,
    shapes: Vec<Element>,
    bounds: Option<Area>,
    overview: BTreeMap<(OverviewKind, u32), u8>,
    network: RoadNetwork,
    road_lines: FxHashMap<RoadHandle, usize>,
    finished: bool,
}

impl FeatureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_overview(&mut self, kind: OverviewKind, feature: &Feature) {
        self.overview
            .entry((kind, feature.overview_key()))
            .and_modify(|resolution| *resolution = (*resolution).min(feature.min_resolution))
            .or_insert(feature.min_resolution);
    }

    pub fn add_point(&mut self, point: MapPoint) {
        self.record_overview(OverviewKind::Point, &point.feature);
        self.points.push(Element::Point(point));
    }

    pub fn add_line(&mut self, line: MapLine) {
        if line.points.is_empty() {
            trace!("Dropping line {:#x} without geometry", line.feature.type_code);
            return;
        }

        self.record_overview(OverviewKind::Line, &line.feature);
        self.lines.push(Element::Line(line));
    }

    pub fn add_shape(&mut self, shape: MapShape) {
        if shape.points.is_empty() {
            trace!("Dropping shape {:#x} without geometry", shape.feature.type_code);
            return;
        }

        self.record_overview(OverviewKind::Polygon, &shape.feature);
        self.shapes.push(Element::Shape(shape));
    }

    /// Registers the road's `RoadDef` with the network and files the road
    /// with the lines. A road without geometry is dropped and yields `None`.
    pub fn add_road(&mut self, mut line: MapLine, def: RoadDef) -> Result<Option<RoadHandle>, RoadError> {
        if line.points.is_empty() {
            trace!("Dropping road {} without geometry", def.road_id());
            return Ok(None);
        }

        let handle = self.network.add_road(def, &mut line.points)?;

        self.record_overview(OverviewKind::Line, &line.feature);
        self.road_lines.entry(handle).or_insert(self.lines.len());
        self.lines.push(Element::Road(MapRoad::new(line, handle)));

        Ok(Some(handle))
    }

    /// Anchors address ranges on the first registered copy of the road.
    pub fn finalize_numbers(&mut self, handle: RoadHandle, numbers: Vec<Numbers>) -> Result<(), RoadError> {
        let index = *self
            .road_lines
            .get(&handle)
            .ok_or(RoadError::UnknownRoad(handle))?;

        self.network
            .finalize_numbers(handle, self.lines[index].points_mut(), numbers)
    }

    pub fn add_to_bounds(&mut self, coord: &Coord) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(coord),
            None => self.bounds = Some(Area::point(coord)),
        }
    }

    /// Adds the background shape covering the bounds. It is structural
    /// and stays out of the overview catalogue.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        let Some(bounds) = self.bounds else {
            debug!("Finished collection without bounds, no background added");
            return;
        };

        let feature = Feature::new(BACKGROUND_TYPE, 0)
            .with_resolution(0, 24)
            .skipping_size_filter();

        self.shapes
            .push(Element::Shape(MapShape::new(feature, bounds.ring())));
    }

    pub fn bounds(&self) -> Option<Area> {
        self.bounds
    }

    pub fn points(&self) -> &[Element] {
        &self.points
    }

    pub fn lines(&self) -> &[Element] {
        &self.lines
    }

    pub fn shapes(&self) -> &[Element] {
        &self.shapes
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.points
            .iter()
            .chain(self.lines.iter())
            .chain(self.shapes.iter())
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut RoadNetwork {
        &mut self.network
    }

    pub fn into_network(self) -> RoadNetwork {
        self.network
    }

    /// Minimum resolution recorded for a kind and `type << 8 | sub_type` key.
    pub fn overview_resolution(&self, kind: OverviewKind, key: u32) -> Option<u8> {
        self.overview.get(&(kind, key)).copied()
    }

    /// The catalogue, ordered by kind and then by key.
    pub fn overview_records(&self) -> Vec<OverviewRecord> {
        self.overview
            .iter()
            .map(|(&(kind, key), &min_resolution)| OverviewRecord {
                kind,
                type_code: (key >> 8) as u16,
                sub_type: (key & 0xff) as u8,
                min_resolution,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::RoadNodeRef;

    fn line(type_code: u16, min_resolution: u8) -> MapLine {
        MapLine::new(
            Feature::new(type_code, 0).with_resolution(min_resolution, 24),
            vec![Coord::new(0, 0), Coord::new(10, 10)],
        )
    }

    #[test]
    fn empty_geometry_is_dropped() {
        let mut collector = FeatureCollector::new();
        collector.add_line(MapLine::new(Feature::new(1, 0), vec![]));
        collector.add_shape(MapShape::new(Feature::new(2, 0), vec![]));

        let handle = collector
            .add_road(MapLine::new(Feature::new(3, 0), vec![]), RoadDef::new(1, 1))
            .unwrap();

        assert!(handle.is_none());
        assert_eq!(collector.elements().count(), 0);
        assert!(collector.overview_records().is_empty());
        assert!(collector.network().is_empty());
    }

    #[test]
    fn overview_keeps_minimum_resolution() {
        let mut collector = FeatureCollector::new();
        collector.add_line(line(0x05, 22));
        collector.add_line(line(0x05, 18));
        collector.add_line(line(0x05, 20));

        assert_eq!(
            collector.overview_resolution(OverviewKind::Line, 0x0500),
            Some(18)
        );
        assert_eq!(collector.overview_records().len(), 1);
    }

    #[test]
    fn overview_records_are_split_by_kind() {
        let mut collector = FeatureCollector::new();
        collector.add_point(MapPoint::new(Feature::new(0x2f, 0x0b), Coord::new(1, 1)));
        collector.add_line(line(0x2f, 20));

        let records = collector.overview_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, OverviewKind::Point);
        assert_eq!((records[0].type_code, records[0].sub_type), (0x2f, 0x0b));
        assert_eq!(records[1].kind, OverviewKind::Line);
    }

    #[test]
    fn background_is_not_catalogued() {
        let mut collector = FeatureCollector::new();
        collector.add_to_bounds(&Coord::new(-5, -5));
        collector.add_to_bounds(&Coord::new(5, 10));
        collector.finish();
        collector.finish();

        assert_eq!(collector.shapes().len(), 1);
        let background = &collector.shapes()[0];
        assert_eq!(background.feature().type_code, BACKGROUND_TYPE);
        assert_eq!(background.bounds(), Some(Area::new(-5, -5, 5, 10)));
        assert!(collector.overview_records().is_empty());
    }

    #[test]
    fn roads_are_lines_with_routing() {
        let mut collector = FeatureCollector::new();
        let def = RoadDef::new(42, 4200).with_nodes([RoadNodeRef {
            index: 1,
            source_id: 9,
        }]);

        let handle = collector.add_road(line(0x01, 16), def).unwrap().unwrap();

        assert_eq!(collector.lines().len(), 1);
        assert!(collector.lines()[0].is_road());
        assert!(collector.lines()[0].points()[1].is_routing_node());
        assert_eq!(collector.network().handle_of(42), Some(handle));
        assert_eq!(
            collector.overview_resolution(OverviewKind::Line, 0x0100),
            Some(16)
        );
    }

    #[test]
    fn numbers_attach_to_collected_road() {
        use crate::road::NumberRange;

        let mut collector = FeatureCollector::new();
        let handle = collector
            .add_road(line(0x01, 16), RoadDef::new(1, 1))
            .unwrap()
            .unwrap();

        collector
            .finalize_numbers(
                handle,
                vec![Numbers::new(1, NumberRange::none(), NumberRange::none())],
            )
            .unwrap();

        assert!(collector.lines()[0].points()[1].is_number_node());
        assert_eq!(
            collector.network().road(handle).unwrap().numbers()[0].node_number(),
            Some(0)
        );
    }
}
