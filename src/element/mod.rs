//! Map elements: points, lines, shapes and roads.
//!
//! Elements are created once from upstream features and cloned once per
//! resolution level. A clone copies geometry and attributes, while a road's
//! routing identity stays a shared [`RoadHandle`].

use smallvec::SmallVec;
use strum::{AsRefStr, Display};

use crate::geo::{Area, Coord};
use crate::road::RoadHandle;


/// Attributes common to every kind of element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub type_code: u16,
    pub sub_type: u8,
    /// Coarsest resolution the element is shown at.
    pub min_resolution: u8,
    /// Finest resolution the element is shown at.
    pub max_resolution: u8,
    pub labels: SmallVec<[String; 1]>,
    /// Small on purpose, the size filter must let it through.
    pub skip_size_filter: bool,
}

impl Feature {
    pub fn new(type_code: u16, sub_type: u8) -> Self {
        Feature {
            type_code,
            sub_type,
            min_resolution: 0,
            max_resolution: 24,
            ..Default::default()
        }
    }

    pub fn with_resolution(self, min_resolution: u8, max_resolution: u8) -> Self {
        Feature {
            min_resolution,
            max_resolution,
            ..self
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn skipping_size_filter(self) -> Self {
        Feature {
            skip_size_filter: true,
            ..self
        }
    }

    /// Key of the overview catalogue, `type << 8 | sub_type`.
    #[inline]
    pub fn overview_key(&self) -> u32 {
        ((self.type_code as u32) << 8) | self.sub_type as u32
    }

    /// True if the element should appear at a level of `resolution`.
    #[inline]
    pub fn shown_at(&self, resolution: u8) -> bool {
        (self.min_resolution..=self.max_resolution).contains(&resolution)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub feature: Feature,
    pub location: Coord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLine {
    pub feature: Feature,
    pub points: Vec<Coord>,
    /// Direction of travel is meaningful and should be drawn.
    pub direction: bool,
}

/// A closed polygon; the last point repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub feature: Feature,
    pub points: Vec<Coord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapRoad {
    pub line: MapLine,
    pub road: RoadHandle,
    /// This piece continues the previous piece of the same road.
    pub segment_follows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ElementKind {
    Point,
    Line,
    Shape,
    Road,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Point(MapPoint),
    Line(MapLine),
    Shape(MapShape),
    Road(MapRoad),
}

impl MapPoint {
    pub fn new(feature: Feature, location: Coord) -> Self {
        MapPoint { feature, location }
    }
}

impl MapLine {
    pub fn new(feature: Feature, points: Vec<Coord>) -> Self {
        MapLine {
            feature,
            points,
            direction: false,
        }
    }
}

impl MapShape {
    pub fn new(feature: Feature, points: Vec<Coord>) -> Self {
        MapShape { feature, points }
    }

    /// Signed area in square map units, positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        use ::geo::Area as _;

        let ring = self.points.iter().map(::geo::Coord::from).collect::<::geo::LineString>();
        ::geo::Polygon::new(ring, vec![]).signed_area()
    }
}

impl MapRoad {
    pub fn new(line: MapLine, road: RoadHandle) -> Self {
        MapRoad {
            line,
            road,
            segment_follows: false,
        }
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Point(_) => ElementKind::Point,
            Element::Line(_) => ElementKind::Line,
            Element::Shape(_) => ElementKind::Shape,
            Element::Road(_) => ElementKind::Road,
        }
    }

    pub fn feature(&self) -> &Feature {
        match self {
            Element::Point(p) => &p.feature,
            Element::Line(l) => &l.feature,
            Element::Shape(s) => &s.feature,
            Element::Road(r) => &r.line.feature,
        }
    }

    pub fn points(&self) -> &[Coord] {
        match self {
            Element::Point(p) => std::slice::from_ref(&p.location),
            Element::Line(l) => &l.points,
            Element::Shape(s) => &s.points,
            Element::Road(r) => &r.line.points,
        }
    }

    pub fn points_mut(&mut self) -> &mut [Coord] {
        match self {
            Element::Point(p) => std::slice::from_mut(&mut p.location),
            Element::Line(l) => &mut l.points,
            Element::Shape(s) => &mut s.points,
            Element::Road(r) => &mut r.line.points,
        }
    }

    /// Replaces the geometry of a line, shape or road. A point keeps
    /// the first coordinate given, if any.
    pub fn set_points(&mut self, points: Vec<Coord>) {
        match self {
            Element::Point(p) => {
                if let Some(first) = points.first() {
                    p.location = *first;
                }
            }
            Element::Line(l) => l.points = points,
            Element::Shape(s) => s.points = points,
            Element::Road(r) => r.line.points = points,
        }
    }

    /// A new element with this element's attributes and `points` as geometry.
    /// Road fragments keep the road handle and start with no predecessor link.
    pub fn fragment(&self, points: Vec<Coord>) -> Element {
        match self {
            Element::Point(p) => Element::Point(MapPoint {
                feature: p.feature.clone(),
                location: points.first().copied().unwrap_or(p.location),
            }),
            Element::Line(l) => Element::Line(MapLine {
                feature: l.feature.clone(),
                points,
                direction: l.direction,
            }),
            Element::Shape(s) => Element::Shape(MapShape {
                feature: s.feature.clone(),
                points,
            }),
            Element::Road(r) => Element::Road(MapRoad {
                line: MapLine {
                    feature: r.line.feature.clone(),
                    points,
                    direction: r.line.direction,
                },
                road: r.road,
                segment_follows: false,
            }),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    #[inline]
    pub fn is_road(&self) -> bool {
        matches!(self, Element::Road(_))
    }

    pub fn as_road(&self) -> Option<&MapRoad> {
        match self {
            Element::Road(road) => Some(road),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<Area> {
        Area::from_coords(self.points())
    }

    /// Where the element is placed when partitioning a level.
    pub fn location(&self) -> Option<Coord> {
        match self {
            Element::Point(p) => Some(p.location),
            _ => self.bounds().map(|area| area.center()),
        }
    }
}
