use ::geo::{BooleanOps, LineString, Polygon, Rect};
use log::debug;

use crate::element::{Element, ElementKind};
use crate::filter::{Filter, FilterContext, Forward};
use crate::geo::{Area, Coord};

/// Largest span, in grid steps, a subdivision can describe on either axis.
pub const MAX_SPAN_STEPS: i64 = 0x7fff;

/// Cuts lines and shapes whose bounding box spans more than a
/// subdivision can encode at the level.
///
/// Lines are cut at points, pieces sharing the cut point. Shapes are
/// clipped against both halves of their bounding box along the longer
/// axis, and fed back until every piece fits.
pub struct SpanSplitterFilter;

impl SpanSplitterFilter {
    #[inline]
    pub fn max_span(shift: u8) -> i64 {
        MAX_SPAN_STEPS << shift
    }

    #[inline]
    fn span(area: &Area) -> i64 {
        area.max_dimension() as i64
    }

    pub(crate) fn cut_line(points: &[Coord], limit: i64) -> Vec<Vec<Coord>> {
        let Some((first, rest)) = points.split_first() else {
            return vec![];
        };

        let mut pieces = Vec::new();
        let mut current = vec![*first];
        let mut area = Area::point(first);

        for point in rest {
            let mut grown = area;
            grown.extend(point);

            match current.last().copied() {
                Some(last) if current.len() > 1 && Self::span(&grown) > limit => {
                    pieces.push(std::mem::replace(&mut current, vec![last]));
                    area = Area::point(&last);
                    area.extend(point);
                }
                _ => area = grown,
            }

            current.push(*point);
        }

        pieces.push(current);
        pieces
    }

    pub(crate) fn clip_shape(points: &[Coord], area: &Area) -> Vec<Vec<Coord>> {
        let polygon = Polygon::new(
            points.iter().map(::geo::Coord::from).collect::<LineString>(),
            vec![],
        );

        let (lower, upper) = if area.width() >= area.height() {
            let mid = area.min_lon + area.width() / 2;
            (
                Area::new(area.min_lat, area.min_lon, area.max_lat, mid),
                Area::new(area.min_lat, mid, area.max_lat, area.max_lon),
            )
        } else {
            let mid = area.min_lat + area.height() / 2;
            (
                Area::new(area.min_lat, area.min_lon, mid, area.max_lon),
                Area::new(mid, area.min_lon, area.max_lat, area.max_lon),
            )
        };

        [lower, upper]
            .iter()
            .flat_map(|half| polygon.intersection(&Self::rect(half)))
            .map(|piece| {
                piece
                    .exterior()
                    .coords()
                    .map(|c| Coord::new(c.y.round() as i32, c.x.round() as i32))
                    .collect::<Vec<_>>()
            })
            .filter(|ring| ring.len() >= 4)
            .collect()
    }

    fn rect(area: &Area) -> Polygon {
        let rect = Rect::new(
            ::geo::Coord {
                x: area.min_lon as f64,
                y: area.min_lat as f64,
            },
            ::geo::Coord {
                x: area.max_lon as f64,
                y: area.max_lat as f64,
            },
        );

        rect.to_polygon()
    }
}

impl Filter for SpanSplitterFilter {
    fn name(&self) -> &'static str {
        "span_splitter"
    }

    fn apply(&self, element: Element, context: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let limit = Self::max_span(context.config.shift);

        let Some(bounds) = element.bounds().filter(|b| Self::span(b) > limit) else {
            return forward.pass(element);
        };

        match element.kind() {
            ElementKind::Point => forward.pass(element),
            ElementKind::Line | ElementKind::Road => {
                let pieces = Self::cut_line(element.points(), limit);

                // Single long segments cannot be cut further.
                if pieces.len() == 1 {
                    return forward.pass(element);
                }

                debug!(
                    "Cutting line {:#x} spanning {} units into {}",
                    element.feature().type_code,
                    Self::span(&bounds),
                    pieces.len()
                );

                let follows = element.as_road().is_some_and(|road| road.segment_follows);
                for (index, points) in pieces.into_iter().enumerate() {
                    let mut fragment = element.fragment(points);
                    if let Element::Road(road) = &mut fragment {
                        road.segment_follows = index > 0 || follows;
                    }

                    forward.again(fragment);
                }
            }
            ElementKind::Shape => {
                debug!(
                    "Clipping shape {:#x} spanning {} units",
                    element.feature().type_code,
                    Self::span(&bounds)
                );

                for ring in Self::clip_shape(element.points(), &bounds) {
                    forward.again(element.fragment(ring));
                }
            }
        }
    }
}
