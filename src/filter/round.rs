use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};
use crate::geo::Coord;

/// Snaps coordinates to the grid of the level.
///
/// Consecutive points which land on the same grid point collapse into
/// one, unless both carry node flags. A flagged point always wins over
/// an unflagged one at the same place.
pub struct RoundCoordsFilter;

impl RoundCoordsFilter {
    pub(crate) fn round(points: &[Coord], shift: u8) -> Vec<Coord> {
        let mut rounded: Vec<Coord> = Vec::with_capacity(points.len());

        for point in points.iter().map(|point| point.rounded(shift)) {
            match rounded.last_mut() {
                Some(last) if *last == point => {
                    if !point.is_preserved() {
                        continue;
                    }

                    if last.is_preserved() {
                        rounded.push(point);
                    } else {
                        *last = point;
                    }
                }
                _ => rounded.push(point),
            }
        }

        rounded
    }
}

impl Filter for RoundCoordsFilter {
    fn name(&self) -> &'static str {
        "round_coords"
    }

    fn apply(&self, mut element: Element, context: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let shift = context.config.shift;

        if shift > 0 {
            let rounded = Self::round(element.points(), shift);
            element.set_points(rounded);
        }

        forward.pass(element);
    }
}
