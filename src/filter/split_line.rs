use log::debug;

use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};
use crate::geo::Coord;

/// Cuts lines and roads with more than `max_points` points into
/// consecutive pieces sharing one coordinate at every cut.
///
/// A road keeps its handle in every piece, and every piece after the
/// first is marked as following its predecessor.
pub struct LineSplitterFilter {
    max_points: usize,
}

impl LineSplitterFilter {
    pub fn new(max_points: usize) -> Self {
        LineSplitterFilter {
            max_points: max_points.max(2),
        }
    }

    /// Number of pieces for `len` points: `ceil(len / max)`, or one more
    /// where the shared cut points would push a piece past the ceiling.
    pub fn fragment_count(&self, len: usize) -> usize {
        if len <= self.max_points {
            return 1;
        }

        let mut count = len.div_ceil(self.max_points);
        while count * (self.max_points - 1) < len - 1 {
            count += 1;
        }

        count
    }

    /// Splits `points` into `count` balanced, overlapping pieces.
    pub(crate) fn cut(points: &[Coord], count: usize) -> Vec<Vec<Coord>> {
        // Every cut point is counted twice.
        let total = points.len() + count - 1;
        let (base, extra) = (total / count, total % count);

        let mut start = 0;
        (0..count)
            .map(|piece| {
                let len = base + usize::from(piece < extra);
                let end = (start + len).min(points.len());
                let fragment = points[start..end].to_vec();
                start = end - 1;
                fragment
            })
            .collect()
    }
}

impl Filter for LineSplitterFilter {
    fn name(&self) -> &'static str {
        "line_splitter"
    }

    fn apply(&self, element: Element, _: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let splittable = matches!(element, Element::Line(_) | Element::Road(_));
        if !splittable || element.points().len() <= self.max_points {
            return forward.pass(element);
        }

        let count = self.fragment_count(element.points().len());
        debug!(
            "Splitting line {:#x} of {} points into {count}",
            element.feature().type_code,
            element.points().len()
        );

        let follows = element.as_road().is_some_and(|road| road.segment_follows);

        for (index, points) in Self::cut(element.points(), count).into_iter().enumerate() {
            let mut fragment = element.fragment(points);
            if let Element::Road(road) = &mut fragment {
                road.segment_follows = index > 0 || follows;
            }

            forward.again(fragment);
        }
    }
}
