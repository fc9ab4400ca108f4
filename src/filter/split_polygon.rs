use log::{debug, warn};

use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};
use crate::geo::Coord;

/// Chooses where to cut a closed ring in two.
///
/// Both rings returned must be closed, each must have fewer points than
/// `points`, and their signed areas must sum to that of `points`.
pub trait SplitStrategy: Send + Sync {
    fn choose_split(&self, points: &[Coord]) -> Option<(Vec<Coord>, Vec<Coord>)>;
}

/// Cuts the closed ring `points` along the chord from vertex 0 to vertex
/// `at`. Requires `2 <= at <= n - 2` for the `n` distinct vertices.
fn split_at(points: &[Coord], at: usize) -> (Vec<Coord>, Vec<Coord>) {
    let first = points[0];
    let pivot = points[at];

    let mut left = points[..=at].to_vec();
    left.push(first);

    let mut right = points[at..].to_vec();
    right.push(pivot);

    (left, right)
}

/// Number of distinct vertices of a closed ring, if it can be split.
fn splittable_vertices(points: &[Coord]) -> Option<usize> {
    let vertices = points.len().checked_sub(1)?;
    (vertices >= 4).then_some(vertices)
}

/// Cuts between the first vertex and the middle one.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBisect;

impl SplitStrategy for IndexBisect {
    fn choose_split(&self, points: &[Coord]) -> Option<(Vec<Coord>, Vec<Coord>)> {
        let vertices = splittable_vertices(points)?;
        Some(split_at(points, vertices / 2))
    }
}

/// Cuts from the first vertex to the vertex whose fan encloses the
/// area closest to half of the polygon.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaBisect;

impl AreaBisect {
    #[inline]
    fn cross(a: &Coord, b: &Coord) -> i64 {
        a.lon as i64 * b.lat as i64 - b.lon as i64 * a.lat as i64
    }
}

impl SplitStrategy for AreaBisect {
    fn choose_split(&self, points: &[Coord]) -> Option<(Vec<Coord>, Vec<Coord>)> {
        let vertices = splittable_vertices(points)?;
        let first = &points[0];

        // Twice the signed area of the whole ring.
        let total: i64 = points
            .windows(2)
            .map(|pair| Self::cross(&pair[0], &pair[1]))
            .sum();

        let mut prefix = 0i64;
        let mut best = (vertices / 2, i64::MAX);

        for at in 1..=vertices - 2 {
            prefix += Self::cross(&points[at - 1], &points[at]);
            if at < 2 {
                continue;
            }

            let fan = prefix + Self::cross(&points[at], first);
            let distance = (2 * fan - total).abs();
            if distance < best.1 {
                best = (at, distance);
            }
        }

        Some(split_at(points, best.0))
    }
}

/// Starts the closed ring `points` at vertex `at` instead of vertex 0.
fn rotate(points: &[Coord], at: usize) -> Vec<Coord> {
    let vertices = &points[..points.len() - 1];

    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&vertices[at..]);
    rotated.extend_from_slice(&vertices[..at]);
    rotated.push(vertices[at]);
    rotated
}

/// Splits shapes with more than `max_points` points until every piece
/// fits.
///
/// A split succeeds when both pieces are smaller than the ring they came
/// from, and successful splits are never limited. A failed split is tried
/// again with the ring started at another vertex, and a piece is dropped
/// once `attempts` tries in a row have failed.
pub struct PolygonSplitterFilter<S = IndexBisect> {
    max_points: usize,
    attempts: usize,
    strategy: S,
}

impl<S: SplitStrategy> PolygonSplitterFilter<S> {
    pub fn new(max_points: usize, attempts: usize, strategy: S) -> Self {
        PolygonSplitterFilter {
            max_points: max_points.max(5),
            attempts: attempts.max(1),
            strategy,
        }
    }

    /// Tries to cut `points` in two, starting the ring at a different
    /// vertex for each failed try.
    fn split(&self, points: &[Coord]) -> Option<(Vec<Coord>, Vec<Coord>)> {
        let vertices = points.len().saturating_sub(1).max(1);
        let stride = (vertices / self.attempts).max(1);

        (0..self.attempts)
            .map(|attempt| (attempt * stride) % vertices)
            .find_map(|offset| {
                let split = match offset {
                    0 => self.strategy.choose_split(points),
                    offset => self.strategy.choose_split(&rotate(points, offset)),
                };

                split.filter(|(left, right)| left.len() < points.len() && right.len() < points.len())
            })
    }
}

impl<S: SplitStrategy> Filter for PolygonSplitterFilter<S> {
    fn name(&self) -> &'static str {
        "polygon_splitter"
    }

    fn apply(&self, element: Element, _: &FilterContext<'_>, forward: &mut Forward<'_>) {
        if !matches!(element, Element::Shape(_)) || element.points().len() <= self.max_points {
            return forward.pass(element);
        }

        debug!(
            "Splitting shape {:#x} of {} points",
            element.feature().type_code,
            element.points().len()
        );

        let mut pending = vec![element.points().to_vec()];

        while let Some(points) = pending.pop() {
            if points.len() <= self.max_points {
                forward.again(element.fragment(points));
                continue;
            }

            match self.split(&points) {
                Some((left, right)) => {
                    pending.push(right);
                    pending.push(left);
                }
                None => warn!(
                    "Dropping fragment of shape {:#x} with {} points, not reducible below {} in {} attempts",
                    element.feature().type_code,
                    points.len(),
                    self.max_points,
                    self.attempts
                ),
            }
        }
    }
}
