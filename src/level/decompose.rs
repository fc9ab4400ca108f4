use itertools::Itertools;
use log::{debug, trace};
use measure_time::debug_time;
use rayon::prelude::*;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::collector::FeatureCollector;
use crate::config::{CompileOptions, LevelSpec};
use crate::element::Element;
use crate::filter::{FilterChain, FilterConfig, FilterContext};
use crate::geo::{shift_for, Area, Coord};
use crate::level::error::SubdivisionError;
use crate::level::header::{SubdivisionHeader, MAX_HALF_WIDTH};
use crate::level::subdivision::{half_extents, Counts, Subdivision};

/// The subdivisions of one level, grouped by parent in parent order.
#[derive(Debug, Clone)]
pub struct Level {
    spec: LevelSpec,
    subdivisions: Vec<Subdivision>,
}

impl Level {
    pub fn spec(&self) -> LevelSpec {
        self.spec
    }

    pub fn subdivisions(&self) -> &[Subdivision] {
        &self.subdivisions
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.subdivisions.iter().flat_map(|s| s.elements())
    }
}

/// Every level of a tile, coarsest first, with linked subdivisions.
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    levels: Vec<Level>,
}

impl Decomposition {
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn subdivisions(&self) -> impl Iterator<Item = &Subdivision> {
        self.levels.iter().flat_map(|level| level.subdivisions.iter())
    }

    pub fn subdivision(&self, number: u16) -> Option<&Subdivision> {
        let index = (number as usize).checked_sub(1)?;
        self.subdivisions().nth(index)
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(|level| level.subdivisions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Headers of every subdivision in number order. Region pointers are
    /// left at zero, for the writer laying out region data to fill in.
    pub fn headers(&self) -> Result<Vec<SubdivisionHeader>, SubdivisionError> {
        self.subdivisions()
            .map(|subdivision| SubdivisionHeader::describe(subdivision, 0))
            .collect()
    }
}

/// A partition cell of the coarser level, indexed to find the parent
/// of an element of the finer one.
struct Cell {
    number: u16,
    envelope: AABB<[i64; 2]>,
}

impl Cell {
    fn new(subdivision: &Subdivision) -> Self {
        let cell = subdivision.cell();
        Cell {
            number: subdivision.number(),
            envelope: AABB::from_corners(
                [cell.min_lon as i64, cell.min_lat as i64],
                [cell.max_lon as i64, cell.max_lat as i64],
            ),
        }
    }
}

impl RTreeObject for Cell {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for Cell {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        self.envelope.distance_2(point)
    }
}

#[inline]
fn position(coord: &Coord) -> [i64; 2] {
    [coord.lon as i64, coord.lat as i64]
}

/// Filters the collected features once per level and partitions every
/// level into a tree of subdivisions.
pub struct LevelDecomposer {
    levels: Vec<LevelSpec>,
    routing: bool,
    chain: FilterChain,
}

impl LevelDecomposer {
    pub fn new(options: &CompileOptions) -> Self {
        Self::with_chain(options, FilterChain::standard(options))
    }

    pub fn with_chain(options: &CompileOptions, chain: FilterChain) -> Self {
        LevelDecomposer {
            levels: options.levels.clone(),
            routing: options.routing,
            chain,
        }
    }

    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    /// Runs the chain for every level. Levels are independent of one
    /// another and are filtered in parallel.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn filter_levels(&self, collector: &FeatureCollector) -> Vec<Vec<Element>> {
        let has_net = self.routing && !collector.network().is_empty();
        let finest = self.levels.len().saturating_sub(1);

        self.levels
            .par_iter()
            .enumerate()
            .map(|(index, spec)| self.filter_level(*spec, index == finest, has_net, collector))
            .collect()
    }

    pub fn filter_level(
        &self,
        spec: LevelSpec,
        routable: bool,
        has_net: bool,
        collector: &FeatureCollector,
    ) -> Vec<Element> {
        let level = spec.level;
        debug_time!("level {level}: filter");

        let config = FilterConfig::new(spec, has_net, routable);
        let context = FilterContext::new(&config, collector.network());

        let shown = collector
            .elements()
            .filter(|element| element.feature().shown_at(spec.resolution))
            .cloned();

        let filtered = self.chain.run(shown, &context);
        debug!("Level {level} keeps {} elements", filtered.len());
        filtered
    }

    /// Filters and partitions every level, then links each subdivision to
    /// its children on the next finer level.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn decompose(&self, collector: &FeatureCollector) -> Result<Decomposition, SubdivisionError> {
        let bounds = collector.bounds().ok_or(SubdivisionError::MissingBounds)?;
        let filtered = self.filter_levels(collector);

        let mut levels: Vec<Level> = Vec::with_capacity(self.levels.len());
        let mut next_number = 1usize;

        for (spec, elements) in self.levels.iter().zip(filtered) {
            let level = spec.level;
            debug_time!("level {level}: partition");

            let shift = shift_for(spec.resolution);
            let groups = match levels.last() {
                None => vec![(None, bounds, elements)],
                Some(coarser) => Self::assign(coarser, elements),
            };

            let mut subdivisions = Vec::new();
            for (parent, cell, members) in groups {
                for (cell, elements) in Self::partition(cell, members, shift) {
                    let number = u16::try_from(next_number)
                        .map_err(|_| SubdivisionError::TooManySubdivisions(next_number))?;
                    next_number += 1;

                    let bounds = Area::from_coords(elements.iter().flat_map(|e| e.points()))
                        .unwrap_or_else(|| Area::point(&cell.center()));

                    subdivisions.push(Subdivision {
                        number,
                        level,
                        resolution: spec.resolution,
                        shift,
                        cell,
                        bounds,
                        elements,
                        parent,
                        first_child: None,
                        last: false,
                    });
                }
            }

            debug!("Level {level} has {} subdivisions", subdivisions.len());
            levels.push(Level {
                spec: *spec,
                subdivisions,
            });
        }

        Self::link(&mut levels);
        Ok(Decomposition { levels })
    }

    /// True if the elements can share one subdivision.
    fn fits(elements: &[Element], shift: u8) -> bool {
        if !Counts::of(elements).fits() {
            return false;
        }

        Area::from_coords(elements.iter().flat_map(|e| e.points())).map_or(true, |bounds| {
            let (width, height) = half_extents(&bounds, shift);
            width <= MAX_HALF_WIDTH && height <= MAX_HALF_WIDTH
        })
    }

    /// Splits `cell` into quadrants until each part's elements fit. Elements
    /// belong to the quadrant holding their location. When locations can
    /// no longer be told apart, the elements are halved in order instead.
    fn partition(cell: Area, elements: Vec<Element>, shift: u8) -> Vec<(Area, Vec<Element>)> {
        let mut done = Vec::new();
        let mut pending = vec![(cell, elements)];

        while let Some((cell, elements)) = pending.pop() {
            if elements.len() <= 1 || Self::fits(&elements, shift) {
                done.push((cell, elements));
                continue;
            }

            let locations = elements
                .iter()
                .map(|e| e.location().unwrap_or_else(|| cell.center()))
                .collect::<Vec<_>>();

            if cell.max_dimension() == 0 || locations.iter().all_equal() {
                trace!("Halving {} co-located elements", elements.len());
                let mut first = elements;
                let second = first.split_off(first.len() / 2);
                pending.push((cell, second));
                pending.push((cell, first));
                continue;
            }

            let mut quadrants: [Vec<Element>; 4] = Default::default();
            for (element, location) in elements.into_iter().zip(locations) {
                quadrants[cell.quadrant_of(&location)].push(element);
            }

            cell.quadrants()
                .into_iter()
                .zip(quadrants)
                .filter(|(_, members)| !members.is_empty())
                .rev()
                .for_each(|part| pending.push(part));
        }

        done
    }

    /// Groups the elements of a finer level under the coarser subdivision
    /// whose cell holds their location, or the nearest one. Each group's
    /// cell is the parent's, grown to hold every member's location.
    fn assign(coarser: &Level, elements: Vec<Element>) -> Vec<(Option<u16>, Area, Vec<Element>)> {
        let parents = coarser.subdivisions();
        let Some(first) = parents.first().map(|s| s.number()) else {
            return vec![];
        };

        let tree = RTree::bulk_load(parents.iter().map(Cell::new).collect());
        let mut groups: Vec<Vec<Element>> = (0..parents.len()).map(|_| Vec::new()).collect();

        for element in elements {
            let Some(location) = element.location() else {
                continue;
            };

            let point = position(&location);
            let parent = tree
                .locate_all_at_point(&point)
                .map(|cell| cell.number)
                .min()
                .or_else(|| tree.nearest_neighbor(&point).map(|cell| cell.number));

            if let Some(number) = parent {
                groups[(number - first) as usize].push(element);
            }
        }

        parents
            .iter()
            .zip(groups)
            .filter(|(_, members)| !members.is_empty())
            .map(|(parent, members)| {
                let mut cell = parent.cell();
                members
                    .iter()
                    .filter_map(Element::location)
                    .for_each(|location| cell.extend(&location));

                (Some(parent.number()), cell, members)
            })
            .collect()
    }

    /// Points each parent at its first child and marks the last child of
    /// every parent. The coarsest level are siblings of one another.
    fn link(levels: &mut [Level]) {
        if let Some(last) = levels
            .first_mut()
            .and_then(|level| level.subdivisions.last_mut())
        {
            last.last = true;
        }

        for index in 1..levels.len() {
            let (coarser, finer) = levels.split_at_mut(index);
            let parents = &mut coarser[index - 1].subdivisions;
            let children = &mut finer[0].subdivisions;

            let Some(first) = parents.first().map(|s| s.number) else {
                continue;
            };

            for at in 0..children.len() {
                let parent = children[at].parent;
                let next = children.get(at + 1).and_then(|child| child.parent);
                children[at].last = next != parent;

                if let Some(number) = parent {
                    parents[(number - first) as usize]
                        .first_child
                        .get_or_insert(children[at].number);
                }
            }
        }
    }
}
