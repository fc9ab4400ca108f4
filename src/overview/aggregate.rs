use indexmap::IndexSet;
use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::collector::FeatureCollector;
use crate::element::{Feature, MapShape};
use crate::geo::{round_down, round_up, shift_for, Area};
use crate::overview::error::OverviewError;
use crate::tile::TileSummary;

/// Type code of the rectangle marking the area a tile covers.
pub const COVERAGE_TYPE: u16 = 0x4a;

/// The merged, low resolution view over a batch of tiles.
#[derive(Debug)]
pub struct Overview {
    pub features: FeatureCollector,
    /// In the order they were first seen.
    pub copyrights: Vec<String>,
    pub bounds: Area,
}

/// Merges the summaries of compiled tiles into one overview.
///
/// The aggregator is a join over the whole batch: it expects a summary
/// from every tile and refuses to finish without them.
#[derive(Debug)]
pub struct OverviewAggregator {
    resolution: u8,
    expected_tiles: usize,
    seen: FxHashSet<u32>,
    copyrights: IndexSet<String>,
    collector: FeatureCollector,
}

impl OverviewAggregator {
    pub fn new(resolution: u8, expected_tiles: usize) -> Self {
        OverviewAggregator {
            resolution,
            expected_tiles,
            seen: FxHashSet::default(),
            copyrights: IndexSet::new(),
            collector: FeatureCollector::new(),
        }
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// The tile area widened outwards to the overview grid, so that tiles
    /// sharing an edge on the grid share it exactly after rounding.
    pub fn coverage(&self, bounds: &Area) -> Area {
        let shift = shift_for(self.resolution);
        Area::new(
            round_down(bounds.min_lat, shift),
            round_down(bounds.min_lon, shift),
            round_up(bounds.max_lat, shift),
            round_up(bounds.max_lon, shift),
        )
    }

    pub fn add_tile(&mut self, summary: TileSummary) -> Result<(), OverviewError> {
        let tile = summary.tile;
        let bounds = summary
            .bounds
            .ok_or(OverviewError::MissingBounds { tile })?;

        if !self.seen.insert(tile) {
            return Err(OverviewError::DuplicateTile { tile });
        }

        self.copyrights.extend(summary.copyrights);

        let coverage = self.coverage(&bounds);
        coverage
            .ring()
            .iter()
            .for_each(|corner| self.collector.add_to_bounds(corner));

        debug!(
            "Tile {tile} adds {} lines and {} shapes to the overview",
            summary.lines.len(),
            summary.shapes.len()
        );

        summary
            .lines
            .into_iter()
            .for_each(|line| self.collector.add_line(line));
        summary
            .shapes
            .into_iter()
            .for_each(|shape| self.collector.add_shape(shape));

        let feature = Feature::new(COVERAGE_TYPE, 0)
            .with_resolution(0, self.resolution)
            .skipping_size_filter();
        self.collector
            .add_shape(MapShape::new(feature, coverage.ring()));

        Ok(())
    }

    /// The merged features, closed with a background, and the copyrights.
    pub fn finish(mut self) -> Result<Overview, OverviewError> {
        let received = self.seen.len();
        if received < self.expected_tiles {
            return Err(OverviewError::Incomplete {
                expected: self.expected_tiles,
                received,
            });
        }

        let bounds = self.collector.bounds().ok_or(OverviewError::Empty)?;

        self.collector.finish();
        info!(
            "Overview of {received} tiles with {} copyrights covers {:?}",
            self.copyrights.len(),
            bounds
        );

        Ok(Overview {
            features: self.collector,
            copyrights: self.copyrights.into_iter().collect(),
            bounds,
        })
    }
}
