use log::{debug, info};

use crate::collector::{FeatureCollector, OverviewRecord};
use crate::config::CompileOptions;
use crate::element::{MapLine, MapPoint, MapShape};
use crate::geo::Area;
use crate::level::{Decomposition, LevelDecomposer, SubdivisionHeader};
use crate::road::{Numbers, RestrictionDescriptor, RoadDef, RoadNetwork};
use crate::tile::TileSummary;
use crate::{Error, Subsystem};

/// A road as handed over by the upstream style stage: its geometry, its
/// routing attributes and the address ranges along it.
#[derive(Debug, Clone)]
pub struct RoadSource {
    pub line: MapLine,
    pub def: RoadDef,
    pub numbers: Vec<Numbers>,
}

/// Everything known about one tile before compilation.
#[derive(Debug, Clone, Default)]
pub struct TileSource {
    pub id: u32,
    /// Declared extent; the collected bounds also cover every element.
    pub bounds: Option<Area>,
    pub copyrights: Vec<String>,
    pub points: Vec<MapPoint>,
    pub lines: Vec<MapLine>,
    pub shapes: Vec<MapShape>,
    pub roads: Vec<RoadSource>,
    pub restrictions: Vec<RestrictionDescriptor>,
}

impl TileSource {
    pub fn new(id: u32) -> Self {
        TileSource {
            id,
            ..Default::default()
        }
    }

    pub fn with_bounds(self, bounds: Area) -> Self {
        TileSource {
            bounds: Some(bounds),
            ..self
        }
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyrights.push(copyright.into());
        self
    }

    pub fn with_point(mut self, point: MapPoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn with_line(mut self, line: MapLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_shape(mut self, shape: MapShape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_road(mut self, road: RoadSource) -> Self {
        self.roads.push(road);
        self
    }

    pub fn with_restriction(mut self, restriction: RestrictionDescriptor) -> Self {
        self.restrictions.push(restriction);
        self
    }
}

/// The result of compiling one tile, ready for the writers.
#[derive(Debug)]
pub struct CompiledTile {
    pub id: u32,
    pub decomposition: Decomposition,
    /// One per subdivision, in number order.
    pub headers: Vec<SubdivisionHeader>,
    pub network: RoadNetwork,
    pub overview: Vec<OverviewRecord>,
    pub summary: TileSummary,
}

/// Gathers the tile's elements, bounds and roads into a collector. The
/// road network is frozen on return.
fn collect(source: TileSource, routing: bool) -> Result<FeatureCollector, Error> {
    let mut collector = FeatureCollector::new();

    if let Some(bounds) = source.bounds {
        bounds
            .ring()
            .iter()
            .for_each(|corner| collector.add_to_bounds(corner));
    }

    let TileSource {
        id,
        points,
        lines,
        shapes,
        roads,
        restrictions,
        ..
    } = source;

    for point in points {
        collector.add_to_bounds(&point.location);
        collector.add_point(point);
    }

    for line in lines {
        line.points.iter().for_each(|p| collector.add_to_bounds(p));
        collector.add_line(line);
    }

    for shape in shapes {
        shape.points.iter().for_each(|p| collector.add_to_bounds(p));
        collector.add_shape(shape);
    }

    for RoadSource { line, def, numbers } in roads {
        line.points.iter().for_each(|p| collector.add_to_bounds(p));

        if !routing {
            collector.add_line(line);
            continue;
        }

        let skip_numbers = def.skip_house_numbers() || numbers.is_empty();
        let handle = collector
            .add_road(line, def)
            .map_err(|e| Error::from(e).in_tile(id, Subsystem::Road))?;

        if let (Some(handle), false) = (handle, skip_numbers) {
            collector
                .finalize_numbers(handle, numbers)
                .map_err(|e| Error::from(e).in_tile(id, Subsystem::Road))?;
        }
    }

    if routing {
        let network = collector.network_mut();
        let mut dropped = 0usize;
        for restriction in &restrictions {
            let kept = network
                .add_restriction(restriction)
                .map_err(|e| Error::from(e).in_tile(id, Subsystem::Road))?;
            dropped += (!kept) as usize;
        }

        if dropped > 0 {
            debug!("Tile {id} dropped {dropped} of {} restrictions", restrictions.len());
        }
    }

    collector.network_mut().freeze();
    collector.finish();
    Ok(collector)
}

/// Compiles a single tile: collects its features, filters and decomposes
/// every level and describes the subdivision headers.
///
/// Errors are attributed to the tile and the stage that raised them.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(tile = source.id))
)]
pub fn compile_tile(source: TileSource, options: &CompileOptions) -> crate::Result<CompiledTile> {
    options.validate()?;

    let id = source.id;
    let copyrights = source.copyrights.clone();
    let collector = collect(source, options.routing)?;

    let decomposition = LevelDecomposer::new(options)
        .decompose(&collector)
        .map_err(|e| Error::from(e).in_tile(id, Subsystem::Decompose))?;

    let headers = decomposition
        .headers()
        .map_err(|e| Error::from(e).in_tile(id, Subsystem::Decompose))?;

    let mut summary = TileSummary::new(id, collector.bounds(), copyrights);
    if let Some(coarsest) = decomposition.levels().first() {
        summary = summary.with_level(coarsest, options.overview_resolution);
    }

    let overview = collector.overview_records();
    info!(
        "Tile {id} compiled into {} subdivisions over {} levels",
        decomposition.len(),
        decomposition.levels().len()
    );

    Ok(CompiledTile {
        id,
        decomposition,
        headers,
        network: collector.into_network(),
        overview,
        summary,
    })
}
