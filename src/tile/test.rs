use crate::collector::{OverviewKind, BACKGROUND_TYPE};
use crate::config::CompileOptions;
use crate::element::Element;
use crate::fixtures::{eastward, line, node, sample_tile, TILE_SIZE};
use crate::geo::{Area, Coord};
use crate::level::error::SubdivisionError;
use crate::road::error::RoadError;
use crate::road::RoadDef;
use crate::tile::*;
use crate::{Error, Subsystem};

fn broken_tile(id: u32) -> TileSource {
    // Routing node past the end of a two point road.
    TileSource::new(id)
        .with_bounds(Area::new(0, 0, TILE_SIZE, TILE_SIZE))
        .with_road(RoadSource {
            line: line(0x01, eastward(Coord::new(0x100, 0x100), 2, 0x100)),
            def: RoadDef::new(id as u64 * 100, 2001).with_nodes([node(10, 7)]),
            numbers: vec![],
        })
}

#[test]
fn compiles_sample_tile() {
    let options = CompileOptions::default();
    let tile = compile_tile(sample_tile(1, 0), &options).unwrap();

    let decomposition = &tile.decomposition;
    assert_eq!(decomposition.levels().len(), options.levels.len());
    assert_eq!(tile.headers.len(), decomposition.len());

    let roots = decomposition.levels()[0].subdivisions().len();
    assert!(tile.headers[..roots].iter().all(|h| h.first_child.is_some()));

    let numbers = decomposition.subdivisions().map(|s| s.number()).collect::<Vec<_>>();
    assert_eq!(numbers, (1..=numbers.len() as u16).collect::<Vec<_>>());

    assert!(tile.network.is_frozen());
    assert_eq!(tile.network.len(), 2);
    assert_eq!(tile.network.restrictions().len(), 1);

    // Everything is drawn at the finest level, the long river and the lake split.
    let finest = decomposition.levels().last().unwrap();
    let types = finest
        .elements()
        .map(|e| e.feature().type_code)
        .collect::<Vec<_>>();
    for type_code in [0x0d, 0x2a, 0x1f, 0x3c, 0x01, 0x02, BACKGROUND_TYPE] {
        assert!(types.contains(&type_code), "missing {type_code:#x}");
    }
    assert!(types.iter().filter(|t| **t == 0x1f).count() >= 2);
    assert!(types.iter().filter(|t| **t == 0x3c).count() >= 2);

    // The cafe only shows from resolution 22.
    let coarsest = &decomposition.levels()[0];
    assert!(coarsest.elements().all(|e| e.feature().type_code != 0x2a));
}

#[test]
fn roads_keep_their_routing_data() {
    let tile = compile_tile(sample_tile(1, 0), &CompileOptions::default()).unwrap();
    let finest = tile.decomposition.levels().last().unwrap();

    let roads = finest
        .elements()
        .filter_map(Element::as_road)
        .collect::<Vec<_>>();
    assert_eq!(roads.len(), 2);

    // The junction is shared by both roads.
    for road in roads {
        assert!(road.line.points[2].is_routing_node());
        assert!(tile.network.road(road.road).is_some());
    }
    assert_eq!(tile.network.nodes().len(), 5);
}

#[test]
fn summary_holds_coarse_lines() {
    let options = CompileOptions::default();
    let tile = compile_tile(sample_tile(4, TILE_SIZE), &options).unwrap();
    let summary = &tile.summary;

    assert_eq!(summary.tile, 4);
    assert_eq!(summary.bounds, Some(Area::new(0, TILE_SIZE, TILE_SIZE, 2 * TILE_SIZE)));
    assert_eq!(summary.copyrights, vec!["tile 4 contributors", "Sample Data"]);

    // River and main street, but not the finer high street.
    let types = summary.lines.iter().map(|l| l.feature.type_code).collect::<Vec<_>>();
    assert!(types.contains(&0x1f) && types.contains(&0x01));
    assert!(!types.contains(&0x02));
    assert!(summary
        .lines
        .iter()
        .all(|l| l.feature.min_resolution <= options.overview_resolution));

    // The lake is finer than the overview and the background is left out.
    assert!(summary.shapes.is_empty());
}

#[test]
fn catalogue_holds_minimum_resolutions() {
    let tile = compile_tile(sample_tile(1, 0), &CompileOptions::default()).unwrap();
    let find = |kind: OverviewKind, type_code: u16, sub_type: u8| {
        tile.overview
            .iter()
            .find(|r| r.kind == kind && r.type_code == type_code && r.sub_type == sub_type)
            .map(|r| r.min_resolution)
    };

    assert_eq!(find(OverviewKind::Point, 0x0d, 0), Some(18));
    assert_eq!(find(OverviewKind::Point, 0x2a, 0x0e), Some(22));
    assert_eq!(find(OverviewKind::Line, 0x1f, 0), Some(16));
    assert_eq!(find(OverviewKind::Line, 0x02, 0), Some(20));
    assert_eq!(find(OverviewKind::Polygon, 0x3c, 0), Some(20));
    assert_eq!(find(OverviewKind::Polygon, BACKGROUND_TYPE, 0), None);
}

#[test]
fn routing_can_be_disabled() {
    let options = CompileOptions {
        routing: false,
        ..CompileOptions::default()
    };
    let tile = compile_tile(sample_tile(1, 0), &options).unwrap();

    assert!(tile.network.is_empty());
    assert!(tile.network.restrictions().is_empty());
    assert!(tile
        .decomposition
        .subdivisions()
        .flat_map(|s| s.elements())
        .all(|e| !e.is_road()));
}

#[test]
fn road_errors_name_the_tile() {
    let error = compile_tile(broken_tile(9), &CompileOptions::default()).unwrap_err();

    assert!(matches!(
        error,
        Error::Tile {
            tile: 9,
            subsystem: Subsystem::Road,
            ref source,
        } if matches!(**source, Error::Road(RoadError::NodeIndex { index: 10, points: 2, .. }))
    ));
}

#[test]
fn empty_tile_cannot_be_decomposed() {
    let error = compile_tile(TileSource::new(3), &CompileOptions::default()).unwrap_err();

    assert!(matches!(
        error,
        Error::Tile {
            tile: 3,
            subsystem: Subsystem::Decompose,
            ref source,
        } if matches!(**source, Error::Subdivision(SubdivisionError::MissingBounds))
    ));
}

#[test_log::test]
fn failed_tile_leaves_siblings_intact() {
    let sources = vec![
        sample_tile(1, 0),
        broken_tile(2),
        sample_tile(3, 2 * TILE_SIZE),
    ];

    let output = compile_batch(sources, &CompileOptions::default()).unwrap();

    let compiled = output.tiles.iter().map(|t| t.id).collect::<Vec<_>>();
    assert_eq!(compiled, vec![1, 3]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].0, 2);

    let overview = output.overview.unwrap();
    assert_eq!(
        overview.copyrights,
        vec!["tile 1 contributors", "Sample Data", "tile 3 contributors"]
    );
    assert_eq!(overview.bounds, Area::new(0, 0, TILE_SIZE, 3 * TILE_SIZE));
}

#[test]
fn batch_of_failures_has_no_overview() {
    let output = compile_batch(vec![broken_tile(1)], &CompileOptions::default()).unwrap();

    assert!(output.tiles.is_empty());
    assert!(output.overview.is_none());
}

#[test]
fn invalid_options_abort_the_batch() {
    let options = CompileOptions {
        levels: vec![],
        ..CompileOptions::default()
    };

    assert!(matches!(
        compile_batch(vec![sample_tile(1, 0)], &options),
        Err(Error::Config(_))
    ));
}
