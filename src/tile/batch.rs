use log::{error, info};
use measure_time::debug_time;
use rayon::prelude::*;

use crate::config::CompileOptions;
use crate::overview::aggregate::Overview;
use crate::overview::OverviewAggregator;
use crate::tile::compile::{compile_tile, CompiledTile, TileSource};
use crate::{Error, Subsystem};

#[derive(Debug)]
pub struct BatchOutput {
    pub tiles: Vec<CompiledTile>,
    /// Tiles which aborted, with the error naming the failing stage.
    pub failures: Vec<(u32, Error)>,
    /// `None` when no tile compiled.
    pub overview: Option<Overview>,
}

/// Compiles every tile in parallel, then merges the compiled tiles into
/// the overview once all of them are done.
///
/// A tile which fails is reported in [`BatchOutput::failures`] and left
/// out of the overview. Errors in the options or in the aggregation
/// abort the whole batch.
pub fn compile_batch(sources: Vec<TileSource>, options: &CompileOptions) -> crate::Result<BatchOutput> {
    options.validate()?;
    let count = sources.len();
    debug_time!("compile batch of {count} tiles");

    let results = sources
        .into_par_iter()
        .map(|source| (source.id, compile_tile(source, options)))
        .collect::<Vec<_>>();

    let mut tiles = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(tile) => tiles.push(tile),
            Err(e) => {
                error!("Tile {id} aborted: {e}");
                failures.push((id, e));
            }
        }
    }

    let overview = if tiles.is_empty() {
        None
    } else {
        let mut aggregator = OverviewAggregator::new(options.overview_resolution, tiles.len());
        for tile in &tiles {
            aggregator
                .add_tile(tile.summary.clone())
                .map_err(|e| Error::from(e).in_tile(tile.id, Subsystem::Overview))?;
        }
        Some(aggregator.finish()?)
    };

    info!(
        "Batch compiled {} tiles, {} failed",
        tiles.len(),
        failures.len()
    );

    Ok(BatchOutput {
        tiles,
        failures,
        overview,
    })
}
