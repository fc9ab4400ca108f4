//! Compile options, read from the environment.
//!
//! ```rust
//! use mapc::CompileOptions;
//! let options = CompileOptions::default();
//! assert_eq!(options.levels.len(), 4);
//! assert_eq!(options.finest().map(|spec| spec.resolution), Some(24));
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::{shift_for, MAP_UNIT_BITS};

const LEVELS: &str = "MAPC_LEVELS";
const MAX_LINE_POINTS: &str = "MAPC_MAX_LINE_POINTS";
const MAX_SHAPE_POINTS: &str = "MAPC_MAX_SHAPE_POINTS";
const SIZE_THRESHOLD: &str = "MAPC_SIZE_THRESHOLD";
const ROUTING: &str = "MAPC_ROUTING";
const OVERVIEW_RESOLUTION: &str = "MAPC_OVERVIEW_RESOLUTION";
const SPLIT_ATTEMPTS: &str = "MAPC_SPLIT_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
    NoLevels,
    /// Levels must get strictly finer, coarsest first.
    LevelOrder(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "invalid value {value:?} for {key}"),
            ConfigError::NoLevels => write!(f, "at least one level is required"),
            ConfigError::LevelOrder(levels) => {
                write!(f, "levels {levels} are not ordered coarsest first")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One output level: its number in the file and the bits of
/// precision kept at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: u8,
    pub resolution: u8,
}

impl LevelSpec {
    pub const fn new(level: u8, resolution: u8) -> Self {
        LevelSpec { level, resolution }
    }
}

impl Display for LevelSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.level, self.resolution)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Output levels, coarsest first.
    pub levels: Vec<LevelSpec>,
    pub max_line_points: usize,
    pub max_shape_points: usize,
    /// Minimum feature size, in grid steps of the level.
    pub size_threshold: i32,
    pub routing: bool,
    pub overview_resolution: u8,
    /// How deep the polygon splitter recurses before giving up.
    pub split_attempts: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            levels: vec![
                LevelSpec::new(3, 18),
                LevelSpec::new(2, 20),
                LevelSpec::new(1, 22),
                LevelSpec::new(0, 24),
            ],
            max_line_points: 250,
            max_shape_points: 250,
            size_threshold: 2,
            routing: true,
            overview_resolution: 16,
            split_attempts: 8,
        }
    }
}

impl CompileOptions {
    /// Reads the options from the environment, after loading a `.env`
    /// file if one is present. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CompileOptions::default();

        let levels = match lookup(LEVELS) {
            Some(value) => parse_levels(&value)?,
            None => defaults.levels,
        };

        let options = CompileOptions {
            levels,
            max_line_points: read(&lookup, MAX_LINE_POINTS, defaults.max_line_points)?,
            max_shape_points: read(&lookup, MAX_SHAPE_POINTS, defaults.max_shape_points)?,
            size_threshold: read(&lookup, SIZE_THRESHOLD, defaults.size_threshold)?,
            routing: read(&lookup, ROUTING, defaults.routing)?,
            overview_resolution: read(&lookup, OVERVIEW_RESOLUTION, defaults.overview_resolution)?,
            split_attempts: read(&lookup, SPLIT_ATTEMPTS, defaults.split_attempts)?,
        };

        options.validate()?;
        debug!("Compiling with {:?}", options);
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let ordered = self
            .levels
            .iter()
            .tuple_windows()
            .all(|(coarse, fine)| coarse.resolution < fine.resolution && coarse.level > fine.level);

        let in_range = self
            .levels
            .iter()
            .all(|spec| spec.resolution <= MAP_UNIT_BITS);

        if !ordered || !in_range {
            return Err(ConfigError::LevelOrder(self.levels.iter().join(",")));
        }

        if self.max_line_points < 2 {
            return Err(ConfigError::Invalid {
                key: MAX_LINE_POINTS,
                value: self.max_line_points.to_string(),
            });
        }

        // A closed ring needs at least four points.
        if self.max_shape_points < 5 {
            return Err(ConfigError::Invalid {
                key: MAX_SHAPE_POINTS,
                value: self.max_shape_points.to_string(),
            });
        }

        // `threshold << shift` must not overflow at the coarsest level.
        let widest_shift = self.levels.iter().map(|spec| shift_for(spec.resolution)).max();
        let fits = widest_shift
            .is_some_and(|shift| (self.size_threshold as i64) << shift <= i32::MAX as i64);
        if self.size_threshold < 0 || !fits {
            return Err(ConfigError::Invalid {
                key: SIZE_THRESHOLD,
                value: self.size_threshold.to_string(),
            });
        }

        if self.split_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: SPLIT_ATTEMPTS,
                value: self.split_attempts.to_string(),
            });
        }

        if self.overview_resolution > MAP_UNIT_BITS {
            return Err(ConfigError::Invalid {
                key: OVERVIEW_RESOLUTION,
                value: self.overview_resolution.to_string(),
            });
        }

        Ok(())
    }

    pub fn coarsest(&self) -> Option<LevelSpec> {
        self.levels.first().copied()
    }

    pub fn finest(&self) -> Option<LevelSpec> {
        self.levels.last().copied()
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Parses `level:resolution` pairs, such as `3:18,2:20,1:22,0:24`.
pub fn parse_levels(value: &str) -> Result<Vec<LevelSpec>, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: LEVELS,
        value: value.to_string(),
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (level, resolution) = pair.split_once(':').ok_or_else(invalid)?;
            Ok(LevelSpec {
                level: level.trim().parse().map_err(|_| invalid())?,
                resolution: resolution.trim().parse().map_err(|_| invalid())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<FxHashMap<_, _>>();

        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let options = CompileOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options, CompileOptions::default());
        assert_eq!(options.coarsest(), Some(LevelSpec::new(3, 18)));
    }

    #[test]
    fn reads_overrides() {
        let options = CompileOptions::from_lookup(lookup(&[
            (LEVELS, "1:20, 0:23"),
            (MAX_LINE_POINTS, "100"),
            (ROUTING, "false"),
        ]))
        .unwrap();

        assert_eq!(options.levels, vec![LevelSpec::new(1, 20), LevelSpec::new(0, 23)]);
        assert_eq!(options.max_line_points, 100);
        assert!(!options.routing);
        assert_eq!(options.max_shape_points, 250);
    }

    #[test]
    fn malformed_value_names_key() {
        let result = CompileOptions::from_lookup(lookup(&[(SIZE_THRESHOLD, "two")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: SIZE_THRESHOLD,
                value: "two".to_string()
            })
        );

        assert!(parse_levels("3-18").is_err());
    }

    #[test]
    fn size_threshold_must_fit_the_coarsest_level() {
        let result = CompileOptions::from_lookup(lookup(&[(SIZE_THRESHOLD, "-1")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: SIZE_THRESHOLD,
                value: "-1".to_string()
            })
        );

        // Shifted by six at resolution 18, 1 << 25 no longer fits.
        let options = CompileOptions {
            size_threshold: 1 << 25,
            ..CompileOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::Invalid { key: SIZE_THRESHOLD, .. })
        ));

        let options = CompileOptions {
            size_threshold: (1 << 25) - 1,
            ..CompileOptions::default()
        };
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn split_attempts_cannot_be_zero() {
        let result = CompileOptions::from_lookup(lookup(&[(SPLIT_ATTEMPTS, "0")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: SPLIT_ATTEMPTS,
                value: "0".to_string()
            })
        );
    }

    #[test]
    fn levels_must_get_finer() {
        let result = CompileOptions::from_lookup(lookup(&[(LEVELS, "0:24,1:22")]));
        assert!(matches!(result, Err(ConfigError::LevelOrder(_))));

        let result = CompileOptions::from_lookup(lookup(&[(LEVELS, "")]));
        assert_eq!(result, Err(ConfigError::NoLevels));
    }
}
