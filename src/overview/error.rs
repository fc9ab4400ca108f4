use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverviewError {
    /// Finished before every tile of the batch was added.
    Incomplete { expected: usize, received: usize },
    MissingBounds { tile: u32 },
    DuplicateTile { tile: u32 },
    /// No tile was added at all.
    Empty,
}

impl Display for OverviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OverviewError::Incomplete { expected, received } => write!(
                f,
                "overview finished with {received} of {expected} tiles"
            ),
            OverviewError::MissingBounds { tile } => {
                write!(f, "summary of tile {tile} has no bounds")
            }
            OverviewError::DuplicateTile { tile } => {
                write!(f, "tile {tile} was added to the overview twice")
            }
            OverviewError::Empty => write!(f, "overview has no tiles"),
        }
    }
}

impl std::error::Error for OverviewError {}
