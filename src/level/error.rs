use std::fmt::{Display, Formatter};

use crate::util::bits::FieldWidth;

#[derive(Debug)]
pub enum SubdivisionError {
    /// Nothing was collected, so there is no area to subdivide.
    MissingBounds,
    /// The area of a subdivision cannot be described by the header fields.
    SpanTooLarge {
        level: u8,
        subdivision: u16,
        span: i64,
        max: i64,
    },
    TooManySubdivisions(usize),
    Width(FieldWidth),
}

crate::impl_err!(FieldWidth, SubdivisionError, Width);

impl Display for SubdivisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubdivisionError::MissingBounds => write!(f, "tile has no bounds to subdivide"),
            SubdivisionError::SpanTooLarge {
                level,
                subdivision,
                span,
                max,
            } => write!(
                f,
                "subdivision {subdivision} at level {level} spans {span} steps, at most {max} can be encoded"
            ),
            SubdivisionError::TooManySubdivisions(count) => {
                write!(f, "{count} subdivisions cannot be numbered in 16 bits")
            }
            SubdivisionError::Width(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SubdivisionError {}
