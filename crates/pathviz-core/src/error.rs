use std::fmt;

use crate::geom::Point;

/// Errors reported by [`Grid`](crate::Grid) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A position outside `[0, width) × [0, height)`.
    OutOfRange { pos: Point, width: i32, height: i32 },
    /// A cost that is neither in the editable range nor the wall sentinel.
    InvalidCost(u32),
    /// Dimensions outside the supported range.
    InvalidSize { width: i32, height: i32 },
    /// The grid is held by a live search and may not be edited.
    SearchActive,
    /// A text layout could not be parsed.
    InvalidLayout { reason: String },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { pos, width, height } => {
                write!(f, "cell {pos} is outside the {width}x{height} grid")
            }
            Self::InvalidCost(c) => write!(f, "invalid cell cost {c}"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid grid size {width}x{height}")
            }
            Self::SearchActive => f.write_str("grid is in use by a running search"),
            Self::InvalidLayout { reason } => write!(f, "invalid grid layout: {reason}"),
        }
    }
}

impl std::error::Error for GridError {}
