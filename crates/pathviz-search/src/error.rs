use std::fmt;

use pathviz_core::GridError;

/// Errors reported by a search step or construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier ran dry before the goal was reached.
    NoPathFound,
    /// A newer search took over the grid; this instance may no longer write
    /// to it.
    Superseded,
    /// A grid access failed (for example, an out-of-range start or goal).
    Grid(GridError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPathFound => f.write_str("no path found"),
            Self::Superseded => f.write_str("search was superseded by a newer search"),
            Self::Grid(e) => write!(f, "grid error: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
