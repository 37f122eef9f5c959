//! **pathviz-core** — the weighted grid consumed by the pathviz search
//! engines.
//!
//! This crate provides the geometry primitives, the [`Cell`] type with its
//! traversal cost and visualization [`Tag`], and the shared [`Grid`] with
//! bounds-checked access, cardinal neighbour lookup and the single-search
//! [`Lease`].

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
mod layout;

pub use cell::{Cell, MAX_CELL_COST, MIN_CELL_COST, Tag, WALL_COST, cell_name, is_valid_cost};
pub use error::GridError;
pub use geom::{Point, Range};
pub use grid::{Grid, Lease, MAX_GRID_DIM};
