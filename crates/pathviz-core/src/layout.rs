//! Building a [`Grid`] from a text picture.
//!
//! Each line is a row. Recognised characters:
//!
//! | char | cell |
//! |---|---|
//! | `.` | cost 1 |
//! | `1`–`9` | that cost |
//! | `#` | wall |
//! | `S` | start (cost 1) |
//! | `G` | goal (cost 1) |
//!
//! Leading and trailing blank lines and per-line surrounding whitespace are
//! ignored, so layouts can be written as indented string literals.

use crate::cell::WALL_COST;
use crate::error::GridError;
use crate::geom::Point;
use crate::grid::Grid;

impl Grid {
    /// Parse a grid from a text picture (see the module docs).
    ///
    /// Without `S`/`G` markers the default corners are kept.
    pub fn from_layout(s: &str) -> Result<Grid, GridError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        if rows.iter().any(|r| r.chars().count() as i32 != width) {
            return Err(GridError::InvalidLayout {
                reason: "rows have different widths".into(),
            });
        }
        let grid = Grid::new(width, height)?;

        let mut start = None;
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let cost = match ch {
                    '.' => 1,
                    '#' => WALL_COST,
                    'S' => {
                        start = Some(p);
                        1
                    }
                    'G' => {
                        goal = Some(p);
                        1
                    }
                    '1'..='9' => ch.to_digit(10).unwrap_or(1),
                    _ => {
                        return Err(GridError::InvalidLayout {
                            reason: format!("unexpected {ch:?} at {p}"),
                        });
                    }
                };
                grid.set_cost(p, cost)?;
            }
        }
        if let Some(p) = start {
            grid.set_start(p)?;
        }
        if let Some(p) = goal {
            grid.set_goal(p)?;
        }
        Ok(grid)
    }
}
