use pathviz_core::{Grid, GridError, Point};

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Total cost of walking `path`: the sum of the costs of every cell entered,
/// which excludes the first cell.
pub fn path_cost(grid: &Grid, path: &[Point]) -> Result<u64, GridError> {
    path.iter()
        .skip(1)
        .try_fold(0u64, |acc, &p| Ok(acc + u64::from(grid.cost_at(p)?)))
}
