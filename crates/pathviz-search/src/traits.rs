use pathviz_core::Point;

use crate::error::SearchError;

/// Where a search is in its life cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Searching,
    /// The goal was reached; [`SearchAlgorithm::path`] holds the route.
    Found,
    /// The frontier is empty and the goal was never reached.
    Exhausted,
}

/// Read-only view of the bookkeeping a search keeps for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeInfo {
    /// Accumulated cost from the start (`g`).
    pub cost: u32,
    /// Heuristic estimate to the goal (`h`); 0 for uninformed searches.
    pub estimate: u32,
    pub parent: Option<Point>,
    pub closed: bool,
}

/// Counters describing the work a search has done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Cells removed from the frontier and closed.
    pub expanded: usize,
    /// Passable cells pushed to the frontier for the first time.
    pub discovered: usize,
    /// Successful cost improvements of open cells.
    pub relaxed: usize,
    /// Calls to `step` that did expansion work.
    pub steps: usize,
}

/// Uniform stepwise interface shared by every search variant.
pub trait SearchAlgorithm {
    /// Perform one unit of expansion work and return every cell whose tag or
    /// cost changed. An empty list means the goal has been reached.
    ///
    /// Fails with [`SearchError::NoPathFound`] once the frontier is empty.
    fn step(&mut self) -> Result<Vec<Point>, SearchError>;

    /// The start→goal route once the search has completed; empty otherwise.
    fn path(&self) -> &[Point];

    fn status(&self) -> Status;

    /// Bookkeeping for the cell at `p`, if the search has discovered it.
    fn info(&self, p: Point) -> Option<NodeInfo>;

    fn stats(&self) -> Stats;

    /// Step until the search completes and return the path.
    fn run_to_end(&mut self) -> Result<&[Point], SearchError> {
        while !self.step()?.is_empty() {}
        Ok(self.path())
    }
}
