//! Scaffolding shared by every search variant: grid ownership, terminal
//! states, visualization marks and path reconstruction.

use pathviz_core::{Grid, Lease, Point, Tag, cell_name};

use crate::error::SearchError;
use crate::traits::{Stats, Status};

pub(crate) struct SearchCore {
    pub(crate) grid: Grid,
    lease: Lease,
    pub(crate) start: Point,
    pub(crate) goal: Point,
    pub(crate) start_idx: usize,
    pub(crate) goal_idx: usize,
    path: Vec<Point>,
    status: Status,
    pub(crate) stats: Stats,
    name: &'static str,
}

impl SearchCore {
    /// Validate the endpoints, take the grid's lease and wipe marks left by
    /// earlier searches.
    pub(crate) fn open(
        grid: &Grid,
        start: Point,
        goal: Point,
        name: &'static str,
    ) -> Result<Self, SearchError> {
        let start_idx = grid.index(start)?;
        let goal_idx = grid.index(goal)?;

        let (lease, was_held) = grid.acquire_lease();
        if was_held {
            log::warn!("{name}: grid was still held by another search, taking it over");
        }
        let cleared = grid.clear_search_marks();
        if cleared > 0 {
            log::debug!("{name}: cleared search marks from {cleared} cells");
        }
        log::debug!(
            "{name}: searching {start} -> {goal} on a {}x{} grid",
            grid.width(),
            grid.height()
        );

        Ok(Self {
            grid: grid.clone(),
            lease,
            start,
            goal,
            start_idx,
            goal_idx,
            path: Vec::new(),
            status: Status::Searching,
            stats: Stats::default(),
            name,
        })
    }

    /// The result of a step that must not expand anything, or `None` when
    /// the search may proceed.
    pub(crate) fn settled(&self) -> Option<Result<Vec<Point>, SearchError>> {
        if !self.grid.holds_lease(self.lease) {
            return Some(Err(SearchError::Superseded));
        }
        match self.status {
            Status::Searching => None,
            Status::Found => Some(Ok(Vec::new())),
            Status::Exhausted => Some(Err(SearchError::NoPathFound)),
        }
    }

    /// Record that the frontier ran dry.
    pub(crate) fn exhaust(&mut self) -> SearchError {
        if self.status == Status::Searching {
            log::info!(
                "{}: no path from {} to {} after {} expansions",
                self.name,
                self.start,
                self.goal,
                self.stats.expanded
            );
        }
        self.status = Status::Exhausted;
        SearchError::NoPathFound
    }

    /// Walk parents back from the goal, tag the route and finish.
    ///
    /// The whole route is collected and bounds-checked before any cell is
    /// tagged, so a failure leaves the grid and the status untouched.
    pub(crate) fn complete(
        &mut self,
        parent_of: impl Fn(usize) -> Option<usize>,
    ) -> Result<(), SearchError> {
        let mut path = Vec::new();
        let mut ci = self.goal_idx;
        loop {
            let p = self.grid.point(ci);
            self.grid.index(p)?;
            path.push(p);
            if ci == self.start_idx {
                break;
            }
            match parent_of(ci) {
                Some(pi) => ci = pi,
                None => break,
            }
        }
        path.reverse();

        for &p in path.iter().filter(|&&p| p != self.start && p != self.goal) {
            self.grid.set_tag(p, Tag::Path)?;
        }

        log::info!(
            "{}: path found, {} cells after {} expansions",
            self.name,
            path.len(),
            self.stats.expanded
        );
        self.path = path;
        self.status = Status::Found;
        Ok(())
    }

    /// Mark the cell at `idx` as expanded.
    pub(crate) fn close(&mut self, idx: usize, changed: &mut Vec<Point>) -> Result<(), SearchError> {
        let p = self.grid.point(idx);
        if idx != self.start_idx {
            self.grid.set_tag(p, Tag::Closed)?;
        }
        changed.push(p);
        self.stats.expanded += 1;
        self.stats.steps += 1;
        log::trace!("{}: expanding {} {p}", self.name, cell_name(idx));
        Ok(())
    }

    /// Mark a newly discovered cell as open and annotate its cost.
    pub(crate) fn discover(
        &mut self,
        p: Point,
        cost: u32,
        changed: &mut Vec<Point>,
    ) -> Result<(), SearchError> {
        self.grid.set_note(p, Some(cost))?;
        if p != self.goal {
            self.grid.set_tag(p, Tag::Open)?;
        }
        changed.push(p);
        self.stats.discovered += 1;
        Ok(())
    }

    /// Re-annotate an open cell whose cost improved.
    pub(crate) fn relax(
        &mut self,
        p: Point,
        cost: u32,
        changed: &mut Vec<Point>,
    ) -> Result<(), SearchError> {
        self.grid.set_note(p, Some(cost))?;
        changed.push(p);
        self.stats.relaxed += 1;
        Ok(())
    }

    #[inline]
    pub(crate) fn path(&self) -> &[Point] {
        &self.path
    }

    #[inline]
    pub(crate) fn status(&self) -> Status {
        self.status
    }
}

impl Drop for SearchCore {
    fn drop(&mut self) {
        self.grid.release_lease(self.lease);
        log::trace!("{}: released grid", self.name);
    }
}
