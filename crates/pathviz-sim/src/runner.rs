//! Tick-driven execution of a single search.

use std::time::Duration;

use pathviz_core::{Grid, Point};
use pathviz_search::{AlgorithmKind, Search, SearchAlgorithm, SearchError};

use crate::config::SimConfig;
use crate::session::{Session, SimState};

/// What a call to [`Runner::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: not running, or no search.
    Idle,
    /// The search advanced; these cells changed.
    Progress(Vec<Point>),
    /// The goal was reached. The session is paused.
    Finished(Vec<Point>),
    /// The goal is unreachable. The session is paused and the search dropped.
    NoPath,
}

/// Owns the live search and advances it according to the [`Session`].
pub struct Runner {
    session: Session,
    batch_when_hidden: usize,
    grid: Option<Grid>,
    search: Option<Search>,
}

impl Runner {
    pub fn new(config: SimConfig) -> Self {
        let config = config.validated();
        Self {
            session: Session::new(&config),
            batch_when_hidden: config.batch_when_hidden,
            grid: None,
            search: None,
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The live search, if any.
    #[inline]
    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    /// Whether a search currently holds a grid.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.search.is_some()
    }

    /// Start `kind` on `grid` from its start to its goal and mark the
    /// session running. Any previous search is dropped first.
    pub fn begin(&mut self, grid: &Grid, kind: AlgorithmKind) -> Result<(), SearchError> {
        self.search = None;
        let search = kind.start(grid, grid.start(), grid.goal())?;
        log::debug!("runner: {kind} started");
        self.search = Some(search);
        self.grid = Some(grid.clone());
        self.session.start(kind);
        Ok(())
    }

    /// Advance the search if the session is running.
    ///
    /// With drawing on this is exactly one step. With drawing off up to
    /// `batch_when_hidden` steps run back to back and the changed cells of
    /// all of them are reported together.
    pub fn tick(&mut self) -> Result<TickOutcome, SearchError> {
        if self.session.state() != SimState::Running {
            return Ok(TickOutcome::Idle);
        }
        let Some(search) = self.search.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        let budget = if self.session.draw() {
            1
        } else {
            self.batch_when_hidden
        };
        let mut cells = Vec::new();
        for _ in 0..budget {
            match search.step() {
                Ok(changed) if changed.is_empty() => {
                    let path = search.path().to_vec();
                    self.session.pause();
                    return Ok(TickOutcome::Finished(path));
                }
                Ok(changed) => cells.extend(changed),
                Err(SearchError::NoPathFound) => {
                    log::info!("runner: no path, stopping");
                    self.search = None;
                    self.session.pause();
                    return Ok(TickOutcome::NoPath);
                }
                Err(e) => {
                    self.search = None;
                    self.session.pause();
                    return Err(e);
                }
            }
        }
        Ok(TickOutcome::Progress(cells))
    }

    /// Drop the search, wipe its marks from the grid and stop the session.
    pub fn reset(&mut self) {
        self.search = None;
        if let Some(grid) = self.grid.take() {
            let cleared = grid.clear_search_marks();
            log::debug!("runner: reset cleared {cleared} cells");
        }
        self.session.reset();
    }

    /// Time between ticks at the current speed.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.session.speed().max(1)))
    }
}
