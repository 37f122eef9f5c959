use std::collections::VecDeque;

use pathviz_core::{Grid, Point};

use crate::engine::SearchCore;
use crate::error::SearchError;
use crate::table::NodeTable;
use crate::traits::{NodeInfo, SearchAlgorithm, Stats, Status};

/// Which end of the frontier the next cell is taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Order {
    /// Queue: breadth-first.
    Fifo,
    /// Stack: depth-first.
    Lifo,
}

#[derive(Clone, Copy, Debug)]
struct VisitNode {
    cost: u32,
    parent: Option<usize>,
    closed: bool,
}

/// Unweighted graph traversal (breadth-first or depth-first).
///
/// Cell costs do not influence the order of expansion; they are only summed
/// for the display annotation. Each cell is queued at most once, so there is
/// no relaxation. Breadth-first finds a route with the fewest cells;
/// depth-first finds some route.
pub struct Traversal {
    core: SearchCore,
    nodes: NodeTable<VisitNode>,
    frontier: VecDeque<usize>,
    order: Order,
}

impl Traversal {
    /// Start a breadth-first search.
    pub fn breadth_first(grid: &Grid, start: Point, goal: Point) -> Result<Self, SearchError> {
        Self::new(grid, start, goal, Order::Fifo)
    }

    /// Start a depth-first search.
    pub fn depth_first(grid: &Grid, start: Point, goal: Point) -> Result<Self, SearchError> {
        Self::new(grid, start, goal, Order::Lifo)
    }

    fn new(grid: &Grid, start: Point, goal: Point, order: Order) -> Result<Self, SearchError> {
        let name = match order {
            Order::Fifo => "bfs",
            Order::Lifo => "dfs",
        };
        let core = SearchCore::open(grid, start, goal, name)?;
        let mut nodes = NodeTable::new(grid.len());
        nodes.insert(
            core.start_idx,
            VisitNode {
                cost: 0,
                parent: None,
                closed: false,
            },
        );
        let frontier = VecDeque::from([core.start_idx]);
        Ok(Self {
            core,
            nodes,
            frontier,
            order,
        })
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    fn peek(&self) -> Option<usize> {
        match self.order {
            Order::Fifo => self.frontier.front().copied(),
            Order::Lifo => self.frontier.back().copied(),
        }
    }

    fn pop(&mut self) -> Option<usize> {
        match self.order {
            Order::Fifo => self.frontier.pop_front(),
            Order::Lifo => self.frontier.pop_back(),
        }
    }
}

impl SearchAlgorithm for Traversal {
    fn step(&mut self) -> Result<Vec<Point>, SearchError> {
        if let Some(done) = self.core.settled() {
            return done;
        }

        let Some(ci) = self.peek() else {
            return Err(self.core.exhaust());
        };

        if ci == self.core.goal_idx {
            let nodes = &self.nodes;
            self.core.complete(|idx| nodes.get(idx).and_then(|n| n.parent))?;
            return Ok(Vec::new());
        }

        self.pop();
        let current_cost = match self.nodes.get_mut(ci) {
            Some(n) => {
                n.closed = true;
                n.cost
            }
            None => return Err(self.core.exhaust()),
        };
        let mut changed = Vec::new();
        self.core.close(ci, &mut changed)?;

        let cp = self.core.grid.point(ci);
        for np in self.core.grid.neighbors_of(cp)? {
            let ni = self.core.grid.index(np)?;
            if self.nodes.get(ni).is_some() {
                continue;
            }
            let cell = self.core.grid.cell_at(np)?;
            if cell.is_wall() {
                self.nodes.insert(
                    ni,
                    VisitNode {
                        cost: u32::MAX,
                        parent: None,
                        closed: true,
                    },
                );
                continue;
            }
            let cost = current_cost.saturating_add(cell.cost);
            self.nodes.insert(
                ni,
                VisitNode {
                    cost,
                    parent: Some(ci),
                    closed: false,
                },
            );
            self.frontier.push_back(ni);
            self.core.discover(np, cost, &mut changed)?;
        }

        Ok(changed)
    }

    fn path(&self) -> &[Point] {
        self.core.path()
    }

    fn status(&self) -> Status {
        self.core.status()
    }

    fn info(&self, p: Point) -> Option<NodeInfo> {
        let idx = self.core.grid.index(p).ok()?;
        let n = self.nodes.get(idx)?;
        Some(NodeInfo {
            cost: n.cost,
            estimate: 0,
            parent: n.parent.map(|pi| self.core.grid.point(pi)),
            closed: n.closed,
        })
    }

    fn stats(&self) -> Stats {
        self.core.stats
    }
}
