use pathviz_core::{Grid, Point};

use crate::distance::manhattan;
use crate::engine::SearchCore;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::table::NodeTable;
use crate::traits::{NodeInfo, SearchAlgorithm, Stats, Status};

#[derive(Clone, Copy, Debug)]
struct AstarNode {
    g: u32,
    h: u32,
    f: u32,
    parent: Option<usize>,
    closed: bool,
}

impl AstarNode {
    const BLOCKED: Self = Self {
        g: u32::MAX,
        h: 0,
        f: u32::MAX,
        parent: None,
        closed: true,
    };

    fn new(g: u32, h: u32, parent: Option<usize>) -> Self {
        Self {
            g,
            h,
            f: g.saturating_add(h),
            parent,
            closed: false,
        }
    }

    #[inline]
    fn key(&self) -> (u32, u32) {
        (self.f, self.h)
    }
}

/// Heuristic search: expands cells in increasing order of `f = g + h`, where
/// `g` is the accumulated cost and `h` the Manhattan distance to the goal.
///
/// Every cell costs at least 1 to enter, so Manhattan distance never
/// overestimates and is consistent on the 4-connected grid; closed cells
/// therefore never need reopening. Ties on `f` go to the smaller `h`, then to
/// the earlier queued cell.
pub struct AStar {
    core: SearchCore,
    nodes: NodeTable<AstarNode>,
    frontier: Frontier<(u32, u32)>,
}

impl AStar {
    /// Start a search on `grid` from `start` to `goal`.
    pub fn new(grid: &Grid, start: Point, goal: Point) -> Result<Self, SearchError> {
        let core = SearchCore::open(grid, start, goal, "astar")?;
        let mut nodes = NodeTable::new(grid.len());
        let mut frontier = Frontier::new();
        let node = AstarNode::new(0, manhattan(start, goal), None);
        nodes.insert(core.start_idx, node);
        frontier.push(core.start_idx, node.key());
        Ok(Self {
            core,
            nodes,
            frontier,
        })
    }

    #[inline]
    fn estimate(&self, p: Point) -> u32 {
        manhattan(p, self.core.goal)
    }
}

impl SearchAlgorithm for AStar {
    fn step(&mut self) -> Result<Vec<Point>, SearchError> {
        if let Some(done) = self.core.settled() {
            return done;
        }

        let nodes = &self.nodes;
        let Some(ci) = self
            .frontier
            .peek_live(|idx, key| nodes.get(idx).is_some_and(|n| !n.closed && n.key() == key))
        else {
            return Err(self.core.exhaust());
        };

        if ci == self.core.goal_idx {
            let nodes = &self.nodes;
            self.core.complete(|idx| nodes.get(idx).and_then(|n| n.parent))?;
            return Ok(Vec::new());
        }

        self.frontier.pop();
        let current_g = match self.nodes.get_mut(ci) {
            Some(n) => {
                n.closed = true;
                n.g
            }
            None => return Err(self.core.exhaust()),
        };
        let mut changed = Vec::new();
        self.core.close(ci, &mut changed)?;

        let cp = self.core.grid.point(ci);
        for np in self.core.grid.neighbors_of(cp)? {
            let ni = self.core.grid.index(np)?;
            let cell = self.core.grid.cell_at(np)?;
            let known = self.nodes.get(ni).map(|n| (n.closed, n.g));
            match known {
                None if cell.is_wall() => self.nodes.insert(ni, AstarNode::BLOCKED),
                None => {
                    let g = current_g.saturating_add(cell.cost);
                    let node = AstarNode::new(g, self.estimate(np), Some(ci));
                    self.nodes.insert(ni, node);
                    self.frontier.push(ni, node.key());
                    self.core.discover(np, g, &mut changed)?;
                }
                Some((true, _)) => {}
                Some((false, recorded_g)) => {
                    let g = current_g.saturating_add(cell.cost);
                    if g < recorded_g {
                        let node = AstarNode::new(g, self.estimate(np), Some(ci));
                        self.nodes.insert(ni, node);
                        self.frontier.push(ni, node.key());
                        self.core.relax(np, g, &mut changed)?;
                    }
                }
            }
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
            cost: n.g,
            estimate: n.h,
            parent: n.parent.map(|pi| self.core.grid.point(pi)),
            closed: n.closed,
        })
    }

    fn stats(&self) -> Stats {
        self.core.stats
    }
}
