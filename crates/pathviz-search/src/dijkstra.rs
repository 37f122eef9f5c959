use pathviz_core::{Grid, Point};

use crate::engine::SearchCore;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::table::NodeTable;
use crate::traits::{NodeInfo, SearchAlgorithm, Stats, Status};

#[derive(Clone, Copy, Debug)]
struct CostNode {
    cost: u32,
    parent: Option<usize>,
    closed: bool,
}

impl CostNode {
    /// Bookkeeping for a wall: closed on first contact, never opened.
    const BLOCKED: Self = Self {
        cost: u32::MAX,
        parent: None,
        closed: true,
    };
}

/// Uniform-cost search: expands cells in increasing order of accumulated
/// cost from the start.
///
/// Entering a cell costs that cell's traversal cost. Equal-cost frontier
/// cells are expanded in the order they were queued.
pub struct Dijkstra {
    core: SearchCore,
    nodes: NodeTable<CostNode>,
    frontier: Frontier<u32>,
}

impl Dijkstra {
    /// Start a search on `grid` from `start` to `goal`.
    pub fn new(grid: &Grid, start: Point, goal: Point) -> Result<Self, SearchError> {
        let core = SearchCore::open(grid, start, goal, "dijkstra")?;
        let mut nodes = NodeTable::new(grid.len());
        let mut frontier = Frontier::new();
        nodes.insert(
            core.start_idx,
            CostNode {
                cost: 0,
                parent: None,
                closed: false,
            },
        );
        frontier.push(core.start_idx, 0);
        Ok(Self {
            core,
            nodes,
            frontier,
        })
    }
}

impl SearchAlgorithm for Dijkstra {
    fn step(&mut self) -> Result<Vec<Point>, SearchError> {
        if let Some(done) = self.core.settled() {
            return done;
        }

        let nodes = &self.nodes;
        let Some(ci) = self
            .frontier
            .peek_live(|idx, cost| nodes.get(idx).is_some_and(|n| !n.closed && n.cost == cost))
        else {
            return Err(self.core.exhaust());
        };

        if ci == self.core.goal_idx {
            let nodes = &self.nodes;
            self.core.complete(|idx| nodes.get(idx).and_then(|n| n.parent))?;
            return Ok(Vec::new());
        }

        self.frontier.pop();
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
            let cell = self.core.grid.cell_at(np)?;
            let known = self.nodes.get(ni).map(|n| (n.closed, n.cost));
            match known {
                None if cell.is_wall() => self.nodes.insert(ni, CostNode::BLOCKED),
                None => {
                    let cost = current_cost.saturating_add(cell.cost);
                    self.nodes.insert(
                        ni,
                        CostNode {
                            cost,
                            parent: Some(ci),
                            closed: false,
                        },
                    );
                    self.frontier.push(ni, cost);
                    self.core.discover(np, cost, &mut changed)?;
                }
                Some((true, _)) => {}
                Some((false, recorded)) => {
                    // Compared against the neighbour's own recorded cost.
                    let cost = current_cost.saturating_add(cell.cost);
                    if cost < recorded {
                        if let Some(n) = self.nodes.get_mut(ni) {
                            n.cost = cost;
                            n.parent = Some(ci);
                        }
                        self.frontier.push(ni, cost);
                        self.core.relax(np, cost, &mut changed)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::path_cost;
    use pathviz_core::Tag;

    fn open_grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h).unwrap()
    }

    #[test]
    fn start_is_seeded_before_first_step() {
        let g = open_grid(3, 3);
        let d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let info = d.info(Point::ZERO).unwrap();
        assert_eq!(info.cost, 0);
        assert_eq!(info.parent, None);
        assert!(!info.closed);
        assert!(d.info(Point::new(1, 1)).is_none());
        assert_eq!(d.status(), Status::Searching);
        assert!(d.path().is_empty());
    }

    #[test]
    fn first_step_closes_start_and_opens_neighbors() {
        let g = open_grid(3, 3);
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let changed = d.step().unwrap();
        assert_eq!(
            changed,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)]
        );
        // The start keeps its own tag.
        assert_eq!(g.cell_at(Point::ZERO).unwrap().tag, Tag::Start);
        let right = g.cell_at(Point::new(1, 0)).unwrap();
        assert_eq!(right.tag, Tag::Open);
        assert_eq!(right.note, Some(1));
        assert!(d.info(Point::ZERO).unwrap().closed);
    }

    #[test]
    fn uniform_three_by_three() {
        let g = open_grid(3, 3);
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let path = d.run_to_end().unwrap().to_vec();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point::new(0, 0));
        assert_eq!(path[4], Point::new(2, 2));
        assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
        assert_eq!(path_cost(&g, &path).unwrap(), 4);
        assert_eq!(d.status(), Status::Found);
        for p in &path[1..4] {
            assert_eq!(g.cell_at(*p).unwrap().tag, Tag::Path);
        }
        assert_eq!(g.cell_at(Point::new(2, 2)).unwrap().tag, Tag::Goal);
    }

    #[test]
    fn completed_search_keeps_returning_empty() {
        let g = open_grid(2, 1);
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        d.run_to_end().unwrap();
        assert!(d.step().unwrap().is_empty());
        assert_eq!(d.path(), &[Point::new(0, 0), Point::new(1, 0)]);
    }

    #[test]
    fn start_equal_to_goal_is_a_one_cell_path() {
        let g = open_grid(2, 2);
        let mut d = Dijkstra::new(&g, Point::new(1, 1), Point::new(1, 1)).unwrap();
        assert!(d.step().unwrap().is_empty());
        assert_eq!(d.path(), &[Point::new(1, 1)]);
    }

    #[test]
    fn prefers_cheap_detour_over_expensive_straight_line() {
        let g = Grid::from_layout(
            "
            S9G
            ...
            ",
        )
        .unwrap();
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let path = d.run_to_end().unwrap().to_vec();
        assert_eq!(
            path,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(2, 0),
            ]
        );
        assert_eq!(path_cost(&g, &path).unwrap(), 4);
    }

    #[test]
    fn walls_are_closed_but_never_opened() {
        let g = Grid::from_layout(
            "
            S#.
            .#G
            ...
            ",
        )
        .unwrap();
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let mut seen = Vec::new();
        loop {
            let changed = d.step().unwrap();
            if changed.is_empty() {
                break;
            }
            seen.extend(changed);
        }
        for wall in [Point::new(1, 0), Point::new(1, 1)] {
            assert!(!seen.contains(&wall));
            assert_eq!(g.cell_at(wall).unwrap().tag, Tag::Wall);
            assert!(!d.path().contains(&wall));
        }
        assert!(d.info(Point::new(1, 0)).unwrap().closed);
        assert_eq!(path_cost(&g, d.path()).unwrap(), 5);
    }

    #[test]
    fn enclosed_goal_exhausts() {
        let g = Grid::from_layout(
            "
            S....
            ..#..
            .#G#.
            ..#..
            ",
        )
        .unwrap();
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let mut seen = Vec::new();
        let err = loop {
            match d.step() {
                Ok(changed) => seen.extend(changed),
                Err(e) => break e,
            }
        };
        assert_eq!(err, SearchError::NoPathFound);
        assert_eq!(d.status(), Status::Exhausted);
        assert!(d.path().is_empty());
        for wall in [Point::new(2, 1), Point::new(1, 2), Point::new(3, 2), Point::new(2, 3)] {
            assert!(d.info(wall).unwrap().closed);
            assert!(!seen.contains(&wall));
            assert_eq!(g.cell_at(wall).unwrap().tag, Tag::Wall);
        }
        assert!(d.info(Point::new(2, 2)).is_none());
        // Exhaustion is sticky.
        assert_eq!(d.step(), Err(SearchError::NoPathFound));
    }

    #[test]
    fn open_cells_are_never_relaxed_with_entry_costs() {
        // Parents leave the frontier in cost order and the entry cost of a
        // cell is fixed, so the first discovery is already the cheapest.
        let g = Grid::from_layout(
            "
            99..
            G#2S
            ",
        )
        .unwrap();
        let mut d = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
        let path = d.run_to_end().unwrap().to_vec();
        assert_eq!(path_cost(&g, &path).unwrap(), 21);
        assert_eq!(d.stats().relaxed, 0);
        assert_eq!(d.info(Point::new(2, 0)).unwrap().parent, Some(Point::new(3, 0)));
    }

    #[test]
    fn out_of_range_endpoints_are_rejected() {
        let g = open_grid(2, 2);
        assert!(matches!(
            Dijkstra::new(&g, Point::new(5, 5), g.goal()),
            Err(SearchError::Grid(_))
        ));
        // A failed construction does not keep the grid.
        assert!(!g.is_leased());
    }
}
