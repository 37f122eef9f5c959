use pathfinding::prelude::dijkstra;
use pathviz_core::{Grid, Point, WALL_COST};
use pathviz_search::{AlgorithmKind, SearchAlgorithm, SearchError, path_cost};
use quickcheck::{Arbitrary, Gen, quickcheck};

/// A small random grid description. Kept as plain data so quickcheck can
/// clone and shrink-print it; the shared [`Grid`] is built per property run.
#[derive(Clone, Debug)]
struct Layout {
    width: i32,
    height: i32,
    costs: Vec<u32>,
    start: Point,
    goal: Point,
}

impl Arbitrary for Layout {
    fn arbitrary(g: &mut Gen) -> Layout {
        let width = 1 + i32::from(u8::arbitrary(g) % 9);
        let height = 1 + i32::from(u8::arbitrary(g) % 9);
        let mut costs: Vec<u32> = (0..width * height)
            .map(|_| {
                if u8::arbitrary(g) % 4 == 0 {
                    WALL_COST
                } else {
                    1 + u32::from(u8::arbitrary(g) % 9)
                }
            })
            .collect();
        let pick = |g: &mut Gen| {
            let i = usize::arbitrary(g) % costs.len();
            (i, Point::new(i as i32 % width, i as i32 / width))
        };
        let (si, start) = pick(g);
        let (gi, goal) = pick(g);
        costs[si] = 1;
        if costs[gi] == WALL_COST {
            costs[gi] = 1;
        }
        Layout {
            width,
            height,
            costs,
            start,
            goal,
        }
    }
}

impl Layout {
    fn build(&self) -> Grid {
        let grid = Grid::new(self.width, self.height).unwrap();
        for (i, &cost) in self.costs.iter().enumerate() {
            grid.set_cost(grid.point(i), cost).unwrap();
        }
        grid.set_start(self.start).unwrap();
        grid.set_goal(self.goal).unwrap();
        grid
    }

    /// Cheapest route cost computed by an independent implementation.
    fn oracle(&self, grid: &Grid) -> Option<u64> {
        dijkstra(
            &self.start,
            |p| {
                grid.neighbors_of(*p)
                    .unwrap()
                    .into_iter()
                    .filter_map(|n| {
                        let c = grid.cost_at(n).unwrap();
                        (c != WALL_COST).then_some((n, u64::from(c)))
                    })
                    .collect::<Vec<_>>()
            },
            |p| *p == self.goal,
        )
        .map(|(_, cost)| cost)
    }
}

/// Run `kind` to the end; `Some((path, expanded))` on success.
fn solve(grid: &Grid, kind: AlgorithmKind) -> Option<(Vec<Point>, usize)> {
    let mut s = kind.start(grid, grid.start(), grid.goal()).unwrap();
    match s.run_to_end() {
        Ok(path) => {
            let path = path.to_vec();
            Some((path, s.stats().expanded))
        }
        Err(SearchError::NoPathFound) => None,
        Err(e) => panic!("unexpected search error: {e}"),
    }
}

fn is_walk(grid: &Grid, path: &[Point]) -> bool {
    path.first() == Some(&grid.start())
        && path.last() == Some(&grid.goal())
        && path.windows(2).all(|w| w[0].is_adjacent(w[1]))
        && path[1..]
            .iter()
            .all(|p| !grid.cell_at(*p).unwrap().is_wall())
}

#[test]
fn prop_optimal_searches_match_oracle() {
    fn prop(layout: Layout) -> bool {
        let grid = layout.build();
        let expected = layout.oracle(&grid);
        [AlgorithmKind::Dijkstra, AlgorithmKind::AStar]
            .into_iter()
            .all(|kind| match (solve(&grid, kind), expected) {
                (Some((path, _)), Some(cost)) => {
                    is_walk(&grid, &path) && path_cost(&grid, &path).unwrap() == cost
                }
                (None, None) => true,
                _ => false,
            })
    }
    quickcheck(prop as fn(_) -> _);
}

#[test]
fn prop_astar_expands_no_more_than_dijkstra() {
    fn prop(layout: Layout) -> bool {
        let grid = layout.build();
        let by_dijkstra = solve(&grid, AlgorithmKind::Dijkstra).map(|(_, e)| e);
        let by_astar = solve(&grid, AlgorithmKind::AStar).map(|(_, e)| e);
        match (by_astar, by_dijkstra) {
            (Some(a), Some(d)) => a <= d,
            (None, None) => true,
            _ => false,
        }
    }
    quickcheck(prop as fn(_) -> _);
}

#[test]
fn prop_traversals_agree_on_reachability() {
    fn prop(layout: Layout) -> bool {
        let grid = layout.build();
        let reachable = layout.oracle(&grid).is_some();
        [AlgorithmKind::Bfs, AlgorithmKind::Dfs]
            .into_iter()
            .all(|kind| match solve(&grid, kind) {
                Some((path, _)) => reachable && is_walk(&grid, &path),
                None => !reachable,
            })
    }
    quickcheck(prop as fn(_) -> _);
}

#[test]
fn prop_bfs_path_has_fewest_cells() {
    fn prop(layout: Layout) -> bool {
        let grid = layout.build();
        let Some((path, _)) = solve(&grid, AlgorithmKind::Bfs) else {
            return true;
        };
        let fewest = dijkstra(
            &layout.start,
            |p| {
                grid.neighbors_of(*p)
                    .unwrap()
                    .into_iter()
                    .filter(|n| !grid.cell_at(*n).unwrap().is_wall())
                    .map(|n| (n, 1u32))
                    .collect::<Vec<_>>()
            },
            |p| *p == layout.goal,
        );
        fewest.is_some_and(|(_, hops)| path.len() == hops as usize + 1)
    }
    quickcheck(prop as fn(_) -> _);
}

#[test]
fn prop_lease_is_free_after_every_search() {
    fn prop(layout: Layout) -> bool {
        let grid = layout.build();
        AlgorithmKind::ALL.into_iter().all(|kind| {
            let _ = solve(&grid, kind);
            !grid.is_leased()
        })
    }
    quickcheck(prop as fn(_) -> _);
}
