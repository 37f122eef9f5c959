//! Closed set of search variants, selectable by name.

use std::fmt;
use std::str::FromStr;

use pathviz_core::{Grid, Point};

use crate::astar::AStar;
use crate::dijkstra::Dijkstra;
use crate::error::SearchError;
use crate::traits::{NodeInfo, SearchAlgorithm, Stats, Status};
use crate::traversal::Traversal;

/// Which search to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    #[default]
    Dijkstra,
    AStar,
    Bfs,
    Dfs,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [Self::Dijkstra, Self::AStar, Self::Bfs, Self::Dfs];

    /// The next kind in [`ALL`](Self::ALL), wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Dijkstra => Self::AStar,
            Self::AStar => Self::Bfs,
            Self::Bfs => Self::Dfs,
            Self::Dfs => Self::Dijkstra,
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
        }
    }

    /// Whether the search guarantees a cheapest route.
    pub fn is_optimal(self) -> bool {
        matches!(self, Self::Dijkstra | Self::AStar)
    }

    /// Construct a search of this kind.
    pub fn start(self, grid: &Grid, start: Point, goal: Point) -> Result<Search, SearchError> {
        Ok(match self {
            Self::Dijkstra => Search::Dijkstra(Dijkstra::new(grid, start, goal)?),
            Self::AStar => Search::AStar(AStar::new(grid, start, goal)?),
            Self::Bfs => Search::Traversal(Traversal::breadth_first(grid, start, goal)?),
            Self::Dfs => Search::Traversal(Traversal::depth_first(grid, start, goal)?),
        })
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::Bfs => "Breadth-first",
            Self::Dfs => "Depth-first",
        };
        f.write_str(label)
    }
}

/// Error for an unrecognised algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown algorithm `{}` (expected dijkstra, astar, bfs or dfs)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" | "ucs" => Ok(Self::Dijkstra),
            "astar" | "a*" | "a_star" => Ok(Self::AStar),
            "bfs" | "breadth-first" => Ok(Self::Bfs),
            "dfs" | "depth-first" => Ok(Self::Dfs),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A live search of any kind.
pub enum Search {
    Dijkstra(Dijkstra),
    AStar(AStar),
    Traversal(Traversal),
}

impl Search {
    fn inner(&self) -> &dyn SearchAlgorithm {
        match self {
            Self::Dijkstra(s) => s,
            Self::AStar(s) => s,
            Self::Traversal(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SearchAlgorithm {
        match self {
            Self::Dijkstra(s) => s,
            Self::AStar(s) => s,
            Self::Traversal(s) => s,
        }
    }
}

impl SearchAlgorithm for Search {
    fn step(&mut self) -> Result<Vec<Point>, SearchError> {
        self.inner_mut().step()
    }

    fn path(&self) -> &[Point] {
        self.inner().path()
    }

    fn status(&self) -> Status {
        self.inner().status()
    }

    fn info(&self, p: Point) -> Option<NodeInfo> {
        self.inner().info(p)
    }

    fn stats(&self) -> Stats {
        self.inner().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.name().parse::<AlgorithmKind>(), Ok(kind));
        }
        assert_eq!("A*".parse::<AlgorithmKind>(), Ok(AlgorithmKind::AStar));
        assert_eq!(" BFS ".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Bfs));
        assert!("greedy".parse::<AlgorithmKind>().is_err());
    }

    #[test]
    fn next_cycles_through_all() {
        let mut k = AlgorithmKind::default();
        for expected in AlgorithmKind::ALL {
            assert_eq!(k, expected);
            k = k.next();
        }
        assert_eq!(k, AlgorithmKind::Dijkstra);
    }

    #[test]
    fn every_kind_reaches_the_goal() {
        let g = Grid::new(5, 4).unwrap();
        for kind in AlgorithmKind::ALL {
            let mut s = kind.start(&g, g.start(), g.goal()).unwrap();
            let path = s.run_to_end().unwrap();
            assert_eq!(path.first(), Some(&g.start()), "{kind}");
            assert_eq!(path.last(), Some(&g.goal()), "{kind}");
            assert_eq!(s.status(), Status::Found);
        }
    }
}
