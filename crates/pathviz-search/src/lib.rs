//! **pathviz-search** — stepwise shortest-path searches over a
//! [`pathviz_core::Grid`].
//!
//! Every search advances one expansion per [`SearchAlgorithm::step`] call and
//! reports which cells changed, so a front-end can animate the exploration.
//! While running, a search writes `Open`/`Closed`/`Path` tags and cost
//! annotations onto the grid; it owns the grid's lease until dropped.
//!
//! * [`Dijkstra`]: uniform-cost search, optimal.
//! * [`AStar`]: Manhattan-guided, optimal, expands no more than Dijkstra.
//! * [`Traversal`]: breadth-first or depth-first, cost-blind.
//!
//! [`AlgorithmKind::start`] picks one at runtime and returns a [`Search`].

pub mod algorithm;
pub mod astar;
pub mod dijkstra;
pub mod distance;
mod engine;
pub mod error;
mod frontier;
mod table;
pub mod traits;
pub mod traversal;

pub use algorithm::{AlgorithmKind, Search, UnknownAlgorithm};
pub use astar::AStar;
pub use dijkstra::Dijkstra;
pub use distance::{manhattan, path_cost};
pub use error::SearchError;
pub use traits::{NodeInfo, SearchAlgorithm, Stats, Status};
pub use traversal::{Order, Traversal};
