//! **pathviz-sim** — drives a [`pathviz_search::Search`] at a configurable
//! tick rate.
//!
//! [`Session`] holds the run state (stopped / running / paused), the chosen
//! algorithm, the speed and the draw toggle, and notifies observers on every
//! change. [`Runner`] owns the live search and turns clock ticks into search
//! steps according to the session.

pub mod config;
pub mod runner;
pub mod session;

pub use config::{MAX_SPEED, MIN_SPEED, SimConfig};
pub use runner::{Runner, TickOutcome};
pub use session::{Control, Session, SessionEvent, SimState};
