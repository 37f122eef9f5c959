//! **pathviz-term** — terminal front-end for the pathviz search visualizer.
//!
//! An Elm-style loop ([`App`]) feeds input [`Msg`]s to the [`Visualizer`]
//! model, draws it into a [`Screen`] and flushes only the changed glyphs
//! through the crossterm [`CrosstermDriver`].

pub mod app;
pub mod cli;
pub mod driver;
pub mod logger;
pub mod messages;
pub mod palette;
pub mod screen;
pub mod visualizer;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cli::Args;
pub use driver::CrosstermDriver;
pub use logger::{LogBuffer, LogLine, MessageLog};
pub use messages::{Key, ModMask, MouseAction, Msg};
pub use screen::{AttrMask, Color, Glyph, Screen, Style};
pub use visualizer::Visualizer;
