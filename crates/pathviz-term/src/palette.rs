//! Colours for the grid and panels.

use log::Level;
use pathviz_core::Tag;

use crate::screen::Color;

pub const FG: Color = Color::DEFAULT;
pub const FG_DARK: Color = Color::from_rgb(20, 20, 24);
pub const FG_LIGHT: Color = Color::from_rgb(240, 240, 240);
pub const FG_DIM: Color = Color::from_rgb(120, 124, 132);
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

pub const BG_PANEL: Color = Color::from_rgb(36, 38, 48);
pub const BG_SELECTED: Color = Color::from_rgb(214, 190, 70);

pub const WALL_BG: Color = Color::from_rgb(12, 12, 12);
pub const UNVISITED_BG: Color = Color::from_rgb(128, 128, 128);
pub const OPEN_BG: Color = Color::from_rgb(192, 192, 192);
pub const CLOSED_BG: Color = Color::from_rgb(80, 80, 80);
pub const START_BG: Color = Color::from_rgb(40, 170, 60);
pub const GOAL_BG: Color = Color::from_rgb(200, 40, 40);
pub const PATH_BG: Color = Color::from_rgb(250, 250, 250);

/// Background and text colour of a cell with the given tag.
pub fn tag_colors(tag: Tag) -> (Color, Color) {
    match tag {
        Tag::Wall => (WALL_BG, FG_DIM),
        Tag::Unvisited => (UNVISITED_BG, FG_DARK),
        Tag::Open => (OPEN_BG, FG_DARK),
        Tag::Closed => (CLOSED_BG, FG_LIGHT),
        Tag::Start => (START_BG, FG_LIGHT),
        Tag::Goal => (GOAL_BG, FG_LIGHT),
        Tag::Path => (PATH_BG, FG_DARK),
    }
}

/// Text colour of a log line.
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::from_rgb(240, 90, 90),
        Level::Warn => Color::from_rgb(230, 190, 80),
        Level::Info => FG_EMPH,
        Level::Debug | Level::Trace => FG_DIM,
    }
}
