//! The grid editor and search visualizer model.

use std::collections::BTreeSet;
use std::time::Duration;

use log::Level;
use pathviz_core::{Grid, MAX_GRID_DIM, Point, Range, Tag, WALL_COST};
use pathviz_search::{AlgorithmKind, SearchAlgorithm, Status, path_cost};
use pathviz_sim::{Runner, SimConfig, SimState, TickOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::{Effect, Model};
use crate::logger::LogBuffer;
use crate::messages::{Key, ModMask, MouseAction, Msg};
use crate::palette::*;
use crate::screen::{AttrMask, Glyph, Screen, Style};

/// Screen columns per grid cell.
pub const CELL_W: i32 = 3;
/// Width of the side panel.
pub const PANEL_W: i32 = 32;
/// Height of the log panel under the grid.
pub const LOG_H: i32 = 5;

const KEYS_HELP: &[&str] = &[
    "arrows/hjkl  move",
    "space  select   esc  clear",
    "1-9  cost   w  wall",
    "s  start    g  goal",
    "r  scatter  +/-  resize",
    "tab  algorithm",
    "enter  start/pause/resume",
    "x  reset   [ ]  speed",
    "d  draw    q  quit",
];

/// Outcome of the last finished search, for the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Found { cells: usize, cost: u64 },
    NoPath,
}

/// Editor and visualizer state.
pub struct Visualizer {
    grid: Grid,
    runner: Runner,
    selected_kind: AlgorithmKind,
    cursor: Point,
    selection: BTreeSet<Point>,
    /// Whether a mouse drag selects (`true`) or deselects.
    drag: Option<bool>,
    scroll: Point,
    screen_size: Point,
    verdict: Option<Verdict>,
    rng: StdRng,
    log: LogBuffer,
}

impl Visualizer {
    pub fn new(grid: Grid, config: SimConfig, seed: u64, log: LogBuffer) -> Self {
        let selected_kind = config.algorithm;
        Self {
            grid,
            runner: Runner::new(config),
            selected_kind,
            cursor: Point::ZERO,
            selection: BTreeSet::new(),
            drag: None,
            scroll: Point::ZERO,
            screen_size: Point::new(80, 24),
            verdict: None,
            rng: StdRng::seed_from_u64(seed),
            log,
        }
    }

    /// Set the terminal size the layout starts from.
    pub fn with_screen_size(mut self, width: i32, height: i32) -> Self {
        self.screen_size = Point::new(width, height);
        self
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    #[inline]
    pub fn selected_kind(&self) -> AlgorithmKind {
        self.selected_kind
    }

    #[inline]
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn selection(&self) -> impl Iterator<Item = Point> + '_ {
        self.selection.iter().copied()
    }

    /// Show a status message in the log panel.
    fn notify(&self, level: Level, text: impl Into<String>) {
        self.log.push(level, text);
    }

    // -------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------

    /// Screen area showing the grid.
    fn map_area(&self) -> Range {
        Range::new(
            0,
            0,
            (self.screen_size.x - PANEL_W).max(CELL_W),
            (self.screen_size.y - LOG_H).max(1),
        )
    }

    /// Number of grid columns and rows that fit on screen.
    fn viewport(&self) -> Point {
        let area = self.map_area();
        Point::new((area.width() / CELL_W).max(1), area.height().max(1))
    }

    /// Scroll so the cursor is visible.
    fn follow_cursor(&mut self) {
        let view = self.viewport();
        let follow = |scroll: i32, cursor: i32, span: i32| {
            if cursor < scroll {
                cursor
            } else if cursor >= scroll + span {
                cursor - span + 1
            } else {
                scroll
            }
        };
        self.scroll = Point::new(
            follow(self.scroll.x, self.cursor.x, view.x),
            follow(self.scroll.y, self.cursor.y, view.y),
        );
    }

    /// The grid cell under a screen position, if any.
    fn cell_under(&self, pos: Point) -> Option<Point> {
        if !self.map_area().contains(pos) {
            return None;
        }
        let p = Point::new(pos.x / CELL_W + self.scroll.x, pos.y + self.scroll.y);
        self.grid.contains(p).then_some(p)
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key, modifiers: ModMask) -> Option<Effect> {
        let extend = modifiers.contains(ModMask::SHIFT);
        match key {
            Key::ArrowUp | Key::Char('k') => self.move_cursor(0, -1, extend),
            Key::ArrowDown | Key::Char('j') => self.move_cursor(0, 1, extend),
            Key::ArrowLeft | Key::Char('h') => self.move_cursor(-1, 0, extend),
            Key::ArrowRight | Key::Char('l') => self.move_cursor(1, 0, extend),
            Key::Char(' ') => self.toggle_selected(self.cursor),
            Key::Escape => self.selection.clear(),
            Key::Char(c @ '1'..='9') => {
                let cost = c.to_digit(10).unwrap_or(1);
                self.edit_costs(cost);
            }
            Key::Char('w') => self.edit_costs(WALL_COST),
            Key::Char('s') => self.place_endpoint(true),
            Key::Char('g') => self.place_endpoint(false),
            Key::Char('r') => self.scatter(),
            Key::Char('+') | Key::Char('=') => self.resize_by(1),
            Key::Char('-') => self.resize_by(-1),
            Key::Tab => {
                self.selected_kind = self.selected_kind.next();
                self.notify(Level::Info, format!("selected {}", self.selected_kind));
            }
            Key::Enter => self.start_pause_resume(),
            Key::Char('x') | Key::Backspace => self.reset_search(),
            Key::Char('[') => self.change_speed(false),
            Key::Char(']') => self.change_speed(true),
            Key::Char('d') => {
                let session = self.runner.session_mut();
                let draw = !session.draw();
                session.set_draw(draw);
            }
            Key::Char('q') => return Some(Effect::End),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point) {
        if action == MouseAction::Release {
            self.drag = None;
            return;
        }
        let Some(p) = self.cell_under(pos) else {
            return;
        };
        let select = match action {
            MouseAction::Main => true,
            MouseAction::Secondary => false,
            MouseAction::Drag => match self.drag {
                Some(select) => select,
                None => return,
            },
            MouseAction::Release => return,
        };
        self.drag = Some(select);
        self.cursor = p;
        if select {
            self.selection.insert(p);
        } else {
            self.selection.remove(&p);
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32, extend: bool) {
        let p = self.cursor.shift(dx, dy);
        if !self.grid.contains(p) {
            return;
        }
        if extend {
            self.selection.insert(self.cursor);
            self.selection.insert(p);
        }
        self.cursor = p;
        self.follow_cursor();
    }

    fn toggle_selected(&mut self, p: Point) {
        if !self.selection.remove(&p) {
            self.selection.insert(p);
        }
    }

    /// Cells an edit applies to: the selection, or the cursor cell.
    fn targets(&self) -> Vec<Point> {
        if self.selection.is_empty() {
            vec![self.cursor]
        } else {
            self.selection.iter().copied().collect()
        }
    }

    /// Make the grid editable: refuse while a search holds it, and wipe the
    /// marks of a search that already gave it up.
    fn begin_edit(&mut self) -> bool {
        if self.runner.is_active() {
            self.notify(
                Level::Warn,
                "grid is in use by a search, press x to reset first",
            );
            return false;
        }
        if self.runner.session().state() != SimState::Stopped {
            self.runner.reset();
        }
        self.verdict = None;
        true
    }

    fn edit_costs(&mut self, cost: u32) {
        if !self.begin_edit() {
            return;
        }
        let (start, goal) = (self.grid.start(), self.grid.goal());
        let mut changed = 0;
        for p in self.targets() {
            if cost == WALL_COST && (p == start || p == goal) {
                log::debug!("not walling the endpoint at {p}");
                continue;
            }
            match self.grid.set_cost(p, cost) {
                Ok(()) => changed += 1,
                Err(e) => self.notify(Level::Warn, e.to_string()),
            }
        }
        if cost == WALL_COST {
            log::debug!("walled {changed} cells");
        } else {
            log::debug!("set cost {cost} on {changed} cells");
        }
    }

    /// Move the start (or goal) to one of the targets, chosen at random
    /// when several cells are selected.
    fn place_endpoint(&mut self, start: bool) {
        if !self.begin_edit() {
            return;
        }
        let targets = self.targets();
        let p = targets[self.rng.random_range(0..targets.len())];
        let what = if start { "start" } else { "goal" };
        if self.grid.cell_at(p).is_ok_and(|c| c.is_wall()) {
            self.notify(Level::Warn, format!("cannot put the {what} on a wall"));
            return;
        }
        let other = if start { self.grid.goal() } else { self.grid.start() };
        if p == other {
            self.notify(Level::Warn, "start and goal must be different cells");
            return;
        }
        let result = if start {
            self.grid.set_start(p)
        } else {
            self.grid.set_goal(p)
        };
        match result {
            Ok(()) => self.notify(Level::Info, format!("{what} moved to {p}")),
            Err(e) => self.notify(Level::Warn, e.to_string()),
        }
    }

    /// Randomise walls and costs over the targets, or the whole grid when
    /// nothing is selected.
    fn scatter(&mut self) {
        if !self.begin_edit() {
            return;
        }
        let cells: Vec<Point> = if self.selection.is_empty() {
            self.grid.bounds().iter().collect()
        } else {
            self.targets()
        };
        let (start, goal) = (self.grid.start(), self.grid.goal());
        for p in cells {
            let roll = self.rng.random_range(0..100);
            let cost = if p == start || p == goal {
                1
            } else if roll < 25 {
                WALL_COST
            } else if roll < 60 {
                1
            } else {
                self.rng.random_range(2..=9)
            };
            if let Err(e) = self.grid.set_cost(p, cost) {
                self.notify(Level::Warn, e.to_string());
                return;
            }
        }
        self.notify(Level::Info, "scattered walls and costs");
    }

    fn resize_by(&mut self, delta: i32) {
        if !self.begin_edit() {
            return;
        }
        let w = (self.grid.width() + delta).clamp(1, MAX_GRID_DIM);
        let h = (self.grid.height() + delta).clamp(1, MAX_GRID_DIM);
        if (w, h) == (self.grid.width(), self.grid.height()) {
            return;
        }
        match self.grid.resize(w, h) {
            Ok(()) => {
                self.selection.clear();
                self.cursor = Point::new(self.cursor.x.min(w - 1), self.cursor.y.min(h - 1));
                self.follow_cursor();
                self.notify(Level::Info, format!("grid resized to {w}x{h}"));
            }
            Err(e) => self.notify(Level::Warn, e.to_string()),
        }
    }

    fn start_pause_resume(&mut self) {
        let kind = self.selected_kind;
        let session = self.runner.session();
        if !session.controls_available(kind) {
            if let Some(other) = session.algorithm() {
                self.notify(
                    Level::Warn,
                    format!("another search ({other}) is loaded, press x to reset"),
                );
            }
            return;
        }
        match session.state() {
            SimState::Stopped => {
                let (start, goal) = (self.grid.start(), self.grid.goal());
                self.verdict = None;
                match self.runner.begin(&self.grid, kind) {
                    Ok(()) => {
                        self.notify(Level::Info, format!("{kind}: searching {start} -> {goal}"))
                    }
                    Err(e) => {
                        self.notify(Level::Error, format!("{kind} could not start: {e}"))
                    }
                }
            }
            SimState::Running => self.runner.session_mut().pause(),
            SimState::Paused => {
                let searching = self
                    .runner
                    .search()
                    .is_some_and(|s| s.status() == Status::Searching);
                if searching {
                    self.runner.session_mut().resume();
                } else {
                    self.notify(Level::Info, "search is over, press x to reset");
                }
            }
        }
    }

    fn reset_search(&mut self) {
        if self.runner.session().state() == SimState::Stopped && !self.runner.is_active() {
            return;
        }
        self.runner.reset();
        self.verdict = None;
    }

    fn change_speed(&mut self, faster: bool) {
        let speed = self.runner.session().speed();
        let step = if speed < 10 || (speed == 10 && !faster) { 1 } else { 10 };
        let target = if faster {
            speed.saturating_add(step)
        } else {
            speed.saturating_sub(step)
        };
        self.runner.session_mut().set_speed(target);
    }

    fn on_tick(&mut self) {
        match self.runner.tick() {
            Ok(TickOutcome::Idle | TickOutcome::Progress(_)) => {}
            Ok(TickOutcome::Finished(path)) => match path_cost(&self.grid, &path) {
                Ok(cost) => {
                    self.notify(
                        Level::Info,
                        format!("path found: {} cells, cost {cost}", path.len()),
                    );
                    self.verdict = Some(Verdict::Found {
                        cells: path.len(),
                        cost,
                    });
                }
                Err(e) => self.notify(Level::Error, e.to_string()),
            },
            Ok(TickOutcome::NoPath) => {
                let msg = format!("no path from {} to {}", self.grid.start(), self.grid.goal());
                self.notify(Level::Warn, msg);
                self.verdict = Some(Verdict::NoPath);
            }
            Err(e) => self.notify(Level::Error, format!("search failed: {e}")),
        }
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn draw_map(&self, screen: &mut Screen) {
        let view = self.viewport();
        let session = self.runner.session();
        // With drawing off the exploration stays hidden until the search
        // stops running.
        let show_marks = session.draw() || session.state() != SimState::Running;

        for vy in 0..view.y {
            for vx in 0..view.x {
                let p = Point::new(vx + self.scroll.x, vy + self.scroll.y);
                let Ok(cell) = self.grid.cell_at(p) else {
                    continue;
                };
                let tag = if !show_marks && cell.tag.is_search_mark() {
                    Tag::Unvisited
                } else {
                    cell.tag
                };
                let (bg, fg) = tag_colors(tag);
                let label = match tag {
                    Tag::Wall => " # ".to_string(),
                    Tag::Start => " S ".to_string(),
                    Tag::Goal => " G ".to_string(),
                    _ if show_marks => cell_label(cell.note.unwrap_or(cell.cost)),
                    _ => cell_label(cell.cost),
                };

                let mut style = Style::default().with_fg(fg).with_bg(bg);
                if self.selection.contains(&p) {
                    style = style.with_bg(BG_SELECTED).with_fg(FG_DARK);
                }
                if p == self.cursor {
                    style = style.with_attrs(AttrMask::REVERSE | AttrMask::BOLD);
                }
                let origin = Point::new(vx * CELL_W, vy);
                screen.print(origin, &label, style, CELL_W as usize);
            }
        }
    }

    fn panel_lines(&self) -> Vec<(String, Style)> {
        let normal = Style::default().with_fg(FG).with_bg(BG_PANEL);
        let emph = normal.with_fg(FG_EMPH).with_attrs(AttrMask::BOLD);
        let dim = normal.with_fg(FG_DIM);
        let session = self.runner.session();

        let mut lines = vec![(" pathviz".to_string(), emph), (String::new(), normal)];
        let lock = if session.controls_available(self.selected_kind) {
            ""
        } else {
            " (locked)"
        };
        lines.push((format!(" algorithm  {}{lock}", self.selected_kind), normal));
        lines.push((format!(" state      {}", session.state()), normal));
        lines.push((format!(" speed      {} ticks/s", session.speed()), normal));
        let draw = if session.draw() { "on" } else { "off" };
        lines.push((format!(" draw       {draw}"), normal));
        lines.push((
            format!(" grid       {}x{}", self.grid.width(), self.grid.height()),
            normal,
        ));
        lines.push((String::new(), normal));

        let name = self.grid.name_of(self.cursor).unwrap_or_default();
        lines.push((format!(" cell {name} {}", self.cursor), emph));
        if let Ok(cell) = self.grid.cell_at(self.cursor) {
            let cost = if cell.is_wall() {
                "wall".to_string()
            } else {
                cell.cost.to_string()
            };
            lines.push((format!(" cost {cost}  {}", tag_name(cell.tag)), normal));
        }
        if let Some(info) = self.runner.search().and_then(|s| s.info(self.cursor)) {
            if info.cost != u32::MAX {
                lines.push((format!(" g {}  h {}", info.cost, info.estimate), normal));
            }
        }
        if !self.selection.is_empty() {
            lines.push((format!(" {} selected", self.selection.len()), normal));
        }
        lines.push((String::new(), normal));

        if let Some(search) = self.runner.search() {
            let stats = search.stats();
            lines.push((
                format!(" expanded {}  found {}", stats.expanded, stats.discovered),
                normal,
            ));
        }
        match &self.verdict {
            Some(Verdict::Found { cells, cost }) => {
                lines.push((format!(" path {cells} cells, cost {cost}"), emph));
            }
            Some(Verdict::NoPath) => lines.push((" no path".to_string(), emph)),
            None => {}
        }
        lines.push((String::new(), normal));
        lines.extend(KEYS_HELP.iter().map(|k| (format!(" {k}"), dim)));
        lines
    }

    fn draw_panel(&self, screen: &mut Screen) {
        let x0 = self.map_area().max.x;
        let area = Range::new(x0, 0, screen.width(), screen.height() - LOG_H);
        let bg = Style::default().with_bg(BG_PANEL);
        screen.fill_range(area, Glyph::new(' ', bg));
        let width = area.width().max(0) as usize;
        for (y, (text, style)) in self.panel_lines().into_iter().enumerate() {
            let y = y as i32;
            if y >= area.height() {
                break;
            }
            screen.print(Point::new(x0, y), &text, style, width);
        }
    }

    fn draw_log(&self, screen: &mut Screen) {
        let y0 = (screen.height() - LOG_H).max(0);
        let width = screen.width().max(0) as usize;
        for (i, line) in self.log.recent(LOG_H as usize).into_iter().enumerate() {
            let style = Style::default().with_fg(level_color(line.level));
            screen.print(Point::new(0, y0 + i as i32), &line.display(), style, width);
        }
    }
}

/// A right-aligned number fitting in one cell.
fn cell_label(n: u32) -> String {
    if n <= 999 {
        format!("{n:>3}")
    } else {
        "1k+".to_string()
    }
}

fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::Wall => "wall",
        Tag::Unvisited => "unvisited",
        Tag::Open => "open",
        Tag::Closed => "closed",
        Tag::Start => "start",
        Tag::Goal => "goal",
        Tag::Path => "path",
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                let msg = format!(
                    "{}x{} grid, {} selected, press enter to search",
                    self.grid.width(),
                    self.grid.height(),
                    self.selected_kind
                );
                self.notify(Level::Info, msg);
                None
            }
            Msg::Screen { width, height } => {
                self.screen_size = Point::new(width, height);
                self.follow_cursor();
                None
            }
            Msg::Tick => {
                self.on_tick();
                None
            }
            Msg::KeyDown { key, modifiers } => self.handle_key(key, modifiers),
            Msg::Mouse { action, pos } => {
                self.handle_mouse(action, pos);
                None
            }
        }
    }

    fn draw(&self, screen: &mut Screen) {
        self.draw_map(screen);
        self.draw_panel(screen);
        self.draw_log(screen);
    }

    fn tick_interval(&self) -> Option<Duration> {
        (self.runner.session().state() == SimState::Running).then(|| self.runner.interval())
    }
}
