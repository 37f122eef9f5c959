//! The [`Grid`] type: a weighted 2D grid shared between the editor, the
//! running search and the renderer.
//!
//! A `Grid` is a handle onto shared storage: cloning it yields another handle
//! to the **same** cells, so every holder observes every mutation. Only one
//! search may write search marks at a time; it proves this by holding the
//! grid's [`Lease`]. Structural edits (costs, start, goal, size) are refused
//! while a lease is held.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::{Cell, Tag, WALL_COST, cell_name, is_valid_cost};
use crate::error::GridError;
use crate::geom::{Point, Range, RangeIter};

/// Largest supported width or height.
pub const MAX_GRID_DIM: i32 = 100;

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct GridBuffer {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
    start: Point,
    goal: Point,
    epoch: u64,
    leased: bool,
}

impl GridBuffer {
    fn new(width: i32, height: i32) -> Self {
        let mut buf = Self {
            cells: vec![Cell::default(); (width * height) as usize],
            width,
            height,
            start: Point::ZERO,
            goal: Point::new(width - 1, height - 1),
            epoch: 0,
            leased: false,
        };
        let (start, goal) = (buf.start, buf.goal);
        buf.retag(goal);
        buf.retag(start);
        buf
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// The tag a cell shows when no search has touched it.
    fn base_tag(&self, p: Point, cell: &Cell) -> Tag {
        if p == self.start {
            Tag::Start
        } else if p == self.goal {
            Tag::Goal
        } else if cell.is_wall() {
            Tag::Wall
        } else {
            Tag::Unvisited
        }
    }

    fn retag(&mut self, p: Point) {
        if let Some(i) = self.index(p) {
            let tag = self.base_tag(p, &self.cells[i]);
            self.cells[i].tag = tag;
        }
    }
}

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

/// Proof that a search owns the grid's search marks.
///
/// Obtained from [`Grid::acquire_lease`]. A newer lease invalidates older
/// ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lease(u64);

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D grid of weighted [`Cell`]s backed by shared storage.
///
/// New grids have every cell at cost 1, the start in the top-left corner and
/// the goal in the bottom-right corner.
#[derive(Debug, Clone)]
pub struct Grid {
    buf: Rc<RefCell<GridBuffer>>,
}

impl Grid {
    /// Create a new grid. Both dimensions must be in `1..=MAX_GRID_DIM`.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        check_size(width, height)?;
        Ok(Self {
            buf: Rc::new(RefCell::new(GridBuffer::new(width, height))),
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.buf.borrow().width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.buf.borrow().height
    }

    /// The bounding range `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        let buf = self.buf.borrow();
        Range::new(0, 0, buf.width, buf.height)
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.borrow().cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.buf.borrow().index(p).is_some()
    }

    /// Whether two handles share the same storage.
    #[inline]
    pub fn same_storage(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }

    /// Row-major index of `p`.
    pub fn index(&self, p: Point) -> Result<usize, GridError> {
        let buf = self.buf.borrow();
        buf.index(p).ok_or(GridError::OutOfRange {
            pos: p,
            width: buf.width,
            height: buf.height,
        })
    }

    /// Position of the row-major index `idx`.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.width().max(1) as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Read the cell at `p`.
    pub fn cell_at(&self, p: Point) -> Result<Cell, GridError> {
        let i = self.index(p)?;
        Ok(self.buf.borrow().cells[i])
    }

    /// Traversal cost of the cell at `p`.
    pub fn cost_at(&self, p: Point) -> Result<u32, GridError> {
        self.cell_at(p).map(|c| c.cost)
    }

    /// The in-bounds cardinal neighbours of `p`, in up/right/down/left order.
    pub fn neighbors_of(&self, p: Point) -> Result<Vec<Point>, GridError> {
        self.index(p)?;
        let buf = self.buf.borrow();
        Ok(p
            .neighbors_4()
            .into_iter()
            .filter(|n| buf.index(*n).is_some())
            .collect())
    }

    /// Display name of the cell at `p` (A, B, …, Z, AA, …).
    pub fn name_of(&self, p: Point) -> Result<String, GridError> {
        self.index(p).map(cell_name)
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.buf.borrow().start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.buf.borrow().goal
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            inner: self.bounds().iter(),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Set the traversal cost of the cell at `p` ([`WALL_COST`] for a wall).
    pub fn set_cost(&self, p: Point, cost: u32) -> Result<(), GridError> {
        if !is_valid_cost(cost) {
            return Err(GridError::InvalidCost(cost));
        }
        let i = self.editable_index(p)?;
        let mut buf = self.buf.borrow_mut();
        buf.cells[i].cost = cost;
        buf.cells[i].note = None;
        buf.retag(p);
        Ok(())
    }

    /// Turn the cell at `p` into a wall.
    pub fn set_wall(&self, p: Point) -> Result<(), GridError> {
        self.set_cost(p, WALL_COST)
    }

    /// Move the start marker to `p`.
    pub fn set_start(&self, p: Point) -> Result<(), GridError> {
        self.editable_index(p)?;
        let mut buf = self.buf.borrow_mut();
        let old = std::mem::replace(&mut buf.start, p);
        buf.retag(old);
        buf.retag(p);
        Ok(())
    }

    /// Move the goal marker to `p`.
    pub fn set_goal(&self, p: Point) -> Result<(), GridError> {
        self.editable_index(p)?;
        let mut buf = self.buf.borrow_mut();
        let old = std::mem::replace(&mut buf.goal, p);
        buf.retag(old);
        buf.retag(p);
        Ok(())
    }

    /// Replace the grid with a fresh one of the given size. Every handle
    /// observes the new dimensions.
    pub fn resize(&self, width: i32, height: i32) -> Result<(), GridError> {
        check_size(width, height)?;
        let mut buf = self.buf.borrow_mut();
        if buf.leased {
            return Err(GridError::SearchActive);
        }
        let epoch = buf.epoch;
        *buf = GridBuffer::new(width, height);
        buf.epoch = epoch;
        Ok(())
    }

    fn editable_index(&self, p: Point) -> Result<usize, GridError> {
        let i = self.index(p)?;
        if self.buf.borrow().leased {
            return Err(GridError::SearchActive);
        }
        Ok(i)
    }

    // -----------------------------------------------------------------------
    // Search marks (written by search engines)
    // -----------------------------------------------------------------------

    /// Set the visualization tag of the cell at `p`.
    pub fn set_tag(&self, p: Point, tag: Tag) -> Result<(), GridError> {
        let i = self.index(p)?;
        self.buf.borrow_mut().cells[i].tag = tag;
        Ok(())
    }

    /// Set the display annotation of the cell at `p`.
    pub fn set_note(&self, p: Point, note: Option<u32>) -> Result<(), GridError> {
        let i = self.index(p)?;
        self.buf.borrow_mut().cells[i].note = note;
        Ok(())
    }

    /// Reset every Open/Closed/Path tag and every annotation. Returns the
    /// number of cells that carried search marks.
    pub fn clear_search_marks(&self) -> usize {
        let mut buf = self.buf.borrow_mut();
        let mut cleared = 0;
        for i in 0..buf.cells.len() {
            let cell = buf.cells[i];
            if cell.tag.is_search_mark() || cell.note.is_some() {
                cleared += 1;
                buf.cells[i].note = None;
                let p = Point::new(i as i32 % buf.width, i as i32 / buf.width);
                buf.retag(p);
            }
        }
        cleared
    }

    /// Take ownership of the grid's search marks. The returned flag is
    /// `true` when another search still held the grid.
    pub fn acquire_lease(&self) -> (Lease, bool) {
        let mut buf = self.buf.borrow_mut();
        let was_held = buf.leased;
        buf.epoch = buf.epoch.wrapping_add(1);
        buf.leased = true;
        (Lease(buf.epoch), was_held)
    }

    /// Whether `lease` is the grid's current lease.
    pub fn holds_lease(&self, lease: Lease) -> bool {
        let buf = self.buf.borrow();
        buf.leased && buf.epoch == lease.0
    }

    /// Give the grid back. No-op for a superseded lease.
    pub fn release_lease(&self, lease: Lease) {
        let mut buf = self.buf.borrow_mut();
        if buf.epoch == lease.0 {
            buf.leased = false;
        }
    }

    /// Whether some search currently holds the grid.
    #[inline]
    pub fn is_leased(&self) -> bool {
        self.buf.borrow().leased
    }
}

fn check_size(width: i32, height: i32) -> Result<(), GridError> {
    if (1..=MAX_GRID_DIM).contains(&width) && (1..=MAX_GRID_DIM).contains(&height) {
        Ok(())
    } else {
        Err(GridError::InvalidSize { width, height })
    }
}

// ---------------------------------------------------------------------------
// GridIter
// ---------------------------------------------------------------------------

/// Iterator over `(Point, Cell)` pairs in a [`Grid`].
pub struct GridIter<'a> {
    grid: &'a Grid,
    inner: RangeIter,
}

impl Iterator for GridIter<'_> {
    type Item = (Point, Cell);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        let buf = self.grid.buf.borrow();
        let i = buf.index(p)?;
        Some((p, buf.cells[i]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_marks_corners() {
        let g = Grid::new(4, 3).unwrap();
        assert_eq!(g.start(), Point::new(0, 0));
        assert_eq!(g.goal(), Point::new(3, 2));
        assert_eq!(g.cell_at(Point::new(0, 0)).unwrap().tag, Tag::Start);
        assert_eq!(g.cell_at(Point::new(3, 2)).unwrap().tag, Tag::Goal);
        assert_eq!(g.cell_at(Point::new(1, 1)).unwrap().tag, Tag::Unvisited);
        assert_eq!(g.len(), 12);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(matches!(
            Grid::new(0, 3),
            Err(GridError::InvalidSize { width: 0, height: 3 })
        ));
        assert!(Grid::new(MAX_GRID_DIM + 1, 1).is_err());
        assert!(Grid::new(MAX_GRID_DIM, MAX_GRID_DIM).is_ok());
    }

    #[test]
    fn cell_at_is_bounds_checked() {
        let g = Grid::new(2, 2).unwrap();
        let err = g.cell_at(Point::new(2, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfRange {
                pos: Point::new(2, 0),
                width: 2,
                height: 2
            }
        );
        assert!(g.cell_at(Point::new(0, -1)).is_err());
    }

    #[test]
    fn neighbors_respect_bounds() {
        let g = Grid::new(3, 3).unwrap();
        assert_eq!(
            g.neighbors_of(Point::new(0, 0)).unwrap(),
            vec![Point::new(1, 0), Point::new(0, 1)]
        );
        assert_eq!(g.neighbors_of(Point::new(1, 1)).unwrap().len(), 4);
        assert_eq!(g.neighbors_of(Point::new(2, 1)).unwrap().len(), 3);
        assert!(g.neighbors_of(Point::new(3, 3)).is_err());
    }

    #[test]
    fn clones_share_storage() {
        let g = Grid::new(3, 3).unwrap();
        let view = g.clone();
        g.set_wall(Point::new(1, 1)).unwrap();
        assert!(view.cell_at(Point::new(1, 1)).unwrap().is_wall());
        assert_eq!(view.cell_at(Point::new(1, 1)).unwrap().tag, Tag::Wall);
        assert!(g.same_storage(&view));
    }

    #[test]
    fn set_cost_validates_and_retags() {
        let g = Grid::new(3, 3).unwrap();
        let p = Point::new(1, 0);
        assert_eq!(g.set_cost(p, 0), Err(GridError::InvalidCost(0)));
        g.set_wall(p).unwrap();
        g.set_cost(p, 5).unwrap();
        let c = g.cell_at(p).unwrap();
        assert_eq!(c.cost, 5);
        assert_eq!(c.tag, Tag::Unvisited);
    }

    #[test]
    fn moving_start_restores_old_tag() {
        let g = Grid::new(3, 3).unwrap();
        g.set_start(Point::new(1, 1)).unwrap();
        assert_eq!(g.cell_at(Point::ZERO).unwrap().tag, Tag::Unvisited);
        assert_eq!(g.cell_at(Point::new(1, 1)).unwrap().tag, Tag::Start);
        g.set_goal(Point::new(0, 2)).unwrap();
        assert_eq!(g.cell_at(Point::new(2, 2)).unwrap().tag, Tag::Unvisited);
        assert_eq!(g.goal(), Point::new(0, 2));
    }

    #[test]
    fn lease_blocks_edits_until_released() {
        let g = Grid::new(3, 3).unwrap();
        let (lease, stale) = g.acquire_lease();
        assert!(!stale);
        assert!(g.holds_lease(lease));
        assert_eq!(g.set_wall(Point::new(1, 1)), Err(GridError::SearchActive));
        assert_eq!(g.resize(5, 5), Err(GridError::SearchActive));
        // Search marks are still writable.
        g.set_tag(Point::new(1, 1), Tag::Open).unwrap();
        g.release_lease(lease);
        assert!(!g.is_leased());
        g.set_wall(Point::new(1, 1)).unwrap();
    }

    #[test]
    fn newer_lease_supersedes_older() {
        let g = Grid::new(2, 2).unwrap();
        let (first, _) = g.acquire_lease();
        let (second, stale) = g.acquire_lease();
        assert!(stale);
        assert!(!g.holds_lease(first));
        assert!(g.holds_lease(second));
        g.release_lease(first);
        assert!(g.is_leased());
        g.release_lease(second);
        assert!(!g.is_leased());
    }

    #[test]
    fn clear_search_marks_restores_base_tags() {
        let g = Grid::new(3, 1).unwrap();
        g.set_tag(Point::new(0, 0), Tag::Closed).unwrap();
        g.set_tag(Point::new(1, 0), Tag::Path).unwrap();
        g.set_note(Point::new(1, 0), Some(1)).unwrap();
        assert_eq!(g.clear_search_marks(), 2);
        assert_eq!(g.cell_at(Point::new(0, 0)).unwrap().tag, Tag::Start);
        let mid = g.cell_at(Point::new(1, 0)).unwrap();
        assert_eq!(mid.tag, Tag::Unvisited);
        assert_eq!(mid.note, None);
        assert_eq!(g.clear_search_marks(), 0);
    }

    #[test]
    fn resize_resets_cells_for_every_handle() {
        let g = Grid::new(2, 2).unwrap();
        let view = g.clone();
        g.set_wall(Point::new(1, 0)).unwrap();
        g.resize(4, 3).unwrap();
        assert_eq!(view.width(), 4);
        assert_eq!(view.height(), 3);
        assert_eq!(view.goal(), Point::new(3, 2));
        assert!(!view.cell_at(Point::new(1, 0)).unwrap().is_wall());
    }

    #[test]
    fn names_follow_row_major_order() {
        let g = Grid::new(27, 2).unwrap();
        assert_eq!(g.name_of(Point::new(0, 0)).unwrap(), "A");
        assert_eq!(g.name_of(Point::new(26, 0)).unwrap(), "AA");
        assert_eq!(g.name_of(Point::new(0, 1)).unwrap(), "AB");
    }

    #[test]
    fn iter_visits_every_cell() {
        let g = Grid::new(3, 2).unwrap();
        let cells: Vec<(Point, Cell)> = g.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5].0, Point::new(2, 1));
        assert_eq!(cells[5].1.tag, Tag::Goal);
    }
}
