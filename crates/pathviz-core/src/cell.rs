//! The [`Cell`] type: a weighted grid cell with a visualization tag.

/// Traversal cost reserved for impassable cells.
pub const WALL_COST: u32 = u32::MAX;

/// Smallest cost an editable, passable cell may have.
pub const MIN_CELL_COST: u32 = 1;

/// Largest cost an editable, passable cell may have.
pub const MAX_CELL_COST: u32 = 99;

/// How a cell should be displayed.
///
/// Search engines write tags to report progress but never read them back to
/// make decisions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    Wall,
    #[default]
    Unvisited,
    /// In the frontier.
    Open,
    /// Expanded; cost is final.
    Closed,
    Start,
    Goal,
    /// On the final route.
    Path,
}

impl Tag {
    /// Whether the tag was produced by a search (as opposed to the editor).
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Open | Self::Closed | Self::Path)
    }
}

/// A single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub cost: u32,
    pub tag: Tag,
    /// Cost computed for this cell by the running search, for display.
    pub note: Option<u32>,
}

impl Cell {
    /// A passable cell with the given cost.
    #[inline]
    pub const fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            tag: if cost == WALL_COST { Tag::Wall } else { Tag::Unvisited },
            note: None,
        }
    }

    #[inline]
    pub const fn wall() -> Self {
        Self::with_cost(WALL_COST)
    }

    #[inline]
    pub const fn is_wall(&self) -> bool {
        self.cost == WALL_COST
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::with_cost(MIN_CELL_COST)
    }
}

/// Whether `cost` may be stored in a cell.
#[inline]
pub const fn is_valid_cost(cost: u32) -> bool {
    cost == WALL_COST || (cost >= MIN_CELL_COST && cost <= MAX_CELL_COST)
}

/// Spreadsheet-style name for the cell at 0-based row-major `index`:
/// A, B, …, Z, AA, AB, …
pub fn cell_name(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        out.push(b'A' + ((n - 1) % 26) as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_cheapest_passable() {
        let c = Cell::default();
        assert_eq!(c.cost, MIN_CELL_COST);
        assert_eq!(c.tag, Tag::Unvisited);
        assert!(!c.is_wall());
        assert!(Cell::wall().is_wall());
        assert_eq!(Cell::wall().tag, Tag::Wall);
    }

    #[test]
    fn cost_validation() {
        assert!(is_valid_cost(1));
        assert!(is_valid_cost(MAX_CELL_COST));
        assert!(is_valid_cost(WALL_COST));
        assert!(!is_valid_cost(0));
        assert!(!is_valid_cost(MAX_CELL_COST + 1));
    }

    #[test]
    fn names_are_bijective_base_26() {
        assert_eq!(cell_name(0), "A");
        assert_eq!(cell_name(25), "Z");
        assert_eq!(cell_name(26), "AA");
        assert_eq!(cell_name(27), "AB");
        assert_eq!(cell_name(26 + 26 * 26), "AAA");
    }

    #[test]
    fn search_marks() {
        assert!(Tag::Open.is_search_mark());
        assert!(Tag::Path.is_search_mark());
        assert!(!Tag::Start.is_search_mark());
        assert!(!Tag::Wall.is_search_mark());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cell_keeps_note_and_tag() {
        let cell = Cell {
            cost: 7,
            tag: Tag::Closed,
            note: Some(12),
        };
        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(cell, back);
    }
}
