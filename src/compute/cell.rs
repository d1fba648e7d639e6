//! Single lattice cell and the position/delta types that refer to it.

use serde::{Deserialize, Serialize};

use crate::schema::CellState;

/// Row/column coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A changed cell, reported to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDelta {
    pub pos: Pos,
    pub state: CellState,
}

/// One lattice position's mutable state.
///
/// The predecessor is a position, not a reference: cells never own each
/// other and chains are rewritten on every search.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pos: Pos,
    state: CellState,
    predecessor: Option<Pos>,
    heuristic: Option<f64>,
}

impl Cell {
    /// Create a vacant cell.
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            state: CellState::Vacant,
            predecessor: None,
            heuristic: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.pos.row
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.pos.col
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Overwrite the state. Origin/goal bookkeeping is the lattice's job.
    #[inline]
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    #[inline]
    pub fn predecessor(&self) -> Option<Pos> {
        self.predecessor
    }

    #[inline]
    pub fn set_predecessor(&mut self, predecessor: Option<Pos>) {
        self.predecessor = predecessor;
    }

    #[inline]
    pub fn heuristic(&self) -> Option<f64> {
        self.heuristic
    }

    #[inline]
    pub fn set_heuristic(&mut self, value: f64) {
        self.heuristic = Some(value);
    }

    /// Drop search bookkeeping but keep the state.
    pub fn forget_search(&mut self) {
        self.predecessor = None;
        self.heuristic = None;
    }

    /// Back to a vacant cell with no search bookkeeping.
    pub fn reset(&mut self) {
        self.state = CellState::Vacant;
        self.forget_search();
    }

    /// Delta describing this cell's current state.
    #[inline]
    pub fn delta(&self) -> CellDelta {
        CellDelta {
            pos: self.pos,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_vacant() {
        let cell = Cell::new(Pos::new(2, 3));
        assert_eq!(cell.state(), CellState::Vacant);
        assert_eq!((cell.row(), cell.col()), (2, 3));
        assert!(cell.predecessor().is_none());
        assert!(cell.heuristic().is_none());
    }

    #[test]
    fn test_reset() {
        let mut cell = Cell::new(Pos::new(0, 0));
        cell.set_state(CellState::Visited);
        cell.set_predecessor(Some(Pos::new(0, 1)));
        cell.set_heuristic(4.5);

        cell.reset();

        assert_eq!(cell.state(), CellState::Vacant);
        assert!(cell.predecessor().is_none());
        assert!(cell.heuristic().is_none());
        assert_eq!(cell.pos(), Pos::new(0, 0));
    }

    #[test]
    fn test_forget_search_keeps_state() {
        let mut cell = Cell::new(Pos::new(1, 1));
        cell.set_state(CellState::Wall);
        cell.set_predecessor(Some(Pos::new(1, 0)));
        cell.forget_search();

        assert_eq!(cell.state(), CellState::Wall);
        assert!(cell.predecessor().is_none());
    }
}
