//! The lattice: cell storage, origin/goal bookkeeping and editing operations.
//!
//! Cells live in a flat row-major `Vec` indexed by `row * cols + col`.
//! Every mutating operation returns the cells whose state actually changed,
//! so a renderer only has to repaint those.

use std::fmt;

use rand::Rng;

use super::{Cell, CellDelta, MazeCarver, Pos};
use crate::schema::{CellState, ConfigError, DrawMode, LatticeConfig, Layout, Pattern};

/// Errors raised by lattice operations.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    #[error("Origin and goal must both be set before searching")]
    NotConfigured,
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} lattice")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Density must lie in [0, 1], got {0}")]
    InvalidDensity(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Rectangular grid of cells with at most one origin and one goal.
#[derive(Debug, Clone)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    origin: Option<Pos>,
    goal: Option<Pos>,
    draw_mode: DrawMode,
}

impl Lattice {
    /// Create an all-vacant lattice.
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(Pos::new(row, col))))
            .collect();

        Self {
            rows,
            cols,
            cells,
            origin: None,
            goal: None,
            draw_mode: DrawMode::default(),
        }
    }

    /// Create a lattice from validated configuration.
    pub fn from_config(config: &LatticeConfig) -> Result<Self, LatticeError> {
        config.validate()?;
        let (rows, cols) = config.grid_dim();
        let mut lattice = Self::new(rows, cols);
        lattice.draw_mode = config.draw_mode;
        Ok(lattice)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Validate a coordinate pair.
    pub fn check(&self, row: usize, col: usize) -> Result<Pos, LatticeError> {
        if self.contains(row, col) {
            Ok(Pos::new(row, col))
        } else {
            Err(LatticeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Flat index of an in-bounds position.
    ///
    /// # Panics
    /// Panics if `pos` lies outside the lattice.
    #[inline]
    pub fn idx(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos.row, pos.col),
            "{pos:?} is outside the {}x{} lattice",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Position of a flat index.
    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        Pos::new(idx / self.cols, idx % self.cols)
    }

    /// Cell at an in-bounds position.
    ///
    /// # Panics
    /// Panics if `pos` lies outside the lattice.
    #[inline]
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[self.idx(pos)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        let idx = self.idx(pos);
        &mut self.cells[idx]
    }

    /// Cell at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.contains(row, col)
            .then(|| &self.cells[row * self.cols + col])
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn state(&self, pos: Pos) -> CellState {
        self.cell(pos).state()
    }

    #[inline]
    pub fn origin(&self) -> Option<Pos> {
        self.origin
    }

    #[inline]
    pub fn goal(&self) -> Option<Pos> {
        self.goal
    }

    /// Origin and goal, when both are set.
    pub fn endpoints(&self) -> Result<(Pos, Pos), LatticeError> {
        match (self.origin, self.goal) {
            (Some(origin), Some(goal)) => Ok((origin, goal)),
            _ => Err(LatticeError::NotConfigured),
        }
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) {
        self.draw_mode = draw_mode;
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    /// Row-major copy of every cell state.
    pub fn snapshot(&self) -> Vec<CellState> {
        self.cells.iter().map(Cell::state).collect()
    }

    /// Write `state` into one cell, keeping origin/goal references in step.
    fn write(&mut self, pos: Pos, state: CellState) -> Option<CellDelta> {
        if self.origin == Some(pos) && state != CellState::Origin {
            self.origin = None;
        }
        if self.goal == Some(pos) && state != CellState::Goal {
            self.goal = None;
        }
        match state {
            CellState::Origin => self.origin = Some(pos),
            CellState::Goal => self.goal = Some(pos),
            _ => {}
        }

        let cell = self.cell_mut(pos);
        if cell.state() == state {
            return None;
        }
        cell.set_state(state);
        Some(cell.delta())
    }

    /// Set a cell's state.
    ///
    /// Assigning Origin or Goal demotes the previous holder of that role to
    /// Vacant. Overwriting the current origin or goal with any other state
    /// clears the role. Positions outside the lattice are rejected untouched.
    pub fn set_state(
        &mut self,
        pos: Pos,
        state: CellState,
    ) -> Result<Vec<CellDelta>, LatticeError> {
        let pos = self.check(pos.row, pos.col)?;
        let previous = match state {
            CellState::Origin => self.origin,
            CellState::Goal => self.goal,
            _ => None,
        };

        let mut delta = Vec::with_capacity(2);
        if let Some(old) = previous.filter(|&old| old != pos) {
            delta.extend(self.write(old, CellState::Vacant));
        }
        delta.extend(self.write(pos, state));
        Ok(delta)
    }

    /// Mark a cell with a non-role state (Visited, Path, Wall, Vacant).
    pub(crate) fn mark(&mut self, pos: Pos, state: CellState) -> Option<CellDelta> {
        debug_assert!(!matches!(state, CellState::Origin | CellState::Goal));
        self.write(pos, state)
    }

    /// Apply the current draw mode at `(row, col)`.
    pub fn paint(&mut self, row: usize, col: usize) -> Result<Vec<CellDelta>, LatticeError> {
        let pos = self.check(row, col).inspect_err(|e| log::warn!("Rejected paint: {e}"))?;
        self.set_state(pos, self.draw_mode.target_state())
    }

    /// Changed cells relative to an earlier snapshot.
    fn diff(&self, before: &[CellState]) -> Vec<CellDelta> {
        self.cells
            .iter()
            .zip(before)
            .filter(|(cell, old)| cell.state() != **old)
            .map(|(cell, _)| cell.delta())
            .collect()
    }

    /// Reset every cell to Vacant and drop origin/goal.
    pub fn clear(&mut self) -> Vec<CellDelta> {
        let before = self.snapshot();
        self.cells.iter_mut().for_each(Cell::reset);
        self.origin = None;
        self.goal = None;
        self.diff(&before)
    }

    /// Turn every cell into a wall and drop origin/goal.
    pub fn fill(&mut self) -> Vec<CellDelta> {
        let before = self.snapshot();
        for cell in &mut self.cells {
            cell.forget_search();
            cell.set_state(CellState::Wall);
        }
        self.origin = None;
        self.goal = None;
        self.diff(&before)
    }

    /// Clear, then make each cell a wall with probability `density`.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        density: f64,
        rng: &mut R,
    ) -> Result<Vec<CellDelta>, LatticeError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LatticeError::InvalidDensity(density));
        }

        let before = self.snapshot();
        self.clear();
        for cell in &mut self.cells {
            if rng.gen_range(0.0..1.0) < density {
                cell.set_state(CellState::Wall);
            }
        }
        Ok(self.diff(&before))
    }

    /// Reset cells in any of `states` to Vacant.
    pub fn clear_states(&mut self, states: &[CellState]) -> Vec<CellDelta> {
        let targets: Vec<Pos> = self
            .cells
            .iter()
            .filter(|c| states.contains(&c.state()))
            .map(Cell::pos)
            .collect();

        targets
            .into_iter()
            .filter_map(|pos| self.write(pos, CellState::Vacant))
            .collect()
    }

    /// Drop every predecessor link and heuristic.
    pub fn forget_search(&mut self) {
        self.cells.iter_mut().for_each(Cell::forget_search);
    }

    /// Axis-adjacent in-bounds neighbours, in the order up, down, left, right.
    ///
    /// The order sets the direction bias of depth- and breadth-first search.
    /// A position outside the lattice has no neighbours.
    pub fn neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let Pos { row, col } = pos;
        let inside = self.contains(row, col);
        [
            (inside && row > 0).then(|| Pos::new(row - 1, col)),
            (inside && row + 1 < self.rows).then(|| Pos::new(row + 1, col)),
            (inside && col > 0).then(|| Pos::new(row, col - 1)),
            (inside && col + 1 < self.cols).then(|| Pos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// In-bounds cells among the eight surrounding `pos`.
    pub fn surrounding(&self, pos: Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(8);
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (Some(row), Some(col)) = (
                    pos.row.checked_add_signed(dr),
                    pos.col.checked_add_signed(dc),
                ) else {
                    continue;
                };
                if self.contains(row, col) {
                    out.push(Pos::new(row, col));
                }
            }
        }
        out
    }

    /// Follow predecessor links back from `end`, returning the chain in
    /// forward order (the chain's root first, `end` last).
    pub fn trace_path(&self, end: Pos) -> Vec<Pos> {
        let mut path = vec![end];
        let mut current = end;
        while let Some(prev) = self.cell(current).predecessor() {
            if path.len() > self.len() {
                log::warn!("Predecessor chain from {end:?} does not terminate");
                break;
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    /// Mark every non-endpoint cell of `path` as Path.
    pub fn mark_path(&mut self, path: &[Pos]) -> Vec<CellDelta> {
        let inner: Vec<Pos> = path
            .iter()
            .copied()
            .filter(|&pos| !matches!(self.state(pos), CellState::Origin | CellState::Goal))
            .collect();

        inner
            .into_iter()
            .filter_map(|pos| self.mark(pos, CellState::Path))
            .collect()
    }

    /// Reset the lattice and seed it from a layout.
    pub fn apply_layout<R: Rng + ?Sized>(
        &mut self,
        layout: &Layout,
        rng: &mut R,
    ) -> Result<Vec<CellDelta>, LatticeError> {
        let endpoints = [
            (layout.origin, CellState::Origin),
            (layout.goal, CellState::Goal),
        ]
        .into_iter()
        .filter_map(|(at, state)| at.map(|(r, c)| self.check(r, c).map(|pos| (pos, state))))
        .collect::<Result<Vec<_>, _>>()?;

        match &layout.pattern {
            Pattern::Walls { cells } => {
                for &(r, c) in cells {
                    self.check(r, c)?;
                }
            }
            Pattern::Random { density } if !(0.0..=1.0).contains(density) => {
                return Err(LatticeError::InvalidDensity(*density));
            }
            _ => {}
        }

        let before = self.snapshot();
        self.clear();
        match &layout.pattern {
            Pattern::Empty => {}
            Pattern::Random { density } => {
                self.randomize(*density, rng)?;
            }
            Pattern::Maze => {
                let (mut carver, _) = MazeCarver::start(self, rng.next_u64());
                carver.run(self);
            }
            Pattern::Walls { cells } => {
                for &(r, c) in cells {
                    self.mark(Pos::new(r, c), CellState::Wall);
                }
            }
        }
        for (pos, state) in endpoints {
            self.set_state(pos, state)?;
        }

        log::debug!(
            "Applied {:?} layout to {}x{} lattice",
            layout.pattern,
            self.rows,
            self.cols
        );
        Ok(self.diff(&before))
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String = row.iter().map(|c| c.state().glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
