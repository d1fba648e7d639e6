//! Visualization driver: one resumable operation over one lattice.
//!
//! Every long-running algorithm is an [`Operation`] advanced with
//! [`Operation::step`]. Each step returns a [`Tick`] carrying the cells it
//! changed, so a caller can repaint between steps at whatever pace it likes.
//! The [`Visualizer`] owns the lattice and at most one active operation.

use rand::prelude::*;
use serde::Serialize;

use super::{CellDelta, Lattice, LatticeError, LifeAutomaton, MazeCarver, Pos, Search};
use crate::schema::{Algorithm, DrawMode, LatticeConfig, Layout};

/// How a finished operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Outcome {
    /// Goal reached; `path` runs from origin to goal inclusive.
    PathFound { path: Vec<Pos> },
    /// Frontier exhausted without reaching the goal.
    NoPath,
    /// Maze complete with `passages` open cells.
    MazeCarved { passages: usize },
    /// Game of Life stopped changing (or started repeating itself).
    Settled { generation: u64 },
    /// Game of Life reached its generation cap.
    Halted { generation: u64 },
}

impl Outcome {
    /// Whether a search reached its goal.
    #[inline]
    pub fn found(&self) -> bool {
        matches!(self, Outcome::PathFound { .. })
    }

    /// The found path, if any.
    pub fn path(&self) -> Option<&[Pos]> {
        match self {
            Outcome::PathFound { path } => Some(path),
            _ => None,
        }
    }
}

/// Whether an operation can be stepped further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Progress {
    Running,
    Finished(Outcome),
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tick {
    /// Cells changed by this step.
    pub delta: Vec<CellDelta>,
    pub progress: Progress,
}

impl Tick {
    #[inline]
    pub fn running(delta: Vec<CellDelta>) -> Self {
        Self {
            delta,
            progress: Progress::Running,
        }
    }

    #[inline]
    pub fn finished(delta: Vec<CellDelta>, outcome: Outcome) -> Self {
        Self {
            delta,
            progress: Progress::Finished(outcome),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.progress, Progress::Finished(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.progress {
            Progress::Finished(outcome) => Some(outcome),
            Progress::Running => None,
        }
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        match self.progress {
            Progress::Finished(outcome) => Some(outcome),
            Progress::Running => None,
        }
    }
}

/// A resumable operation.
#[derive(Debug, Clone)]
pub enum Operation {
    Search(Search),
    Maze(MazeCarver),
    Life(LifeAutomaton),
}

impl Operation {
    /// Advance by one step.
    pub fn step(&mut self, lattice: &mut Lattice) -> Tick {
        match self {
            Operation::Search(search) => search.step(lattice),
            Operation::Maze(carver) => carver.step(lattice),
            Operation::Life(life) => life.step(lattice),
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> String {
        match self {
            Operation::Search(search) => search.algorithm().to_string(),
            Operation::Maze(_) => "maze".to_string(),
            Operation::Life(_) => "life".to_string(),
        }
    }
}

/// Lattice plus the operation currently running on it.
#[derive(Debug)]
pub struct Visualizer {
    config: LatticeConfig,
    lattice: Lattice,
    active: Option<Operation>,
    rng: StdRng,
}

impl Visualizer {
    /// Create an empty lattice from `config`.
    pub fn new(config: LatticeConfig) -> Result<Self, LatticeError> {
        let lattice = Lattice::from_config(&config)?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!(
            "Created {}x{} visualizer",
            lattice.rows(),
            lattice.cols()
        );

        Ok(Self {
            config,
            lattice,
            active: None,
            rng,
        })
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Direct lattice access. Does not cancel the active operation.
    #[inline]
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    #[inline]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn active(&self) -> Option<&Operation> {
        self.active.as_ref()
    }

    /// Drop the active operation, leaving its marks on the lattice.
    ///
    /// Returns whether anything was running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(op) => {
                log::debug!("Cancelled {} operation", op.name());
                true
            }
            None => false,
        }
    }

    pub fn paint(&mut self, row: usize, col: usize) -> Result<Vec<CellDelta>, LatticeError> {
        self.cancel();
        self.lattice.paint(row, col)
    }

    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) {
        self.lattice.set_draw_mode(draw_mode);
    }

    pub fn clear(&mut self) -> Vec<CellDelta> {
        self.cancel();
        self.lattice.clear()
    }

    pub fn fill(&mut self) -> Vec<CellDelta> {
        self.cancel();
        self.lattice.fill()
    }

    /// Random walls with the given density, or the configured one.
    pub fn randomize(&mut self, density: Option<f64>) -> Result<Vec<CellDelta>, LatticeError> {
        self.cancel();
        let density = density.unwrap_or(self.config.density);
        self.lattice.randomize(density, &mut self.rng)
    }

    pub fn apply_layout(&mut self, layout: &Layout) -> Result<Vec<CellDelta>, LatticeError> {
        self.cancel();
        self.lattice.apply_layout(layout, &mut self.rng)
    }

    /// Begin a search, replacing any active operation.
    ///
    /// Returns the cells wiped from earlier runs.
    pub fn start_search(&mut self, algorithm: Algorithm) -> Result<Vec<CellDelta>, LatticeError> {
        self.cancel();
        let (search, delta) = Search::start(&mut self.lattice, algorithm)?;
        self.active = Some(Operation::Search(search));
        Ok(delta)
    }

    /// Begin maze generation. Returns the fill delta.
    pub fn start_maze(&mut self) -> Vec<CellDelta> {
        self.cancel();
        let (carver, delta) = MazeCarver::start(&mut self.lattice, self.rng.next_u64());
        self.active = Some(Operation::Maze(carver));
        delta
    }

    /// Begin the Game of Life. Returns the normalization delta.
    pub fn start_life(&mut self) -> Vec<CellDelta> {
        self.cancel();
        let (life, delta) = LifeAutomaton::start(&mut self.lattice, self.config.life.clone());
        self.active = Some(Operation::Life(life));
        delta
    }

    /// Advance the active operation. `None` when nothing is running.
    pub fn step(&mut self) -> Option<Tick> {
        let op = self.active.as_mut()?;
        let tick = op.step(&mut self.lattice);
        if tick.is_finished() {
            self.active = None;
        }
        Some(tick)
    }

    /// Step until the active operation finishes or `max_steps` is spent.
    ///
    /// Returns the outcome, or `None` if nothing finished.
    pub fn run_to_end(&mut self, max_steps: Option<u64>) -> Option<Outcome> {
        let mut steps = 0u64;
        while max_steps.is_none_or(|max| steps < max) {
            let tick = self.step()?;
            steps += 1;
            if let Some(outcome) = tick.into_outcome() {
                return Some(outcome);
            }
        }
        log::debug!("Stopped after {steps} steps without finishing");
        None
    }

    /// Run a whole search.
    pub fn visualize(&mut self, algorithm: Algorithm) -> Result<Outcome, LatticeError> {
        self.start_search(algorithm)?;
        Ok(self.finish_active())
    }

    /// Generate a whole maze.
    pub fn generate_maze(&mut self) -> Outcome {
        self.start_maze();
        self.finish_active()
    }

    /// Run the Game of Life for at most `generations` generations.
    ///
    /// Returns `Halted` when the budget runs out first. Unlike
    /// [`LifeConfig::max_generations`](crate::schema::LifeConfig), the budget
    /// applies to this call only.
    pub fn run_life(&mut self, generations: u64) -> Outcome {
        self.start_life();
        match self.run_to_end(Some(generations)) {
            Some(outcome) => outcome,
            None => {
                let generation = match self.active.take() {
                    Some(Operation::Life(life)) => life.generation(),
                    _ => generations,
                };
                Outcome::Halted { generation }
            }
        }
    }

    /// Step the active operation, which always terminates, to completion.
    fn finish_active(&mut self) -> Outcome {
        let Some(op) = self.active.as_mut() else {
            return Outcome::NoPath;
        };
        let outcome = loop {
            if let Some(outcome) = op.step(&mut self.lattice).into_outcome() {
                break outcome;
            }
        };
        self.active = None;
        outcome
    }
}
