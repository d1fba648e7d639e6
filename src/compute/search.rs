//! Resumable pathfinding: depth-first, breadth-first, Dijkstra and A*.
//!
//! A `Search` holds its frontier between calls to [`Search::step`], and each
//! step visits exactly one cell. Edges all weigh 1, so the distance-based
//! strategies select their next cell with a linear scan of the frontier
//! instead of a heap.

use std::collections::VecDeque;

use super::{CellDelta, Lattice, LatticeError, Outcome, Pos, Tick};
use crate::schema::{Algorithm, CellState};

/// Sentinel for "no known route yet".
const UNREACHED: u32 = u32::MAX;

/// Frontier and bookkeeping for one strategy.
#[derive(Debug, Clone)]
enum Frontier {
    /// Depth-first: last pushed, first explored.
    Stack(Vec<Pos>),
    /// Breadth-first, drained one round (BFS layer) at a time.
    Rounds {
        queue: VecDeque<Pos>,
        /// Cells of the current round still in the queue.
        remaining: usize,
        round: usize,
        /// Cells already queued this run; they keep their first predecessor.
        discovered: Vec<bool>,
    },
    /// Dijkstra, or A* when `guided`.
    Relax {
        dist: Vec<u32>,
        /// Cells with a finite distance, in discovery order.
        open: Vec<Pos>,
        current: Option<Pos>,
        guided: bool,
    },
}

/// An in-progress search from the lattice's origin to its goal.
#[derive(Debug, Clone)]
pub struct Search {
    algorithm: Algorithm,
    goal: Pos,
    frontier: Frontier,
    visited: usize,
    outcome: Option<Outcome>,
}

impl Search {
    /// Prepare a search over `lattice`.
    ///
    /// Wipes Visited/Path cells and all predecessor links left by earlier
    /// runs, and for A* computes every cell's heuristic. Returns the search
    /// together with the cells the wipe changed.
    pub fn start(
        lattice: &mut Lattice,
        algorithm: Algorithm,
    ) -> Result<(Self, Vec<CellDelta>), LatticeError> {
        let (origin, goal) = lattice.endpoints()?;

        let delta = lattice.clear_states(&[CellState::Visited, CellState::Path]);
        lattice.forget_search();

        let frontier = match algorithm {
            Algorithm::Dfs => Frontier::Stack(vec![origin]),
            Algorithm::Bfs => {
                let mut discovered = vec![false; lattice.len()];
                discovered[lattice.idx(origin)] = true;
                Frontier::Rounds {
                    queue: VecDeque::from([origin]),
                    remaining: 1,
                    round: 0,
                    discovered,
                }
            }
            Algorithm::Dijkstra | Algorithm::AStar => {
                let guided = algorithm == Algorithm::AStar;
                if guided {
                    assign_heuristics(lattice, goal);
                }
                let mut dist = vec![UNREACHED; lattice.len()];
                dist[lattice.idx(origin)] = 0;
                Frontier::Relax {
                    dist,
                    open: Vec::new(),
                    current: Some(origin),
                    guided,
                }
            }
        };

        log::debug!("Starting {algorithm} search from {origin:?} to {goal:?}");

        let search = Self {
            algorithm,
            goal,
            frontier,
            visited: 0,
            outcome: None,
        };
        Ok((search, delta))
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Cells marked Visited so far.
    #[inline]
    pub fn visited(&self) -> usize {
        self.visited
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance by one visited cell.
    ///
    /// Once finished, further calls repeat the outcome with an empty delta.
    pub fn step(&mut self, lattice: &mut Lattice) -> Tick {
        if let Some(outcome) = &self.outcome {
            return Tick::finished(Vec::new(), outcome.clone());
        }

        let goal = self.goal;
        let mut delta = Vec::new();
        let reached = match &mut self.frontier {
            Frontier::Stack(stack) => step_depth_first(lattice, stack, goal, &mut delta),
            Frontier::Rounds {
                queue,
                remaining,
                round,
                discovered,
            } => step_breadth_first(
                lattice,
                queue,
                remaining,
                round,
                discovered,
                goal,
                &mut delta,
            ),
            Frontier::Relax {
                dist,
                open,
                current,
                guided,
            } => step_relax(lattice, dist, open, current, *guided, goal, &mut delta),
        };
        self.visited += delta.len();

        match reached {
            Some(true) => {
                let path = lattice.trace_path(goal);
                delta.extend(lattice.mark_path(&path));
                self.finish(delta, Outcome::PathFound { path })
            }
            Some(false) => self.finish(delta, Outcome::NoPath),
            None => Tick::running(delta),
        }
    }

    /// Step until finished.
    pub fn run(&mut self, lattice: &mut Lattice) -> Outcome {
        loop {
            if let Some(outcome) = self.step(lattice).into_outcome() {
                return outcome;
            }
        }
    }

    fn finish(&mut self, delta: Vec<CellDelta>, outcome: Outcome) -> Tick {
        match &outcome {
            Outcome::PathFound { path } => log::debug!(
                "{} search found a {}-cell path after visiting {} cells",
                self.algorithm,
                path.len(),
                self.visited
            ),
            _ => log::debug!(
                "{} search exhausted after visiting {} cells",
                self.algorithm,
                self.visited
            ),
        }
        self.outcome = Some(outcome.clone());
        Tick::finished(delta, outcome)
    }
}

/// Euclidean distance to `goal` for every cell, with the column axis negated.
fn assign_heuristics(lattice: &mut Lattice, goal: Pos) {
    let (gx, gy) = (goal.row as f64, -(goal.col as f64));
    for idx in 0..lattice.len() {
        let pos = lattice.pos_of(idx);
        let (x, y) = (pos.row as f64, -(pos.col as f64));
        let h = ((x - gx).powi(2) + (y - gy).powi(2)).sqrt();
        lattice.cell_mut(pos).set_heuristic(h);
    }
}

/// Mark `pos` Visited unless it is the origin.
fn visit(lattice: &mut Lattice, pos: Pos, delta: &mut Vec<CellDelta>) {
    if lattice.state(pos) != CellState::Origin {
        delta.extend(lattice.mark(pos, CellState::Visited));
    }
}

/// Returns `Some(found)` when the search ends, `None` to continue.
fn step_depth_first(
    lattice: &mut Lattice,
    stack: &mut Vec<Pos>,
    goal: Pos,
    delta: &mut Vec<CellDelta>,
) -> Option<bool> {
    loop {
        let Some(pos) = stack.pop() else {
            return Some(false);
        };
        if pos == goal {
            return Some(true);
        }
        // Stale entry: pushed more than once before being visited.
        if matches!(lattice.state(pos), CellState::Wall | CellState::Visited) {
            continue;
        }

        visit(lattice, pos, delta);
        for next in lattice.neighbours(pos) {
            if lattice.state(next).is_traversable() {
                lattice.cell_mut(next).set_predecessor(Some(pos));
                stack.push(next);
            }
        }
        return None;
    }
}

fn step_breadth_first(
    lattice: &mut Lattice,
    queue: &mut VecDeque<Pos>,
    remaining: &mut usize,
    round: &mut usize,
    discovered: &mut [bool],
    goal: Pos,
    delta: &mut Vec<CellDelta>,
) -> Option<bool> {
    loop {
        if *remaining == 0 {
            *remaining = queue.len();
            *round += 1;
            log::trace!("BFS round {} with {} cells", round, remaining);
        }
        let Some(pos) = queue.pop_front() else {
            return Some(false);
        };
        *remaining -= 1;

        if pos == goal {
            return Some(true);
        }
        if matches!(lattice.state(pos), CellState::Wall | CellState::Visited) {
            continue;
        }

        visit(lattice, pos, delta);
        for next in lattice.neighbours(pos) {
            let idx = lattice.idx(next);
            if !discovered[idx] && lattice.state(next).is_traversable() {
                discovered[idx] = true;
                lattice.cell_mut(next).set_predecessor(Some(pos));
                queue.push_back(next);
            }
        }
        return None;
    }
}

fn step_relax(
    lattice: &mut Lattice,
    dist: &mut [u32],
    open: &mut Vec<Pos>,
    current: &mut Option<Pos>,
    guided: bool,
    goal: Pos,
    delta: &mut Vec<CellDelta>,
) -> Option<bool> {
    let Some(node) = current.take() else {
        return Some(false);
    };

    visit(lattice, node, delta);
    let base = dist[lattice.idx(node)];
    for next in lattice.neighbours(node) {
        if !lattice.state(next).is_traversable() {
            continue;
        }
        let idx = lattice.idx(next);
        if base + 1 < dist[idx] {
            if dist[idx] == UNREACHED {
                open.push(next);
            }
            dist[idx] = base + 1;
            lattice.cell_mut(next).set_predecessor(Some(node));
        }
        // First discovery wins: every edge weighs 1.
        if next == goal {
            return Some(true);
        }
    }

    open.retain(|&pos| lattice.state(pos).is_traversable());
    let mut best: Option<(f64, Pos)> = None;
    for &pos in open.iter() {
        let mut score = dist[lattice.idx(pos)] as f64;
        if guided {
            score += lattice.cell(pos).heuristic().unwrap_or(0.0);
        }
        if best.is_none_or(|(lowest, _)| score < lowest) {
            best = Some((score, pos));
        }
    }

    match best {
        Some((_, pos)) => {
            *current = Some(pos);
            None
        }
        None => Some(false),
    }
}
