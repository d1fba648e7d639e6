//! Randomized depth-first maze carving.
//!
//! Maze cells sit two lattice units apart so that a one-cell wall can stand
//! between neighbouring passages. Starting from a filled lattice, the carver
//! repeatedly opens the wall between the current cell and a random uncarved
//! two-step neighbour, backtracking through an explicit stack. Each carve
//! joins exactly one new cell to the carved region, so the passages always
//! form a tree.

use rand::prelude::*;

use super::{CellDelta, Lattice, Outcome, Pos, Tick};
use crate::schema::CellState;

/// Resumable maze generator.
#[derive(Debug, Clone)]
pub struct MazeCarver {
    rng: StdRng,
    stack: Vec<Pos>,
    carved: usize,
    finished: bool,
}

impl MazeCarver {
    /// Fill `lattice` with walls and open a random interior start cell.
    ///
    /// Returns the carver and the cells changed by the fill.
    pub fn start(lattice: &mut Lattice, seed: u64) -> (Self, Vec<CellDelta>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut delta = lattice.fill();

        let mut stack = Vec::new();
        if !lattice.is_empty() {
            let start = Pos::new(
                odd_index(lattice.rows(), &mut rng),
                odd_index(lattice.cols(), &mut rng),
            );
            carve(lattice, start, &mut delta);
            stack.push(start);
            log::debug!(
                "Carving {}x{} maze from {:?}",
                lattice.rows(),
                lattice.cols(),
                start
            );
        }

        let carver = Self {
            rng,
            stack,
            carved: 1,
            finished: false,
        };
        (carver, delta)
    }

    /// Passages opened so far, counting the start cell.
    #[inline]
    pub fn carved(&self) -> usize {
        self.carved
    }

    /// Carve one passage (two cells), backtracking as needed.
    pub fn step(&mut self, lattice: &mut Lattice) -> Tick {
        while let Some(current) = self.stack.pop() {
            let uncarved: Vec<Pos> = two_step_neighbours(lattice, current)
                .filter(|&pos| lattice.state(pos) == CellState::Wall)
                .collect();
            let Some(&next) = uncarved.choose(&mut self.rng) else {
                continue;
            };

            self.stack.push(current);
            let mut delta = Vec::with_capacity(2);
            carve(lattice, between(current, next), &mut delta);
            carve(lattice, next, &mut delta);
            self.stack.push(next);
            self.carved += 1;
            return Tick::running(delta);
        }

        let passages = lattice.count(CellState::Vacant);
        if !self.finished {
            self.finished = true;
            log::debug!("Maze complete: {} cells carved, {} passages", self.carved, passages);
        }
        Tick::finished(Vec::new(), Outcome::MazeCarved { passages })
    }

    /// Step until the maze is complete.
    pub fn run(&mut self, lattice: &mut Lattice) -> Outcome {
        loop {
            if let Some(outcome) = self.step(lattice).into_outcome() {
                return outcome;
            }
        }
    }
}

/// Random odd index strictly inside `0..len`, or 0 when there is none.
fn odd_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    if len < 3 {
        0
    } else {
        2 * rng.gen_range(0..(len - 1) / 2) + 1
    }
}

fn carve(lattice: &mut Lattice, pos: Pos, delta: &mut Vec<CellDelta>) {
    delta.extend(lattice.mark(pos, CellState::Vacant));
}

/// Cell halfway between two cells on the same row or column, two apart.
fn between(a: Pos, b: Pos) -> Pos {
    Pos::new((a.row + b.row) / 2, (a.col + b.col) / 2)
}

/// In-bounds cells two steps away along one axis: up, down, left, right.
fn two_step_neighbours(lattice: &Lattice, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
    let Pos { row, col } = pos;
    [
        (row >= 2).then(|| Pos::new(row - 2, col)),
        (row + 2 < lattice.rows()).then(|| Pos::new(row + 2, col)),
        (col >= 2).then(|| Pos::new(row, col - 2)),
        (col + 2 < lattice.cols()).then(|| Pos::new(row, col + 2)),
    ]
    .into_iter()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generate(rows: usize, cols: usize, seed: u64) -> Lattice {
        let mut lattice = Lattice::new(rows, cols);
        let (mut carver, _) = MazeCarver::start(&mut lattice, seed);
        carver.run(&mut lattice);
        lattice
    }

    fn passages(lattice: &Lattice) -> Vec<Pos> {
        lattice
            .cells()
            .iter()
            .filter(|c| c.state() == CellState::Vacant)
            .map(|c| c.pos())
            .collect()
    }

    /// Passage count reachable from the first passage.
    fn flood(lattice: &Lattice) -> usize {
        let open = passages(lattice);
        let Some(&first) = open.first() else {
            return 0;
        };
        let mut seen = vec![false; lattice.len()];
        let mut stack = vec![first];
        seen[lattice.idx(first)] = true;
        let mut count = 0;
        while let Some(pos) = stack.pop() {
            count += 1;
            for next in lattice.neighbours(pos) {
                let idx = lattice.idx(next);
                if !seen[idx] && lattice.state(next) == CellState::Vacant {
                    seen[idx] = true;
                    stack.push(next);
                }
            }
        }
        count
    }

    /// Undirected 4-adjacency edges between passages.
    fn edges(lattice: &Lattice) -> usize {
        passages(lattice)
            .into_iter()
            .map(|pos| {
                lattice
                    .neighbours(pos)
                    .filter(|&n| n > pos && lattice.state(n) == CellState::Vacant)
                    .count()
            })
            .sum()
    }

    fn assert_perfect(lattice: &Lattice) {
        let count = passages(lattice).len();
        assert!(count > 0);
        assert_eq!(flood(lattice), count, "maze is disconnected");
        assert_eq!(edges(lattice), count - 1, "maze has a cycle");
    }

    #[test]
    fn test_start_fills_and_opens_one_cell() {
        let mut lattice = Lattice::new(7, 9);
        lattice.set_state(Pos::new(0, 0), CellState::Origin).unwrap();
        let (carver, delta) = MazeCarver::start(&mut lattice, 3);

        assert_eq!(lattice.count(CellState::Vacant), 1);
        assert!(lattice.origin().is_none());
        assert_eq!(carver.carved(), 1);
        // Every cell is filled, then the start cell is reopened
        assert_eq!(delta.len(), 64);
        assert_eq!(delta.last().map(|d| d.state), Some(CellState::Vacant));

        let start = passages(&lattice)[0];
        assert!(start.row % 2 == 1 && start.col % 2 == 1);
        assert!(start.row < 6 && start.col < 8);
    }

    #[test]
    fn test_step_carves_two_cells() {
        let mut lattice = Lattice::new(9, 9);
        let (mut carver, _) = MazeCarver::start(&mut lattice, 11);
        let tick = carver.step(&mut lattice);

        assert!(!tick.is_finished());
        assert_eq!(tick.delta.len(), 2);
        assert!(tick.delta.iter().all(|d| d.state == CellState::Vacant));
        assert_eq!(lattice.count(CellState::Vacant), 3);
    }

    #[test]
    fn test_maze_is_perfect() {
        let lattice = generate(21, 31, 7);
        assert_perfect(&lattice);
        // Every odd/odd cell is part of the maze
        assert_eq!(lattice.count(CellState::Vacant), 10 * 15 + (10 * 15 - 1));
        for pos in passages(&lattice) {
            assert!(pos.row % 2 == 1 || pos.col % 2 == 1);
        }
    }

    #[test]
    fn test_maze_is_reproducible() {
        let a = generate(15, 15, 99);
        let b = generate(15, 15, 99);
        let c = generate(15, 15, 100);
        assert_eq!(a.snapshot(), b.snapshot());
        assert_ne!(a.snapshot(), c.snapshot());
    }

    #[test]
    fn test_tiny_lattices() {
        let lattice = generate(1, 1, 0);
        assert_eq!(lattice.count(CellState::Vacant), 1);

        let lattice = generate(2, 5, 0);
        assert_perfect(&lattice);
    }

    #[test]
    fn test_finished_outcome() {
        let mut lattice = Lattice::new(5, 5);
        let (mut carver, _) = MazeCarver::start(&mut lattice, 5);
        let outcome = carver.run(&mut lattice);
        assert_eq!(outcome, Outcome::MazeCarved { passages: 7 });
        assert_eq!(carver.carved(), 4);
    }

    proptest! {
        #[test]
        fn prop_maze_is_tree(rows in 1usize..24, cols in 1usize..24, seed in any::<u64>()) {
            let lattice = generate(rows, cols, seed);
            let count = passages(&lattice).len();
            prop_assert!(count > 0);
            prop_assert_eq!(flood(&lattice), count);
            prop_assert_eq!(edges(&lattice), count - 1);
        }
    }
}
