//! Conway's Game of Life over the lattice.
//!
//! Walls are live cells and vacant cells are dead. Each generation is a pure
//! function of the previous one: the whole batch of changes is computed from a
//! snapshot before any cell is written.

use super::{CellDelta, Lattice, Outcome, Pos, Tick};
use crate::schema::{CellState, LifeConfig};

/// Resumable Game of Life run.
#[derive(Debug, Clone)]
pub struct LifeAutomaton {
    /// Bounded 8-neighbourhood of every cell, as flat indices.
    neighbourhoods: Vec<Vec<usize>>,
    /// Flat indices changed by the previous generation.
    previous: Option<Vec<usize>>,
    generation: u64,
    config: LifeConfig,
    outcome: Option<Outcome>,
}

impl LifeAutomaton {
    /// Normalize `lattice` to walls and vacant cells and precompute
    /// neighbourhoods.
    ///
    /// Origin, goal, visited and path cells become vacant; the returned delta
    /// lists them.
    pub fn start(lattice: &mut Lattice, config: LifeConfig) -> (Self, Vec<CellDelta>) {
        let delta = lattice.clear_states(&[
            CellState::Visited,
            CellState::Path,
            CellState::Origin,
            CellState::Goal,
        ]);
        lattice.forget_search();

        let neighbourhoods = (0..lattice.len())
            .map(|idx| {
                lattice
                    .surrounding(lattice.pos_of(idx))
                    .into_iter()
                    .map(|pos| lattice.idx(pos))
                    .collect()
            })
            .collect();

        log::debug!(
            "Starting Game of Life with {} live cells",
            lattice.count(CellState::Wall)
        );

        let automaton = Self {
            neighbourhoods,
            previous: None,
            generation: 0,
            config,
            outcome: None,
        };
        (automaton, delta)
    }

    /// Generations computed so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next state for every cell that changes, computed from `states` alone.
    fn next_batch(&self, states: &[CellState]) -> Vec<(usize, CellState)> {
        states
            .iter()
            .enumerate()
            .filter_map(|(idx, &state)| {
                let alive = state == CellState::Wall;
                let live_neighbours = self.neighbourhoods[idx]
                    .iter()
                    .filter(|&&n| states[n] == CellState::Wall)
                    .count();

                match (alive, live_neighbours) {
                    (true, 2 | 3) => None,
                    (true, _) => Some((idx, CellState::Vacant)),
                    (false, 3) => Some((idx, CellState::Wall)),
                    _ => None,
                }
            })
            .collect()
    }

    /// Compute and apply one generation.
    pub fn step(&mut self, lattice: &mut Lattice) -> Tick {
        if let Some(outcome) = &self.outcome {
            return Tick::finished(Vec::new(), outcome.clone());
        }

        let batch = self.next_batch(&lattice.snapshot());
        let delta: Vec<CellDelta> = batch
            .iter()
            .filter_map(|&(idx, state)| {
                let pos: Pos = lattice.pos_of(idx);
                lattice.mark(pos, state)
            })
            .collect();
        self.generation += 1;

        let changed: Vec<usize> = batch.into_iter().map(|(idx, _)| idx).collect();
        log::trace!("Generation {}: {} cells changed", self.generation, changed.len());

        let repeated = changed.is_empty() || self.previous.as_ref() == Some(&changed);
        let outcome = if self.config.halt_on_repeat && repeated {
            Some(Outcome::Settled {
                generation: self.generation,
            })
        } else if self
            .config
            .max_generations
            .is_some_and(|max| self.generation >= max)
        {
            Some(Outcome::Halted {
                generation: self.generation,
            })
        } else {
            None
        };
        self.previous = Some(changed);

        match outcome {
            Some(outcome) => {
                log::debug!("Game of Life finished: {outcome:?}");
                self.outcome = Some(outcome.clone());
                Tick::finished(delta, outcome)
            }
            None => Tick::running(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Layout;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn lattice_from(ascii: &str) -> Lattice {
        let (layout, (rows, cols)) = Layout::from_ascii(ascii);
        let mut lattice = Lattice::new(rows, cols);
        lattice
            .apply_layout(&layout, &mut StdRng::seed_from_u64(0))
            .unwrap();
        lattice
    }

    fn unbounded() -> LifeConfig {
        LifeConfig {
            halt_on_repeat: false,
            max_generations: None,
        }
    }

    #[test]
    fn test_empty_lattice_stays_empty() {
        let mut lattice = Lattice::new(6, 6);
        let (mut life, delta) = LifeAutomaton::start(&mut lattice, unbounded());
        assert!(delta.is_empty());

        for _ in 0..20 {
            let tick = life.step(&mut lattice);
            assert!(tick.delta.is_empty());
            assert!(!tick.is_finished());
        }
        assert_eq!(lattice.count(CellState::Vacant), 36);
        assert_eq!(life.generation(), 20);
    }

    #[test]
    fn test_empty_lattice_settles_immediately() {
        let mut lattice = Lattice::new(4, 4);
        let (mut life, _) = LifeAutomaton::start(&mut lattice, LifeConfig::default());
        let tick = life.step(&mut lattice);
        assert_eq!(tick.into_outcome(), Some(Outcome::Settled { generation: 1 }));
    }

    #[test]
    fn test_start_normalizes_search_states() {
        let mut lattice = lattice_from(
            "
            O.#
            .#.
            ..G
            ",
        );
        lattice.mark(Pos::new(0, 1), CellState::Visited);
        lattice.mark(Pos::new(1, 0), CellState::Path);

        let (_, delta) = LifeAutomaton::start(&mut lattice, LifeConfig::default());
        assert_eq!(delta.len(), 4);
        assert!(lattice.origin().is_none());
        assert!(lattice.goal().is_none());
        assert_eq!(lattice.to_string(), "..#\n.#.\n...\n");
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut lattice = lattice_from(
            "
            .....
            .....
            .###.
            .....
            .....
            ",
        );
        let (mut life, _) = LifeAutomaton::start(&mut lattice, unbounded());

        let tick = life.step(&mut lattice);
        assert_eq!(tick.delta.len(), 4);
        assert_eq!(lattice.to_string(), ".....\n..#..\n..#..\n..#..\n.....\n");

        life.step(&mut lattice);
        assert_eq!(lattice.to_string(), ".....\n.....\n.###.\n.....\n.....\n");
    }

    #[test]
    fn test_blinker_settles_when_halting() {
        let mut lattice = lattice_from(
            "
            .....
            .###.
            .....
            ",
        );
        let (mut life, _) = LifeAutomaton::start(&mut lattice, LifeConfig::default());
        assert!(!life.step(&mut lattice).is_finished());
        let tick = life.step(&mut lattice);
        assert_eq!(tick.delta.len(), 4);
        assert_eq!(tick.into_outcome(), Some(Outcome::Settled { generation: 2 }));
    }

    #[test]
    fn test_block_is_still_life() {
        let mut lattice = lattice_from(
            "
            ....
            .##.
            .##.
            ....
            ",
        );
        let before = lattice.snapshot();
        let (mut life, _) = LifeAutomaton::start(&mut lattice, LifeConfig::default());
        let tick = life.step(&mut lattice);

        assert!(tick.delta.is_empty());
        assert!(tick.is_finished());
        assert_eq!(lattice.snapshot(), before);
    }

    #[test]
    fn test_generation_is_computed_from_snapshot() {
        // A corner L: the missing corner is born and nothing dies, which only
        // holds if births do not feed back into the same generation.
        let mut lattice = lattice_from(
            "
            ##.
            #..
            ...
            ",
        );
        let (mut life, _) = LifeAutomaton::start(&mut lattice, unbounded());
        let tick = life.step(&mut lattice);
        assert_eq!(
            tick.delta,
            vec![CellDelta {
                pos: Pos::new(1, 1),
                state: CellState::Wall
            }]
        );
    }

    #[test]
    fn test_max_generations() {
        let mut lattice = lattice_from(
            "
            .#......
            ..#.....
            ###.....
            ........
            ........
            ........
            ",
        );
        let config = LifeConfig {
            halt_on_repeat: false,
            max_generations: Some(4),
        };
        let (mut life, _) = LifeAutomaton::start(&mut lattice, config);
        for _ in 0..3 {
            assert!(!life.step(&mut lattice).is_finished());
        }
        let tick = life.step(&mut lattice);
        assert_eq!(tick.into_outcome(), Some(Outcome::Halted { generation: 4 }));

        // A glider keeps its five cells after a full period
        assert_eq!(lattice.count(CellState::Wall), 5);

        let again = life.step(&mut lattice);
        assert!(again.delta.is_empty());
        assert_eq!(life.generation(), 4);
    }
}
