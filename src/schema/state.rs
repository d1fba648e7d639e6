//! Cell states, draw modes and algorithm selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// State of a single lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Open, traversable cell. Dead in Game of Life.
    #[default]
    Vacant,
    /// Blocked cell. Alive in Game of Life.
    Wall,
    /// Start of a search.
    Origin,
    /// Target of a search.
    Goal,
    /// Traversed by a search but not on the final path.
    Visited,
    /// On the reconstructed path between origin and goal.
    Path,
}

impl CellState {
    /// Single character used for ASCII snapshots.
    pub fn glyph(self) -> char {
        match self {
            CellState::Vacant => '.',
            CellState::Wall => '#',
            CellState::Origin => 'O',
            CellState::Goal => 'G',
            CellState::Visited => '+',
            CellState::Path => '*',
        }
    }

    /// Whether a search may step onto a cell in this state.
    #[inline]
    pub fn is_traversable(self) -> bool {
        !matches!(self, CellState::Wall | CellState::Visited | CellState::Origin)
    }
}

/// What a user click assigns to the clicked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    SetWall,
    SetVacant,
    SetOrigin,
    SetGoal,
}

impl DrawMode {
    /// State painted by this mode.
    pub fn target_state(self) -> CellState {
        match self {
            DrawMode::SetWall => CellState::Wall,
            DrawMode::SetVacant => CellState::Vacant,
            DrawMode::SetOrigin => CellState::Origin,
            DrawMode::SetGoal => CellState::Goal,
        }
    }
}

impl FromStr for DrawMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wall" | "setwall" => Ok(DrawMode::SetWall),
            "vacant" | "setvacant" | "erase" => Ok(DrawMode::SetVacant),
            "origin" | "setorigin" => Ok(DrawMode::SetOrigin),
            "goal" | "setgoal" => Ok(DrawMode::SetGoal),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Pathfinding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Dfs,
    Bfs,
    Dijkstra,
    AStar,
}

impl Algorithm {
    /// All strategies, in menu order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
    ];

    /// Whether the strategy always yields a shortest path on uniform edges.
    pub fn is_shortest_path(self) -> bool {
        !matches!(self, Algorithm::Dfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', '*'], "").as_str() {
            "dfs" => Ok(Algorithm::Dfs),
            "bfs" => Ok(Algorithm::Bfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" | "a" => Ok(Algorithm::AStar),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Unrecognized name passed to a `FromStr` impl.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown name: {0}")]
pub struct UnknownName(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("dfs".parse::<Algorithm>(), Ok(Algorithm::Dfs));
        assert_eq!("BFS".parse::<Algorithm>(), Ok(Algorithm::Bfs));
        assert_eq!("a-star".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert_eq!("a*".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert!("greedy".parse::<Algorithm>().is_err());

        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn test_traversable_states() {
        assert!(CellState::Vacant.is_traversable());
        assert!(CellState::Goal.is_traversable());
        assert!(CellState::Path.is_traversable());
        assert!(!CellState::Wall.is_traversable());
        assert!(!CellState::Visited.is_traversable());
        assert!(!CellState::Origin.is_traversable());
    }

    #[test]
    fn test_draw_mode_targets() {
        assert_eq!(DrawMode::default().target_state(), CellState::Wall);
        assert_eq!("goal".parse::<DrawMode>().map(DrawMode::target_state), Ok(CellState::Goal));
    }
}
