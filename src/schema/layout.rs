//! Layout types for seeding a lattice before a run.

use serde::{Deserialize, Serialize};

/// Complete layout specification: wall pattern plus optional endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Wall pattern applied to a cleared lattice.
    pub pattern: Pattern,
    /// Origin as `(row, col)`.
    #[serde(default)]
    pub origin: Option<(usize, usize)>,
    /// Goal as `(row, col)`.
    #[serde(default)]
    pub goal: Option<(usize, usize)>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::sized(20, 20)
    }
}

/// Predefined wall patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// All cells vacant.
    Empty,
    /// Independent walls with probability `density`.
    Random {
        /// Wall probability (0.0-1.0).
        density: f64,
    },
    /// Perfect maze carved from a filled lattice.
    Maze,
    /// Explicit wall cells.
    Walls {
        /// List of `(row, col)` wall positions.
        cells: Vec<(usize, usize)>,
    },
}

impl Layout {
    /// Random walls with endpoints one cell in from opposite corners of a
    /// `rows` x `cols` lattice, clamped for lattices too small for that.
    pub fn sized(rows: usize, cols: usize) -> Self {
        let last = (rows.saturating_sub(1), cols.saturating_sub(1));
        Self {
            pattern: Pattern::Random { density: 0.25 },
            origin: Some((1.min(last.0), 1.min(last.1))),
            goal: Some((rows.saturating_sub(2), cols.saturating_sub(2))),
        }
    }

    /// Empty lattice with the given endpoints.
    pub fn open(origin: (usize, usize), goal: (usize, usize)) -> Self {
        Self {
            pattern: Pattern::Empty,
            origin: Some(origin),
            goal: Some(goal),
        }
    }

    /// Explicit walls with the given endpoints.
    pub fn walled(cells: Vec<(usize, usize)>, origin: (usize, usize), goal: (usize, usize)) -> Self {
        Self {
            pattern: Pattern::Walls { cells },
            origin: Some(origin),
            goal: Some(goal),
        }
    }

    /// Parse a layout from rows of glyphs: `#` wall, `O` origin, `G` goal,
    /// anything else vacant. Returns the layout and its `(rows, cols)`.
    pub fn from_ascii(text: &str) -> (Self, (usize, usize)) {
        let mut cells = Vec::new();
        let mut origin = None;
        let mut goal = None;
        let mut rows = 0;
        let mut cols = 0;

        for (r, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            rows = r + 1;
            cols = cols.max(line.chars().count());
            for (c, ch) in line.chars().enumerate() {
                match ch {
                    '#' => cells.push((r, c)),
                    'O' => origin = Some((r, c)),
                    'G' => goal = Some((r, c)),
                    _ => {}
                }
            }
        }

        let layout = Self {
            pattern: Pattern::Walls { cells },
            origin,
            goal,
        };
        (layout, (rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii() {
        let (layout, dim) = Layout::from_ascii(
            "
            O.#
            .##
            ..G
            ",
        );

        assert_eq!(dim, (3, 3));
        assert_eq!(layout.origin, Some((0, 0)));
        assert_eq!(layout.goal, Some((2, 2)));
        assert_eq!(
            layout.pattern,
            Pattern::Walls {
                cells: vec![(0, 2), (1, 1), (1, 2)]
            }
        );
    }

    #[test]
    fn test_sized_endpoints_fit_lattice() {
        let layout = Layout::sized(20, 20);
        assert_eq!(layout.origin, Some((1, 1)));
        assert_eq!(layout.goal, Some((18, 18)));
        assert_eq!(Layout::default().goal, layout.goal);

        let small = Layout::sized(5, 8);
        assert_eq!(small.origin, Some((1, 1)));
        assert_eq!(small.goal, Some((3, 6)));

        let tiny = Layout::sized(1, 2);
        assert_eq!(tiny.origin, Some((0, 1)));
        assert_eq!(tiny.goal, Some((0, 0)));
    }

    #[test]
    fn test_pattern_json_tagging() {
        let layout = Layout {
            pattern: Pattern::Maze,
            origin: None,
            goal: Some((3, 4)),
        };
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains(r#""type":"Maze""#));

        let parsed: Layout = serde_json::from_str(r#"{ "pattern": { "type": "Empty" } }"#).unwrap();
        assert_eq!(parsed.pattern, Pattern::Empty);
        assert!(parsed.origin.is_none());
        assert!(parsed.goal.is_none());
    }
}
