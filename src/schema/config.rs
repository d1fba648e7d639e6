//! Configuration types for lattice construction and automaton runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DrawMode;

/// Default wall density used by `randomize` when none is given.
fn default_density() -> f64 {
    0.3
}

fn default_halt_on_repeat() -> bool {
    true
}

/// Top-level lattice configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Lattice extents, either in cells or derived from a screen size.
    pub dimensions: Dimensions,
    /// Initial draw mode.
    #[serde(default)]
    pub draw_mode: DrawMode,
    /// Wall probability for random layouts (0.0-1.0).
    #[serde(default = "default_density")]
    pub density: f64,
    /// Seed for maze generation and random walls. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Game of Life parameters.
    #[serde(default)]
    pub life: LifeConfig,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::Screen {
                width: 800,
                height: 800,
                cell_size: 20,
            },
            draw_mode: DrawMode::SetWall,
            density: default_density(),
            random_seed: None,
            life: LifeConfig::default(),
        }
    }
}

/// Lattice extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Dimensions {
    /// Explicit row and column counts.
    Cells { rows: usize, cols: usize },
    /// Screen size in pixels divided into square cells of `cell_size` pixels.
    Screen {
        width: usize,
        height: usize,
        cell_size: usize,
    },
}

impl Dimensions {
    /// Resolve to `(rows, cols)`. Partial cells at the screen edge are dropped.
    pub fn resolve(&self) -> (usize, usize) {
        match *self {
            Dimensions::Cells { rows, cols } => (rows, cols),
            Dimensions::Screen {
                width,
                height,
                cell_size,
            } => {
                if cell_size == 0 {
                    (0, 0)
                } else {
                    (height / cell_size, width / cell_size)
                }
            }
        }
    }
}

/// Game of Life run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Finish once a generation repeats the previous generation's changes.
    #[serde(default = "default_halt_on_repeat")]
    pub halt_on_repeat: bool,
    /// Hard cap on generations per run (`None` = unbounded).
    #[serde(default)]
    pub max_generations: Option<u64>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            halt_on_repeat: true,
            max_generations: None,
        }
    }
}

impl LatticeConfig {
    /// Config with explicit cell counts and defaults elsewhere.
    pub fn with_cells(rows: usize, cols: usize) -> Self {
        Self {
            dimensions: Dimensions::Cells { rows, cols },
            ..Self::default()
        }
    }

    /// Resolved `(rows, cols)`.
    #[inline]
    pub fn grid_dim(&self) -> (usize, usize) {
        self.dimensions.resolve()
    }

    /// Total number of cells.
    #[inline]
    pub fn grid_size(&self) -> usize {
        let (rows, cols) = self.grid_dim();
        rows * cols
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Dimensions::Screen { cell_size: 0, .. } = self.dimensions {
            return Err(ConfigError::InvalidCellSize);
        }
        let (rows, cols) = self.grid_dim();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::InvalidDensity(self.density));
        }
        Ok(())
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: LatticeConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Lattice dimensions (rows, cols) must be non-zero")]
    InvalidDimensions,
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Density must lie in [0, 1], got {0}")]
    InvalidDensity(f64),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_screen_dimensions_resolve() {
        let dims = Dimensions::Screen {
            width: 500,
            height: 300,
            cell_size: 20,
        };
        assert_eq!(dims.resolve(), (15, 25));

        let config = LatticeConfig::default();
        assert_eq!(config.grid_dim(), (40, 40));
        assert_eq!(config.grid_size(), 1600);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = LatticeConfig::with_cells(0, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));

        config.dimensions = Dimensions::Screen {
            width: 100,
            height: 100,
            cell_size: 0,
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCellSize)));

        // Cell bigger than the screen leaves no whole cells
        config.dimensions = Dimensions::Screen {
            width: 10,
            height: 10,
            cell_size: 20,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));

        let mut config = LatticeConfig::with_cells(4, 4);
        config.density = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDensity(_))
        ));
        config.density = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "dimensions": { "type": "Cells", "rows": 12, "cols": 7 } }"#;
        let config: LatticeConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.grid_dim(), (12, 7));
        assert_eq!(config.draw_mode, DrawMode::SetWall);
        assert_eq!(config.density, 0.3);
        assert!(config.random_seed.is_none());
        assert!(config.life.halt_on_repeat);
        assert!(config.life.max_generations.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = LatticeConfig {
            random_seed: Some(7),
            ..LatticeConfig::with_cells(9, 11)
        };
        write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = LatticeConfig::load(file.path()).unwrap();
        assert_eq!(loaded.grid_dim(), (9, 11));
        assert_eq!(loaded.random_seed, Some(7));
    }

    #[test]
    fn test_load_reports_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            LatticeConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));

        let missing = file.path().with_extension("missing");
        assert!(matches!(LatticeConfig::load(missing), Err(ConfigError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "dimensions": {{ "type": "Cells", "rows": 0, "cols": 3 }} }}"#
        )
        .unwrap();
        assert!(matches!(
            LatticeConfig::load(file.path()),
            Err(ConfigError::InvalidDimensions)
        ));
    }
}
