//! Lattice Viz - Pathfinding, maze generation and Game of Life on an editable grid.
//!
//! This crate provides the headless core of a grid visualizer. Every
//! algorithm runs as a resumable operation that reports the cells it changed
//! on each step, so any renderer can animate it at its own pace.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, layouts and cell state types
//! - `compute`: Lattice storage, search, maze carving, Game of Life and the driver
//!
//! # Example
//!
//! ```rust,no_run
//! use lattice_viz::{
//!     schema::{Algorithm, LatticeConfig, Layout},
//!     compute::Visualizer,
//! };
//!
//! // Create a 20x20 lattice
//! let config = LatticeConfig::with_cells(20, 20);
//! let mut vis = Visualizer::new(config).unwrap();
//!
//! // Seed it with random walls and endpoints
//! vis.apply_layout(&Layout::default()).unwrap();
//!
//! // Animate a search, one visited cell per step
//! vis.start_search(Algorithm::AStar).unwrap();
//! while let Some(tick) = vis.step() {
//!     for change in &tick.delta {
//!         println!("{:?} -> {:?}", change.pos, change.state);
//!     }
//! }
//!
//! println!("{}", vis.lattice());
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{CellDelta, Lattice, LatticeError, Outcome, Pos, Tick, Visualizer};
pub use schema::{Algorithm, CellState, DrawMode, LatticeConfig, Layout, Pattern};
