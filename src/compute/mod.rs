//! Compute module - Lattice state and the algorithms that animate it.

mod cell;
mod driver;
mod lattice;
mod life;
mod maze;
mod search;

pub use cell::*;
pub use driver::*;
pub use lattice::*;
pub use life::*;
pub use maze::*;
pub use search::*;
