//! Schema module - Configuration, layout and state types for the lattice.

mod config;
mod layout;
mod state;

pub use config::*;
pub use layout::*;
pub use state::*;
