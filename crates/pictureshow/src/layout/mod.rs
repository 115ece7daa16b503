//! Layout calculation modules
//!
//! This module handles the geometry of a page:
//! - Grid layout (cell dimensions and positions)
//! - Picture placement within a cell (fit, stretch, fill)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
