//! Uniform-grid broad phase for camera collision and visibility candidates.
//!
//! The grid has a fixed extent centred on the world origin. It is cleared and
//! repopulated from object positions and radii every frame; nothing about an
//! object's cell membership survives between rebuilds.

mod grid;

pub use grid::{CellKey, SpatialGrid};
