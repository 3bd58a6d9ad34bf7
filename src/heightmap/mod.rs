//! Heightmap module.
//!
//! Provides the `ElevationGrid` raster and the preprocessing filters that
//! prepare it for triangulation and shading.

mod grid;
mod filters;

pub use grid::{ElevationGrid, LoadError};
