//! Heightmap to triangle mesh conversion.
//!
//! This crate turns a single-channel elevation raster into a simplified
//! Delaunay mesh that stays within a chosen vertical error, and derives
//! normal map and hillshade rasters from the same grid.

pub mod heightmap;
pub mod pipeline;
pub mod triangulation;
pub mod shading;
pub mod mesh;
pub mod export;
pub mod config;

pub use heightmap::{ElevationGrid, LoadError};
pub use pipeline::{PreprocessStage, Pipeline, PipelineError};
pub use triangulation::{triangulate, StopReason, Triangulation, TriangulationLimits, Triangulator};
pub use shading::HillshadeOptions;
pub use mesh::Mesh;
pub use export::{ExportError, MeshFormat};
pub use config::{ConfigError, ConvertConfig};
