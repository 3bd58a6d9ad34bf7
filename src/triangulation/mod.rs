//! Adaptive triangulation module.
//!
//! Converts an elevation grid into a reduced Delaunay triangulation whose
//! surface stays within a vertical error bound of the grid.

pub mod predicates;
mod candidate;
mod queue;
mod triangulator;

pub use candidate::{find_candidate, Candidate};
pub use triangulator::{
    triangulate, StopReason, Triangulation, TriangulationError, TriangulationLimits,
    Triangulator, Vertex,
};
