//! Mesh module.
//!
//! Holds the triangle mesh produced from a triangulation and the passes that
//! turn it into a physically sized, textured, optionally solid model.

mod base;

pub use base::BaseError;

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::triangulation::Triangulation;

/// Indexed triangle mesh with optional per-vertex UVs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Empty, or one entry per position.
    pub uvs: Vec<Vec2>,
    /// Counter-clockwise when seen from outside the surface.
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Copies the vertices and triangles out of a triangulation.
    pub fn from_triangulation(tri: &Triangulation, z_scale: f32) -> Self {
        Self {
            positions: tri.points(z_scale),
            uvs: Vec::new(),
            triangles: tri.triangles(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Scales the grid-unit footprint to `x_size x y_size`. Z is untouched.
    ///
    /// The footprint of a `W x H` grid spans `W - 1` by `H - 1` pixel steps.
    pub fn rescale(&mut self, grid_size: (u32, u32), x_size: f32, y_size: f32) {
        let span_x = grid_size.0.saturating_sub(1).max(1) as f32;
        let span_y = grid_size.1.saturating_sub(1).max(1) as f32;
        let factor = Vec3::new(x_size / span_x, y_size / span_y, 1.0);
        for p in &mut self.positions {
            *p *= factor;
        }
    }

    /// Sets `uv = (x, y) / (x_size, y_size)` for every vertex.
    pub fn generate_uvs(&mut self, x_size: f32, y_size: f32) {
        let scale = Vec2::new(1.0 / x_size, 1.0 / y_size);
        self.uvs = self
            .positions
            .iter()
            .map(|p| Vec2::new(p.x, p.y) * scale)
            .collect();
    }

    /// Directed edges that belong to exactly one triangle, in triangle order.
    ///
    /// Each edge keeps the direction it has in its triangle, so the mesh
    /// interior lies to its left when seen from above.
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let counts = self.edge_counts();
        self.triangles
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .filter(|&(a, b)| counts.get(&undirected(a, b)) == Some(&1))
            .collect()
    }

    /// True when every edge is shared by exactly two triangles.
    pub fn is_watertight(&self) -> bool {
        !self.triangles.is_empty() && self.edge_counts().values().all(|&c| c == 2)
    }

    fn edge_counts(&self) -> HashMap<(u32, u32), u32> {
        let mut edges: HashMap<(u32, u32), u32> = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                *edges.entry(undirected(p, q)).or_insert(0) += 1;
            }
        }
        edges
    }
}

fn undirected(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}
