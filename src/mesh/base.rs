//! Solid base extrusion.

use std::collections::HashMap;

use thiserror::Error;

use super::Mesh;

/// Errors that can occur while extruding a solid base.
#[derive(Error, Debug, PartialEq)]
pub enum BaseError {
    #[error("Mesh has no triangles")]
    EmptyMesh,
    #[error("Boundary is not a closed loop at vertex {0}")]
    OpenBoundary(u32),
    #[error("Boundary edge {0}-{1} does not lie on the rectangular footprint")]
    BoundaryOffFootprint(u32, u32),
}

impl Mesh {
    /// Turns the top surface into a closed solid standing on `z = -height * z_scale`.
    ///
    /// Every vertex gets a counterpart on the base plane. Each boundary edge
    /// gains one vertical wall quad (two triangles), and the bottom cap reuses
    /// the top triangulation with reversed winding. The boundary must form
    /// closed loops along the rectangular footprint of the mesh.
    pub fn add_base(&mut self, height: f32, z_scale: f32) -> Result<(), BaseError> {
        if self.triangles.is_empty() {
            return Err(BaseError::EmptyMesh);
        }
        let base_z = -height * z_scale;
        let boundary = self.boundary_edges();
        self.check_perimeter(&boundary)?;

        let n = self.positions.len() as u32;
        let base: Vec<_> = self
            .positions
            .iter()
            .map(|p| p.truncate().extend(base_z))
            .collect();
        self.positions.extend(base);
        if !self.uvs.is_empty() {
            self.uvs.extend_from_within(..);
        }

        let top = self.triangles.len();
        self.triangles.reserve(top + boundary.len() * 2);
        for &(a, b) in &boundary {
            self.triangles.push([a, a + n, b + n]);
            self.triangles.push([a, b + n, b]);
        }
        for i in 0..top {
            let [a, b, c] = self.triangles[i];
            self.triangles.push([a + n, c + n, b + n]);
        }
        Ok(())
    }

    /// Checks that the boundary is made of closed loops lying on the edges
    /// of the mesh's bounding rectangle.
    fn check_perimeter(&self, boundary: &[(u32, u32)]) -> Result<(), BaseError> {
        let (mut min, mut max) = (self.positions[0].truncate(), self.positions[0].truncate());
        for p in &self.positions {
            min = min.min(p.truncate());
            max = max.max(p.truncate());
        }
        let eps = (max - min).max_element() * 1e-6;
        let near = |a: f32, b: f32| (a - b).abs() <= eps;

        let mut degree: HashMap<u32, (u32, u32)> = HashMap::new();
        for &(a, b) in boundary {
            let pa = self.positions[a as usize];
            let pb = self.positions[b as usize];
            let on_side = (near(pa.x, min.x) && near(pb.x, min.x))
                || (near(pa.x, max.x) && near(pb.x, max.x))
                || (near(pa.y, min.y) && near(pb.y, min.y))
                || (near(pa.y, max.y) && near(pb.y, max.y));
            if !on_side {
                return Err(BaseError::BoundaryOffFootprint(a, b));
            }
            degree.entry(a).or_default().0 += 1;
            degree.entry(b).or_default().1 += 1;
        }

        let mut open: Vec<u32> = degree
            .iter()
            .filter(|(_, &(out, inc))| out != 1 || inc != 1)
            .map(|(&v, _)| v)
            .collect();
        open.sort_unstable();
        match open.first() {
            Some(&v) => Err(BaseError::OpenBoundary(v)),
            None => Ok(()),
        }
    }
}
