//! Binary STL writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Vec3;

use crate::mesh::Mesh;
use super::ExportError;

const HEADER_TAG: &[u8] = b"terramesh binary stl";

/// Unit normal of a counter-clockwise triangle, zero when degenerate.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Writes the mesh as binary STL to `path`.
pub fn write_stl(mesh: &Mesh, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_stl_to(mesh, &mut w)?;
    w.flush()?;
    Ok(())
}

/// Writes the mesh as binary STL.
///
/// Layout: 80-byte header, u32 triangle count, then per triangle the face
/// normal and three vertices as little-endian f32 and a zero u16 attribute.
pub fn write_stl_to<W: Write>(mesh: &Mesh, w: &mut W) -> Result<(), ExportError> {
    let mut header = [0u8; 80];
    header[..HEADER_TAG.len()].copy_from_slice(HEADER_TAG);
    w.write_all(&header)?;
    w.write_all(&(mesh.triangles.len() as u32).to_le_bytes())?;

    for &[a, b, c] in &mesh.triangles {
        let a = mesh.positions[a as usize];
        let b = mesh.positions[b as usize];
        let c = mesh.positions[c as usize];
        let n = face_normal(a, b, c);
        for v in [n, a, b, c] {
            for comp in v.to_array() {
                w.write_all(&comp.to_le_bytes())?;
            }
        }
        w.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
    }

    #[test]
    fn test_layout() {
        let mesh = Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(2.0, 0.0, 1.0),
                Vec3::new(0.0, 2.0, 1.0),
                Vec3::new(2.0, 2.0, 1.0),
            ],
            uvs: Vec::new(),
            triangles: vec![[0, 1, 2], [1, 3, 2]],
        };
        let mut bytes = Vec::new();
        write_stl_to(&mesh, &mut bytes).unwrap();

        assert_eq!(bytes.len(), 80 + 4 + 2 * 50);
        assert_eq!(&bytes[..HEADER_TAG.len()], HEADER_TAG);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 2);

        // First record: normal (0, 0, 1) then vertex 0.
        assert_eq!(read_f32(&bytes, 84), 0.0);
        assert_eq!(read_f32(&bytes, 88), 0.0);
        assert_eq!(read_f32(&bytes, 92), 1.0);
        assert_eq!(read_f32(&bytes, 96 + 8), 1.0);
        // Second record's second vertex is position 3.
        assert_eq!(read_f32(&bytes, 134 + 24), 2.0);
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
    }

    #[test]
    fn test_write_to_file() {
        let mesh = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: Vec::new(),
            triangles: vec![[0, 1, 2]],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        write_stl(&mesh, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 134);
    }
}
