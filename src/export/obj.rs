//! Wavefront OBJ writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::mesh::Mesh;
use super::ExportError;

/// Writes the mesh as Wavefront OBJ to `path`.
pub fn write_obj(mesh: &Mesh, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_obj_to(mesh, &mut w)?;
    w.flush()?;
    Ok(())
}

/// Writes `v` records, `vt` records when the mesh has UVs, then 1-based faces.
pub fn write_obj_to<W: Write>(mesh: &Mesh, w: &mut W) -> Result<(), ExportError> {
    let has_uvs = !mesh.uvs.is_empty();
    if has_uvs && mesh.uvs.len() != mesh.positions.len() {
        return Err(ExportError::LengthMismatch {
            uvs: mesh.uvs.len(),
            vertices: mesh.positions.len(),
        });
    }

    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in &mesh.uvs {
        writeln!(w, "vt {} {}", uv.x, uv.y)?;
    }
    for &[a, b, c] in &mesh.triangles {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        if has_uvs {
            writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}")?;
        } else {
            writeln!(w, "f {a} {b} {c}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn square() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.5),
                Vec3::new(1.0, 0.0, 0.5),
                Vec3::new(0.0, 1.0, 0.5),
                Vec3::new(1.0, 1.0, 0.5),
            ],
            uvs: Vec::new(),
            triangles: vec![[0, 1, 2], [1, 3, 2]],
        }
    }

    #[test]
    fn test_without_uvs() {
        let mut out = Vec::new();
        write_obj_to(&square(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "v 0 0 0.5");
        assert_eq!(lines[4], "f 1 2 3");
        assert_eq!(lines[5], "f 2 4 3");
        assert!(!text.contains("vt"));
    }

    #[test]
    fn test_with_uvs() {
        let mut mesh = square();
        mesh.uvs = mesh.positions.iter().map(|p| Vec2::new(p.x, p.y)).collect();
        let mut out = Vec::new();
        write_obj_to(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 4);
        assert!(text.contains("vt 1 1\n"));
        assert!(text.contains("f 2/2 4/4 3/3\n"));
    }

    #[test]
    fn test_uv_count_mismatch() {
        let mut mesh = square();
        mesh.uvs = vec![Vec2::ZERO];
        let mut out = Vec::new();
        assert!(matches!(
            write_obj_to(&mesh, &mut out),
            Err(ExportError::LengthMismatch { uvs: 1, vertices: 4 })
        ));
    }
}
