//! Export module for writing meshes and shading rasters to disk.
//!
//! Meshes go out as binary STL or Wavefront OBJ, chosen from the output
//! file extension. Shading rasters are written as 8-bit PNG.

mod png;
mod stl;
mod obj;

pub use png::{write_gray_png, write_rgb_png};
pub use stl::{face_normal, write_stl, write_stl_to};
pub use obj::{write_obj, write_obj_to};

use std::path::Path;

use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while writing output files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("UV count {uvs} does not match vertex count {vertices}")]
    LengthMismatch { uvs: usize, vertices: usize },
}

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
}

impl MeshFormat {
    pub const SUPPORTED: &'static str = ".stl, .obj";

    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Stl => "STL",
            Self::Obj => "OBJ",
        }
    }
}

/// Writes `mesh` to `path` in the given format.
pub fn write_mesh(mesh: &Mesh, path: &Path, format: MeshFormat) -> Result<(), ExportError> {
    match format {
        MeshFormat::Stl => write_stl(mesh, path),
        MeshFormat::Obj => write_obj(mesh, path),
    }
}
