//! Conversion configuration.
//!
//! One flat struct holds every knob the converter exposes, with the same
//! defaults the command line uses. `validate` checks it before any work is done.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::MeshFormat;
use crate::shading::HillshadeOptions;
use crate::triangulation::TriangulationLimits;

/// Errors found while validating a [`ConvertConfig`].
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter --{0}")]
    MissingParameter(&'static str),
    #[error("Invalid value {value} for --{name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error(
        "Could not deduce mesh format from {0:?}; the extension (case-insensitive) should be one of {}",
        MeshFormat::SUPPORTED
    )]
    UnknownMeshFormat(String),
    #[error("No output requested: give a mesh output path, --normal-map or --shade-path")]
    NoOutput,
}

/// Physical size of the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSize {
    pub x: f32,
    pub y: f32,
    pub z_scale: f32,
}

/// Everything needed for one heightmap conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Heightmap image to read.
    pub input: PathBuf,
    /// Mesh output (`.stl` or `.obj`).
    pub mesh_output: Option<PathBuf>,
    /// Normal map PNG output.
    pub normal_map_output: Option<PathBuf>,
    /// Hillshade PNG output.
    pub hillshade_output: Option<PathBuf>,

    /// Mesh size along X in output units.
    pub x_size: Option<f32>,
    /// Mesh size along Y in output units.
    pub y_size: Option<f32>,
    /// Elevation multiplier, relative to X and Y.
    pub z_scale: Option<f32>,

    /// Maximum triangulation error.
    pub max_error: f32,
    /// Maximum number of triangles (0 = unbounded).
    pub max_triangles: usize,
    /// Maximum number of vertices (0 = unbounded).
    pub max_points: usize,
    /// Solid base height below elevation zero (0 = no base).
    pub base_height: f32,

    pub auto_level: bool,
    pub invert: bool,
    /// Gaussian blur sigma in pixels (0 = off).
    pub blur_sigma: f32,
    /// Gamma exponent (0 = off).
    pub gamma: f32,
    /// Border width in pixels (0 = off).
    pub border_size: u32,
    /// Elevation of the border ring.
    pub border_height: f32,

    /// Hillshade light altitude, degrees.
    pub shade_altitude: f32,
    /// Hillshade light azimuth, degrees clockwise from north.
    pub shade_azimuth: f32,

    /// Suppress progress output.
    pub quiet: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            mesh_output: None,
            normal_map_output: None,
            hillshade_output: None,
            x_size: None,
            y_size: None,
            z_scale: None,
            max_error: 0.001,
            max_triangles: 0,
            max_points: 0,
            base_height: 0.0,
            auto_level: false,
            invert: false,
            blur_sigma: 0.0,
            gamma: 0.0,
            border_size: 0,
            border_height: 1.0,
            shade_altitude: 45.0,
            shade_azimuth: 0.0,
            quiet: false,
        }
    }
}

impl ConvertConfig {
    /// Checks mandatory values, numeric ranges and output paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mesh_size()?;
        finite("error", self.max_error)?;
        if self.max_error < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "error",
                value: self.max_error,
                reason: "must not be negative",
            });
        }
        finite("base", self.base_height)?;
        finite("blur", self.blur_sigma)?;
        finite("gamma", self.gamma)?;
        finite("border-height", self.border_height)?;
        finite("shade-alt", self.shade_altitude)?;
        finite("shade-az", self.shade_azimuth)?;

        self.mesh_format()?;
        if self.mesh_output.is_none()
            && self.normal_map_output.is_none()
            && self.hillshade_output.is_none()
        {
            return Err(ConfigError::NoOutput);
        }
        Ok(())
    }

    /// The mandatory sizing parameters, each finite and positive.
    pub fn mesh_size(&self) -> Result<MeshSize, ConfigError> {
        Ok(MeshSize {
            x: positive("xsize", self.x_size)?,
            y: positive("ysize", self.y_size)?,
            z_scale: positive("zscale", self.z_scale)?,
        })
    }

    /// Format of the mesh output, if one was requested.
    pub fn mesh_format(&self) -> Result<Option<MeshFormat>, ConfigError> {
        match &self.mesh_output {
            None => Ok(None),
            Some(path) => MeshFormat::from_path(path)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownMeshFormat(path.display().to_string())),
        }
    }

    pub fn limits(&self) -> TriangulationLimits {
        TriangulationLimits {
            max_error: self.max_error,
            max_triangles: self.max_triangles,
            max_points: self.max_points,
        }
    }

    pub fn hillshade_options(&self, z_scale: f32) -> HillshadeOptions {
        HillshadeOptions {
            altitude_deg: self.shade_altitude,
            azimuth_deg: self.shade_azimuth,
            z_scale,
        }
    }
}

fn finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value, reason: "must be finite" })
    }
}

fn positive(name: &'static str, value: Option<f32>) -> Result<f32, ConfigError> {
    let value = finite(name, value.ok_or(ConfigError::MissingParameter(name))?)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value, reason: "must be positive" })
    }
}
