//! Terramesh CLI - heightmap to triangle mesh converter.
//!
//! Reads a heightmap image, preprocesses it, and writes an error-bounded
//! Delaunay mesh as STL or OBJ, plus optional normal map and hillshade PNGs.

use clap::Parser;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use terramesh::config::{ConvertConfig, MeshSize};
use terramesh::export::{write_gray_png, write_mesh, write_rgb_png};
use terramesh::heightmap::ElevationGrid;
use terramesh::mesh::Mesh;
use terramesh::pipeline::Pipeline;
use terramesh::shading::{hillshade, normal_map};
use terramesh::triangulation::Triangulator;

/// Converts heightmaps to error-bounded triangle meshes.
#[derive(Parser)]
#[command(name = "terramesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input heightmap image.
    infile: PathBuf,

    /// Output mesh (.stl or .obj).
    outfile: Option<PathBuf>,

    /// Requested size of the mesh along X.
    #[arg(short = 'x', long = "xsize")]
    x_size: Option<f32>,

    /// Requested size of the mesh along Y.
    #[arg(short = 'y', long = "ysize")]
    y_size: Option<f32>,

    /// Z scale relative to X and Y.
    #[arg(short = 'z', long = "zscale")]
    z_scale: Option<f32>,

    /// Maximum triangulation error.
    #[arg(short = 'e', long = "error", default_value = "0.001")]
    max_error: f32,

    /// Maximum number of triangles (0 = unbounded).
    #[arg(short = 't', long = "triangles", default_value = "0")]
    max_triangles: usize,

    /// Maximum number of vertices (0 = unbounded).
    #[arg(short = 'p', long = "points", default_value = "0")]
    max_points: usize,

    /// Solid base height (0 = no base).
    #[arg(short = 'b', long = "base", default_value = "0")]
    base_height: f32,

    /// Auto level input to full grayscale range.
    #[arg(long)]
    level: bool,

    /// Invert heightmap.
    #[arg(long)]
    invert: bool,

    /// Gaussian blur sigma in pixels.
    #[arg(long, default_value = "0")]
    blur: f32,

    /// Gamma curve exponent.
    #[arg(long, default_value = "0")]
    gamma: f32,

    /// Border size in pixels.
    #[arg(long, default_value = "0")]
    border_size: u32,

    /// Border z height.
    #[arg(long, default_value = "1")]
    border_height: f32,

    /// Path to write normal map PNG.
    #[arg(long)]
    normal_map: Option<PathBuf>,

    /// Path to write hillshade PNG.
    #[arg(long)]
    shade_path: Option<PathBuf>,

    /// Hillshade light altitude in degrees.
    #[arg(long, default_value = "45")]
    shade_alt: f32,

    /// Hillshade light azimuth in degrees clockwise from north.
    #[arg(long, default_value = "0")]
    shade_az: f32,

    /// Suppress console output.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> ConvertConfig {
        ConvertConfig {
            input: self.infile,
            mesh_output: self.outfile,
            normal_map_output: self.normal_map,
            hillshade_output: self.shade_path,
            x_size: self.x_size,
            y_size: self.y_size,
            z_scale: self.z_scale,
            max_error: self.max_error,
            max_triangles: self.max_triangles,
            max_points: self.max_points,
            base_height: self.base_height,
            auto_level: self.level,
            invert: self.invert,
            blur_sigma: self.blur,
            gamma: self.gamma,
            border_size: self.border_size,
            border_height: self.border_height,
            shade_altitude: self.shade_alt,
            shade_azimuth: self.shade_az,
            quiet: self.quiet,
        }
    }
}

/// Console progress: `label... 0.123s` lines, silent when quiet.
struct Progress {
    quiet: bool,
}

impl Progress {
    fn start(&self, label: &str) -> Instant {
        if !self.quiet {
            print!("{}... ", label);
            let _ = std::io::stdout().flush();
        }
        Instant::now()
    }

    fn done(&self, started: Instant) {
        if !self.quiet {
            println!("{:.3}s", started.elapsed().as_secs_f64());
        }
    }

    fn line(&self, msg: impl Display) {
        if !self.quiet {
            println!("{}", msg);
        }
    }
}

fn fail(stage: &str, err: impl Display) -> ! {
    eprintln!("Error {}: {}", stage, err);
    std::process::exit(1);
}

/// Drops a half-written output file so a failed run leaves nothing misleading behind.
fn fail_output(stage: &str, path: &Path, err: impl Display) -> ! {
    let _ = std::fs::remove_file(path);
    fail(stage, err)
}

fn main() {
    let config = Cli::parse().into_config();
    if let Err(e) = config.validate() {
        fail("config", e);
    }
    let (size, mesh_format) = match (config.mesh_size(), config.mesh_format()) {
        (Ok(size), Ok(format)) => (size, format),
        (Err(e), _) | (_, Err(e)) => fail("config", e),
    };

    let progress = Progress { quiet: config.quiet };
    let run_start = Instant::now();

    let started = progress.start("loading heightmap");
    let mut grid = ElevationGrid::load(&config.input).unwrap_or_else(|e| {
        progress.line("");
        fail("loading heightmap", e)
    });
    progress.done(started);
    progress.line(format!(
        "  {} x {} = {} pixels",
        grid.width(),
        grid.height(),
        grid.len()
    ));

    let pipeline = Pipeline::from_config(&config);
    if pipeline.stage_count() > 0 {
        progress.line("preprocessing heightmap...");
        let started = Instant::now();
        pipeline
            .run_with_callbacks(
                &mut grid,
                |name, i, total| progress.line(format!("  [{}/{}] Starting: {}", i + 1, total, name)),
                |_, _, _| {},
            )
            .unwrap_or_else(|e| fail("preprocessing", e));
        progress.line(format!("  done in {:.3}s", started.elapsed().as_secs_f64()));
    }

    if let (Some(path), Some(format)) = (&config.mesh_output, mesh_format) {
        let mesh = build_mesh(&grid, &config, size, &progress);
        let started = progress.start(&format!("writing {} output", format.name()));
        if let Err(e) = write_mesh(&mesh, path, format) {
            fail_output("writing mesh", path, e);
        }
        progress.done(started);
    }

    if let Some(path) = &config.normal_map_output {
        let started = progress.start("computing normal map");
        let img = normal_map(&grid, size.z_scale);
        if let Err(e) = write_rgb_png(&img, path) {
            fail_output("writing normal map", path, e);
        }
        progress.done(started);
    }

    if let Some(path) = &config.hillshade_output {
        let started = progress.start("computing hillshade image");
        let img = hillshade(&grid, &config.hillshade_options(size.z_scale));
        if let Err(e) = write_gray_png(&img, path) {
            fail_output("writing hillshade", path, e);
        }
        progress.done(started);
    }

    progress.line(format!("{:.3}s", run_start.elapsed().as_secs_f64()));
}

fn build_mesh(grid: &ElevationGrid, config: &ConvertConfig, size: MeshSize, progress: &Progress) -> Mesh {
    let started = progress.start("triangulating");
    let mut tri = Triangulator::new(grid).unwrap_or_else(|e| fail("triangulating", e));
    tri.run(&config.limits()).unwrap_or_else(|e| fail("triangulating", e));
    progress.done(started);

    let naive = (grid.width() as u64 - 1) * (grid.height() as u64 - 1) * 2;
    let ratio = 100.0 * tri.num_triangles() as f64 / naive.max(1) as f64;
    progress.line(format!("  error = {}", tri.error()));
    progress.line(format!("  points = {}", tri.num_points()));
    progress.line(format!("  triangles = {}", tri.num_triangles()));
    progress.line(format!("  vs. naive = {:.2}%", ratio));

    let triangulation = tri.finish();
    let mut mesh = Mesh::from_triangulation(&triangulation, size.z_scale);
    mesh.rescale(triangulation.grid_size(), size.x, size.y);

    if config.base_height > 0.0 {
        let started = progress.start("adding solid base");
        mesh.add_base(config.base_height, size.z_scale)
            .unwrap_or_else(|e| fail("adding solid base", e));
        progress.done(started);
    }

    mesh.generate_uvs(size.x, size.y);
    mesh
}
