//! Preprocessing stage trait and pipeline orchestration.

use thiserror::Error;

use crate::config::ConvertConfig;
use crate::heightmap::ElevationGrid;

/// Unique identifier for preprocessing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Remap elevations to `[0, 1]`.
    AutoLevel,
    /// Flip elevations.
    Invert,
    /// Gaussian smoothing.
    Blur,
    /// Power curve.
    Gamma,
    /// Flat rim around the grid.
    Border,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::AutoLevel => "auto-level",
            StageId::Invert => "invert",
            StageId::Blur => "blur",
            StageId::Gamma => "gamma",
            StageId::Border => "border",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug, PartialEq)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
}

/// A single grid preprocessing step.
///
/// Stages either mutate the grid in place or replace its buffer. Each one
/// receives a well-formed grid and must leave a well-formed grid behind.
pub trait PreprocessStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Executes the stage on `grid`.
    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError>;
}

/// Runs preprocessing stages in insertion order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn PreprocessStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard preprocessing chain for a conversion.
    ///
    /// Order: level, invert, blur, gamma, border. Blur, gamma and border are
    /// only added when their parameter is positive.
    pub fn from_config(config: &ConvertConfig) -> Self {
        let mut pipeline = Self::new();
        if config.auto_level {
            pipeline.add_stage(AutoLevelStage);
        }
        if config.invert {
            pipeline.add_stage(InvertStage);
        }
        if config.blur_sigma > 0.0 {
            pipeline.add_stage(BlurStage::new(config.blur_sigma));
        }
        if config.gamma > 0.0 {
            pipeline.add_stage(GammaStage::new(config.gamma));
        }
        if config.border_size > 0 {
            pipeline.add_stage(BorderStage::new(config.border_size, config.border_height));
        }
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: PreprocessStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage identifiers in execution order.
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Executes all stages in order on the given grid.
    pub fn run(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        self.run_with_callbacks(grid, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `grid` - The grid to preprocess
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        grid: &mut ElevationGrid,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);
            stage.execute(grid)?;
            on_stage_complete(stage.name(), i, total);
        }
        Ok(())
    }
}

fn stage_failed(id: StageId, reason: impl Into<String>) -> PipelineError {
    PipelineError::StageFailed(id.name().to_string(), reason.into())
}

/// Remaps elevations so the lowest sample is 0 and the highest 1.
pub struct AutoLevelStage;

impl PreprocessStage for AutoLevelStage {
    fn id(&self) -> StageId {
        StageId::AutoLevel
    }

    fn name(&self) -> &str {
        "Auto Level"
    }

    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        grid.auto_level();
        Ok(())
    }
}

/// Replaces every elevation `v` with `1 - v`.
pub struct InvertStage;

impl PreprocessStage for InvertStage {
    fn id(&self) -> StageId {
        StageId::Invert
    }

    fn name(&self) -> &str {
        "Invert"
    }

    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        grid.invert();
        Ok(())
    }
}

/// Separable Gaussian blur.
pub struct BlurStage {
    pub sigma: f32,
}

impl BlurStage {
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }
}

impl PreprocessStage for BlurStage {
    fn id(&self) -> StageId {
        StageId::Blur
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }

    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        if !self.sigma.is_finite() {
            return Err(stage_failed(self.id(), format!("sigma {} is not finite", self.sigma)));
        }
        grid.gaussian_blur(self.sigma);
        Ok(())
    }
}

/// Elementwise power curve.
pub struct GammaStage {
    pub exponent: f32,
}

impl GammaStage {
    pub fn new(exponent: f32) -> Self {
        Self { exponent }
    }
}

impl PreprocessStage for GammaStage {
    fn id(&self) -> StageId {
        StageId::Gamma
    }

    fn name(&self) -> &str {
        "Gamma Curve"
    }

    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        if !self.exponent.is_finite() {
            return Err(stage_failed(
                self.id(),
                format!("exponent {} is not finite", self.exponent),
            ));
        }
        if self.exponent > 0.0 {
            grid.gamma_curve(self.exponent);
        }
        Ok(())
    }
}

/// Flat ring of constant elevation around the grid.
pub struct BorderStage {
    pub size: u32,
    pub height: f32,
}

impl BorderStage {
    pub fn new(size: u32, height: f32) -> Self {
        Self { size, height }
    }
}

impl PreprocessStage for BorderStage {
    fn id(&self) -> StageId {
        StageId::Border
    }

    fn name(&self) -> &str {
        "Add Border"
    }

    fn execute(&self, grid: &mut ElevationGrid) -> Result<(), PipelineError> {
        let grows = |n: u32| self.size.checked_mul(2).and_then(|b| n.checked_add(b));
        match (grows(grid.width()), grows(grid.height())) {
            (Some(w), Some(h)) if (w as u64) * (h as u64) <= usize::MAX as u64 => {
                grid.add_border(self.size, self.height);
                Ok(())
            }
            _ => Err(stage_failed(
                self.id(),
                format!(
                    "border of {} around {}x{} overflows the grid size",
                    self.size,
                    grid.width(),
                    grid.height()
                ),
            )),
        }
    }
}
