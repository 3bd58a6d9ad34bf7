//! Pipeline module for orchestrating grid preprocessing.
//!
//! Provides a trait-based architecture for preprocessing stages that are
//! composed into the chain run between loading and triangulation.

mod stage;

pub use stage::{
    PreprocessStage, StageId, Pipeline, PipelineError,
    AutoLevelStage, InvertStage, BlurStage, GammaStage, BorderStage,
};
