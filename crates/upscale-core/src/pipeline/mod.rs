pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_pipeline, run_pipeline_reported, upscale_image};
pub use types::{Capabilities, PipelineResult, PipelineStage, ProgressReporter, UpscalePath};
