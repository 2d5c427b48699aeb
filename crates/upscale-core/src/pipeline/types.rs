use std::fmt;

use crate::error::{Result, UpscaleError};
use crate::raster::Image;
use crate::resample::{LanczosResampler, Resampler};
use crate::superres::{detect_super_resolution, SuperResolutionFactory};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    Configuring,
    ColorUpscale,
    AlphaUpscale,
    Recombine,
    FallbackResample,
    Writing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding input"),
            Self::Configuring => write!(f, "Loading model"),
            Self::ColorUpscale => write!(f, "Super-resolving color"),
            Self::AlphaUpscale => write!(f, "Resampling alpha"),
            Self::Recombine => write!(f, "Recombining channels"),
            Self::FallbackResample => write!(f, "Resampling image"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Which route produced the final image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpscalePath {
    SuperResolution,
    FallbackResample,
}

impl fmt::Display for UpscalePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuperResolution => write!(f, "super-resolution"),
            Self::FallbackResample => write!(f, "fallback-resample"),
        }
    }
}

/// Final image plus diagnostics about how it was produced.
#[derive(Clone, Debug)]
pub struct PipelineResult {
    pub image: Image,
    pub path: UpscalePath,
    /// Error that sent the run down the fallback path, if any. Shown by
    /// verbose front ends; the warning itself is logged when it happens.
    pub fallback_reason: Option<String>,
}

/// Progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn begin_stage(&self, _stage: PipelineStage) {}

    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Resampling capabilities of the running environment, detected once.
pub struct Capabilities {
    pub super_resolution: Option<Box<dyn SuperResolutionFactory>>,
    pub resampler: Option<Box<dyn Resampler>>,
}

impl Capabilities {
    /// The backends compiled into this build.
    pub fn detect() -> Self {
        Self {
            super_resolution: detect_super_resolution(),
            resampler: Some(Box::new(LanczosResampler)),
        }
    }

    /// Only the built-in resampler.
    pub fn resample_only() -> Self {
        Self {
            super_resolution: None,
            resampler: Some(Box::new(LanczosResampler)),
        }
    }

    pub fn with_super_resolution(mut self, factory: Box<dyn SuperResolutionFactory>) -> Self {
        self.super_resolution = Some(factory);
        self
    }

    pub(super) fn resampler(&self) -> Result<&dyn Resampler> {
        self.resampler.as_deref().ok_or(UpscaleError::NoResampler)
    }
}
