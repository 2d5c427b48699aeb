pub mod family;
pub mod model;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod tensor;

use std::path::Path;

use tracing::debug;

use crate::error::{Result, UpscaleError};
use crate::raster::{Image, ScaleFactor};
use crate::resample::Resampler;

pub use family::{ModelFamily, TensorLayout};
pub use model::{resolve_model, ModelSelection, ResolvedModel};

/// A configured super-resolution model. Dropping it releases the model.
///
/// Operates on 3-channel color planes only.
pub trait SuperResolution: Send {
    fn name(&self) -> &str;

    fn family(&self) -> ModelFamily;

    /// Upscale an RGB plane by the scale the model was configured for.
    /// Planes the model does not produce itself go through `resampler`.
    /// Any runtime failure is reported as `BackendFailure`.
    fn upscale(&mut self, color: &Image, resampler: &dyn Resampler) -> Result<Image>;
}

/// Entry point of a super-resolution backend.
pub trait SuperResolutionFactory: Send + Sync {
    fn name(&self) -> &str;

    /// Load the selected model for `scale`.
    ///
    /// Fails with `ModelNotFound` or `UnsupportedScale` when the selection
    /// cannot be satisfied.
    fn configure(
        &self,
        selection: &ModelSelection,
        scale: ScaleFactor,
        cwd: &Path,
    ) -> Result<Box<dyn SuperResolution>>;
}

/// Outcome of trying to set up super-resolution for one run.
pub enum ProviderAvailability {
    Available(Box<dyn SuperResolution>),
    /// No backend is compiled into or installed in this environment.
    Unavailable,
    ConfigFailed(UpscaleError),
}

impl ProviderAvailability {
    pub fn probe(
        factory: Option<&dyn SuperResolutionFactory>,
        selection: &ModelSelection,
        scale: ScaleFactor,
        cwd: &Path,
    ) -> Self {
        let Some(factory) = factory else {
            debug!("No super-resolution backend available");
            return Self::Unavailable;
        };
        match factory.configure(selection, scale, cwd) {
            Ok(handle) => {
                debug!(backend = factory.name(), model = handle.name(), "Super-resolution ready");
                Self::Available(handle)
            }
            Err(err) => Self::ConfigFailed(err),
        }
    }
}

impl std::fmt::Debug for ProviderAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(handle) => write!(f, "Available({})", handle.name()),
            Self::Unavailable => write!(f, "Unavailable"),
            Self::ConfigFailed(err) => write!(f, "ConfigFailed({err})"),
        }
    }
}

/// The super-resolution backend compiled into this build, if any.
pub fn detect_super_resolution() -> Option<Box<dyn SuperResolutionFactory>> {
    #[cfg(feature = "onnx")]
    {
        Some(Box::new(onnx::OnnxFactory))
    }
    #[cfg(not(feature = "onnx"))]
    {
        None
    }
}
