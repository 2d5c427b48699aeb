use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpscaleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read input image {path}: {reason}")]
    InputUnreadable { path: PathBuf, reason: String },

    #[error("Model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Scale x{scale} is not supported by {model}")]
    UnsupportedScale { scale: u32, model: String },

    #[error("Super-resolution backend failed: {0}")]
    BackendFailure(String),

    #[error("Cannot resample an empty image ({width}x{height})")]
    UnreadableImage { width: usize, height: usize },

    #[error("Cannot write output image {path}: {reason}")]
    OutputWriteError { path: PathBuf, reason: String },

    #[error("Scale factor must be a positive integer, got {0}")]
    InvalidScale(i64),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("No resampling capability available")]
    NoResampler,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UpscaleError {
    /// Errors raised by the super-resolution provider. The pipeline turns
    /// these into a fallback transition instead of failing the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound(_) | Self::UnsupportedScale { .. } | Self::BackendFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, UpscaleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_are_recoverable() {
        assert!(UpscaleError::ModelNotFound(PathBuf::from("EDSR_x2.onnx")).is_recoverable());
        assert!(UpscaleError::BackendFailure("boom".into()).is_recoverable());
        assert!(UpscaleError::UnsupportedScale {
            scale: 5,
            model: "EDSR_x2.onnx".into()
        }
        .is_recoverable());
    }

    #[test]
    fn pipeline_errors_are_fatal() {
        assert!(!UpscaleError::UnreadableImage { width: 0, height: 0 }.is_recoverable());
        assert!(!UpscaleError::NoResampler.is_recoverable());
        assert!(!UpscaleError::OutputWriteError {
            path: PathBuf::from("out.png"),
            reason: "denied".into()
        }
        .is_recoverable());
    }
}
