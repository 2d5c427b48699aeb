use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::raster::ScaleFactor;
use crate::superres::ModelSelection;

/// Everything needed for one upscale run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpscaleConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub options: UpscaleOptions,
}

/// Run settings that do not depend on the input/output pair. This is the
/// shape of a TOML settings file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpscaleOptions {
    #[serde(default)]
    pub scale: ScaleFactor,
    #[serde(default)]
    pub model: ModelSelection,
    /// Skip super-resolution and resample the whole image.
    #[serde(default)]
    pub resample_only: bool,
}

impl UpscaleConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options: UpscaleOptions::default(),
        }
    }
}
