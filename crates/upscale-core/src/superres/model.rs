use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::DEFAULT_MODEL_NAME;
use crate::error::{Result, UpscaleError};
use crate::raster::ScaleFactor;

use super::family::{scale_tag, ModelFamily};

/// Which super-resolution model to load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    /// Explicit model file. Takes precedence over `name_hint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// File name looked up in the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
}

impl ModelSelection {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            name_hint: None,
        }
    }

    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            path: None,
            name_hint: Some(name.into()),
        }
    }

    /// The model as the user named it: the explicit path, else the hint,
    /// else [`DEFAULT_MODEL_NAME`]. Family inference reads this whole string,
    /// so a family token in a directory name counts.
    pub fn identifier(&self) -> String {
        match (&self.path, &self.name_hint) {
            (Some(path), _) => path.to_string_lossy().into_owned(),
            (None, Some(hint)) => hint.clone(),
            (None, None) => DEFAULT_MODEL_NAME.to_string(),
        }
    }

    /// Resolve to an existing model file.
    ///
    /// An explicit path is used as-is and never falls through to the hint.
    /// Without either, [`DEFAULT_MODEL_NAME`] is looked up in `cwd`.
    pub fn resolve(&self, cwd: &Path) -> Result<PathBuf> {
        let candidate = match (&self.path, &self.name_hint) {
            (Some(path), _) => path.clone(),
            (None, Some(hint)) => cwd.join(hint),
            (None, None) => cwd.join(DEFAULT_MODEL_NAME),
        };
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(UpscaleError::ModelNotFound(candidate))
        }
    }
}

/// A model file checked against the requested scale, ready to be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModel {
    pub path: PathBuf,
    pub family: ModelFamily,
    pub scale: ScaleFactor,
}

impl ResolvedModel {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Resolve the model file, infer its family and check the scale.
///
/// Fails with `ModelNotFound` when the file is missing and with
/// `UnsupportedScale` when neither the family nor the file's `_x<N>` tag
/// allows `scale`.
pub fn resolve_model(
    selection: &ModelSelection,
    scale: ScaleFactor,
    cwd: &Path,
) -> Result<ResolvedModel> {
    let path = selection.resolve(cwd)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let family = ModelFamily::infer(&selection.identifier());
    if family == ModelFamily::Unknown {
        warn!(
            model = %name,
            "Unrecognized model family, using {} settings",
            family.effective()
        );
    }

    let unsupported = || UpscaleError::UnsupportedScale {
        scale: scale.get(),
        model: name.clone(),
    };
    if !family.supports_scale(scale.get()) {
        return Err(unsupported());
    }
    if let Some(tagged) = scale_tag(&name) {
        if tagged != scale.get() {
            return Err(unsupported());
        }
    }

    debug!(path = %path.display(), %family, %scale, "Model resolved");
    Ok(ResolvedModel {
        path,
        family,
        scale,
    })
}
