use std::fmt;

use crate::consts::{EDSR_SCALES, FSRCNN_SCALES, LAPSRN_SCALES};

/// Architecture family of a super-resolution model, inferred from its file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFamily {
    Edsr,
    Fsrcnn,
    LapSrn,
    Unknown,
}

/// How a family expects its input tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// Three RGB planes, samples in [0, 255].
    Rgb255,
    /// The luma plane only, samples in [0, 1]. Chroma is resampled separately.
    Luma01,
}

impl ModelFamily {
    /// Case-insensitive substring match, checked in the order EDSR, FSRCNN,
    /// LapSRN. Names matching none of them are `Unknown`.
    pub fn infer(name: &str) -> Self {
        let upper = name.to_uppercase();
        if upper.contains("EDSR") {
            Self::Edsr
        } else if upper.contains("FSRCNN") {
            Self::Fsrcnn
        } else if upper.contains("LAPSRN") {
            Self::LapSrn
        } else {
            Self::Unknown
        }
    }

    /// Family whose settings are used to drive the model.
    ///
    /// Unknown models are run with LapSRN settings. This keeps the historical
    /// behavior of the tool even though it mislabels genuinely unknown
    /// architectures.
    pub fn effective(self) -> Self {
        match self {
            Self::Unknown => Self::LapSrn,
            other => other,
        }
    }

    pub fn supported_scales(self) -> &'static [u32] {
        match self.effective() {
            Self::Edsr => &EDSR_SCALES,
            Self::Fsrcnn => &FSRCNN_SCALES,
            _ => &LAPSRN_SCALES,
        }
    }

    pub fn supports_scale(self, scale: u32) -> bool {
        self.supported_scales().contains(&scale)
    }

    pub fn tensor_layout(self) -> TensorLayout {
        match self.effective() {
            Self::Edsr => TensorLayout::Rgb255,
            _ => TensorLayout::Luma01,
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edsr => write!(f, "EDSR"),
            Self::Fsrcnn => write!(f, "FSRCNN"),
            Self::LapSrn => write!(f, "LapSRN"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Scale encoded in a model file name as `_x<N>`, e.g. `FSRCNN_x3.onnx`.
pub fn scale_tag(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    lower.match_indices("_x").find_map(|(idx, _)| {
        let digits: String = lower[idx + 2..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    })
}
