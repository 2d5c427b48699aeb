use std::fmt;
use std::ops::Range;

use ndarray::{s, Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SCALE;
use crate::error::{Result, UpscaleError};

/// Channel arrangement of an [`Image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray => write!(f, "Gray"),
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

/// An 8-bit raster image with 1, 3 or 4 interleaved channels.
///
/// Channel order is library-agnostic: gray, RGB or RGBA. Codecs normalize
/// to this order on decode and from it on encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Samples, shape = (height, width, channels)
    data: Array3<u8>,
}

impl Image {
    /// Wrap an `(height, width, channels)` array. Fails unless the channel
    /// count is 1, 3 or 4.
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let channels = data.dim().2;
        if ChannelLayout::from_channels(channels).is_none() {
            return Err(UpscaleError::InvalidImage(format!(
                "unsupported channel count {channels}"
            )));
        }
        Ok(Self { data })
    }

    /// Build an image from row-major interleaved samples.
    pub fn from_raw(width: usize, height: usize, channels: usize, pixels: Vec<u8>) -> Result<Self> {
        let data = Array3::from_shape_vec((height, width, channels), pixels).map_err(|e| {
            UpscaleError::InvalidImage(format!(
                "{width}x{height}x{channels} buffer mismatch: {e}"
            ))
        })?;
        Self::new(data)
    }

    /// Build an image by evaluating `f(row, col, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, layout: ChannelLayout, f: F) -> Self
    where
        F: FnMut((usize, usize, usize)) -> u8,
    {
        Self {
            data: Array3::from_shape_fn((height, width, layout.channels()), f),
        }
    }

    /// Caller guarantees a supported channel count.
    pub(crate) fn from_array(data: Array3<u8>) -> Self {
        debug_assert!(ChannelLayout::from_channels(data.dim().2).is_some());
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn layout(&self) -> ChannelLayout {
        ChannelLayout::from_channels(self.channels()).expect("channel count validated on construction")
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// View of a single channel, shape = (height, width).
    pub fn channel(&self, index: usize) -> ArrayView2<'_, u8> {
        self.data.slice(s![.., .., index])
    }

    /// Copy of a contiguous channel range as a new image.
    pub(crate) fn select_channels(&self, range: Range<usize>) -> Self {
        Self::from_array(self.data.slice(s![.., .., range]).to_owned())
    }

    /// Stack single-channel planes into one image.
    pub(crate) fn from_planes(planes: &[Array2<u8>]) -> Self {
        let (h, w) = planes[0].dim();
        Self::from_array(Array3::from_shape_fn((h, w, planes.len()), |(row, col, c)| {
            planes[c][[row, col]]
        }))
    }

    /// Row-major interleaved samples.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}

/// Uniform integer multiplier applied to width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ScaleFactor(u32);

impl ScaleFactor {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(UpscaleError::InvalidScale(0));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 1
    }

    /// `dim * scale`, failing on overflow.
    pub fn apply(self, dim: usize) -> Result<usize> {
        dim.checked_mul(self.0 as usize).ok_or_else(|| {
            UpscaleError::InvalidImage(format!("dimension {dim} overflows at x{}", self.0))
        })
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(DEFAULT_SCALE)
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = UpscaleError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for ScaleFactor {
    type Error = UpscaleError;

    fn try_from(value: i64) -> Result<Self> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(UpscaleError::InvalidScale(value)),
        }
    }
}

impl From<ScaleFactor> for u32 {
    fn from(scale: ScaleFactor) -> Self {
        scale.0
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
