//! Conversions between [`Image`] planes and NCHW `f32` model tensors.

use ndarray::Array2;

use crate::consts::{CHROMA_OFFSET, COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{Result, UpscaleError};
use crate::raster::Image;

use super::family::TensorLayout;

impl TensorLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb255 => COLOR_CHANNEL_COUNT,
            Self::Luma01 => 1,
        }
    }

    fn sample_scale(self) -> f32 {
        match self {
            Self::Rgb255 => 1.0,
            Self::Luma01 => 1.0 / 255.0,
        }
    }
}

/// Flatten a plane into a `1 x C x H x W` tensor.
pub fn to_tensor(plane: &Image, layout: TensorLayout) -> Result<([usize; 4], Vec<f32>)> {
    let (h, w, c) = plane.data().dim();
    if c != layout.channels() {
        return Err(UpscaleError::BackendFailure(format!(
            "model expects {} channel(s), got {c}",
            layout.channels()
        )));
    }

    let k = layout.sample_scale();
    let mut values = Vec::with_capacity(h * w * c);
    for ch in 0..c {
        values.extend(plane.channel(ch).iter().map(|&v| v as f32 * k));
    }
    Ok(([1, c, h, w], values))
}

/// Rebuild a plane from a `1 x C x H x W` model output.
pub fn from_tensor(shape: &[usize], values: &[f32], layout: TensorLayout) -> Result<Image> {
    let [n, c, h, w] = match shape {
        &[n, c, h, w] => [n, c, h, w],
        _ => {
            return Err(UpscaleError::BackendFailure(format!(
                "expected a 4-D output tensor, got shape {shape:?}"
            )))
        }
    };
    if n != 1 || c != layout.channels() || values.len() != c * h * w {
        return Err(UpscaleError::BackendFailure(format!(
            "unexpected output tensor shape {shape:?} with {} values",
            values.len()
        )));
    }

    let k = 1.0 / layout.sample_scale();
    let plane_len = h * w;
    let pixels = (0..plane_len * c)
        .map(|i| {
            let (px, ch) = (i / c, i % c);
            to_u8(values[ch * plane_len + px] * k)
        })
        .collect();
    Image::from_raw(w, h, c, pixels)
}

/// Full-range BT.601 RGB to YCbCr, channel order Y, Cb, Cr.
pub fn rgb_to_ycbcr(rgb: &Image) -> Image {
    Image::from_fn(rgb.width(), rgb.height(), rgb.layout(), |(row, col, c)| {
        let px = rgb.data();
        let r = px[[row, col, 0]] as f32;
        let g = px[[row, col, 1]] as f32;
        let b = px[[row, col, 2]] as f32;
        let y = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
        let v = match c {
            0 => y,
            1 => CHROMA_OFFSET + (b - y) / (2.0 * (1.0 - LUMINANCE_B)),
            _ => CHROMA_OFFSET + (r - y) / (2.0 * (1.0 - LUMINANCE_R)),
        };
        to_u8(v)
    })
}

/// Inverse of [`rgb_to_ycbcr`].
pub fn ycbcr_to_rgb(ycc: &Image) -> Image {
    Image::from_fn(ycc.width(), ycc.height(), ycc.layout(), |(row, col, c)| {
        let px = ycc.data();
        let y = px[[row, col, 0]] as f32;
        let cb = px[[row, col, 1]] as f32 - CHROMA_OFFSET;
        let cr = px[[row, col, 2]] as f32 - CHROMA_OFFSET;
        let r = y + 2.0 * (1.0 - LUMINANCE_R) * cr;
        let b = y + 2.0 * (1.0 - LUMINANCE_B) * cb;
        let v = match c {
            0 => r,
            1 => (y - LUMINANCE_R * r - LUMINANCE_B * b) / LUMINANCE_G,
            _ => b,
        };
        to_u8(v)
    })
}

/// Replace the Y plane of a YCbCr image with `luma`.
pub fn replace_luma(ycc: &Image, luma: &Image) -> Result<Image> {
    if (ycc.width(), ycc.height()) != (luma.width(), luma.height()) || luma.channels() != 1 {
        return Err(UpscaleError::BackendFailure(format!(
            "luma plane {}x{} does not match chroma {}x{}",
            luma.width(),
            luma.height(),
            ycc.width(),
            ycc.height()
        )));
    }
    let planes: Vec<Array2<u8>> = vec![
        luma.channel(0).to_owned(),
        ycc.channel(1).to_owned(),
        ycc.channel(2).to_owned(),
    ];
    Ok(Image::from_planes(&planes))
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
