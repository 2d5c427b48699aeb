use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use tracing::{debug, warn};

use crate::channels::split;
use crate::error::{Result, UpscaleError};
use crate::raster::{ChannelLayout, Image};

/// Decode an image file into gray, RGB or RGBA 8-bit samples.
///
/// Gray+alpha sources become RGBA, higher bit depths are reduced to 8 bits.
pub fn decode(path: &Path) -> Result<Image> {
    let img = image::open(path).map_err(|e| UpscaleError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Decoded input"
    );
    Ok(from_dynamic(img))
}

/// Normalize a decoded image to one of the supported channel layouts.
pub fn from_dynamic(img: DynamicImage) -> Image {
    let color = img.color();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let (channels, raw) = if color.has_alpha() {
        (4, img.into_rgba8().into_raw())
    } else if color.has_color() {
        (3, img.into_rgb8().into_raw())
    } else {
        (1, img.into_luma8().into_raw())
    };
    Image::from_raw(w, h, channels, raw).expect("buffer size matches dimensions")
}

/// Convert to an `image` crate buffer of the matching color type.
pub fn to_dynamic(image: &Image) -> DynamicImage {
    let (w, h) = (image.width() as u32, image.height() as u32);
    let raw = image.to_raw();
    match image.layout() {
        ChannelLayout::Gray => DynamicImage::ImageLuma8(
            GrayImage::from_raw(w, h, raw).expect("buffer size matches dimensions"),
        ),
        ChannelLayout::Rgb => DynamicImage::ImageRgb8(
            RgbImage::from_raw(w, h, raw).expect("buffer size matches dimensions"),
        ),
        ChannelLayout::Rgba => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(w, h, raw).expect("buffer size matches dimensions"),
        ),
    }
}

/// Encode an image, choosing the format from the file extension.
///
/// Formats without an alpha channel (JPEG) receive the color plane only.
pub fn encode(image: &Image, path: &Path) -> Result<()> {
    let write_error = |reason: String| UpscaleError::OutputWriteError {
        path: path.to_path_buf(),
        reason,
    };
    let format = ImageFormat::from_path(path).map_err(|e| write_error(e.to_string()))?;

    let dynamic = if image.layout().has_alpha() && !supports_alpha(format) {
        warn!(format = ?format, "Output format has no alpha channel, dropping alpha");
        to_dynamic(&split(image).0)
    } else {
        to_dynamic(image)
    };

    dynamic
        .save_with_format(path, format)
        .map_err(|e| write_error(e.to_string()))?;
    debug!(path = %path.display(), "Wrote output");
    Ok(())
}

fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg)
}
