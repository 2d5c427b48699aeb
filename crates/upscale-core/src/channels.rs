use ndarray::{concatenate, Axis};

use crate::consts::{ALPHA_CHANNEL_INDEX, COLOR_CHANNEL_COUNT};
use crate::raster::{ChannelLayout, Image};

/// Split an image into its color plane and, for RGBA input, its alpha plane.
///
/// The alpha channel is carried separately, never composited into the color.
/// Gray and RGB images are returned whole with no alpha plane.
pub fn split(image: &Image) -> (Image, Option<Image>) {
    match image.layout() {
        ChannelLayout::Rgba => {
            let color = image.select_channels(0..COLOR_CHANNEL_COUNT);
            let alpha = image.select_channels(ALPHA_CHANNEL_INDEX..ALPHA_CHANNEL_INDEX + 1);
            (color, Some(alpha))
        }
        ChannelLayout::Gray | ChannelLayout::Rgb => (image.clone(), None),
    }
}

/// Recombine an upscaled color plane with an optional upscaled alpha plane.
///
/// # Panics
///
/// If alpha is present and the planes differ in size, or the planes are not
/// 3- and 1-channel. Both come from the same scale applied to planes of one
/// source image, so a mismatch is a bug in the caller.
pub fn join(color: Image, alpha: Option<Image>) -> Image {
    let Some(alpha) = alpha else {
        return color;
    };

    assert_eq!(color.channels(), COLOR_CHANNEL_COUNT, "color plane must be RGB");
    assert_eq!(alpha.channels(), 1, "alpha plane must be single-channel");
    assert_eq!(
        (color.width(), color.height()),
        (alpha.width(), alpha.height()),
        "color and alpha planes must share dimensions"
    );

    let data = concatenate(Axis(2), &[color.data().view(), alpha.data().view()])
        .expect("plane shapes checked above");
    Image::from_array(data)
}
