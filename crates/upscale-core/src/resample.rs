use image::imageops::{self, FilterType};
use image::GrayImage;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, UpscaleError};
use crate::raster::{Image, ScaleFactor};

/// Deterministic geometric resampling of an image plane.
///
/// Implementations must treat every channel independently so the same filter
/// can be applied to an alpha plane, a color plane or a whole RGBA image.
pub trait Resampler: Send + Sync {
    /// Human-readable name of the filter.
    fn name(&self) -> &str;

    /// Resample `plane` to `scale` times its width and height.
    fn resample(&self, plane: &Image, scale: ScaleFactor) -> Result<Image>;
}

/// Lanczos (a = 3) windowed-sinc resampler.
#[derive(Clone, Copy, Debug, Default)]
pub struct LanczosResampler;

impl Resampler for LanczosResampler {
    fn name(&self) -> &str {
        "Lanczos3"
    }

    fn resample(&self, plane: &Image, scale: ScaleFactor) -> Result<Image> {
        if plane.is_empty() {
            return Err(UpscaleError::UnreadableImage {
                width: plane.width(),
                height: plane.height(),
            });
        }
        if scale.is_identity() {
            return Ok(plane.clone());
        }

        let new_w = scale.apply(plane.width())?;
        let new_h = scale.apply(plane.height())?;
        let (out_w, out_h) = match (u32::try_from(new_w), u32::try_from(new_h)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(UpscaleError::InvalidImage(format!(
                    "{new_w}x{new_h} exceeds the maximum raster size"
                )))
            }
        };

        debug!(
            width = plane.width(),
            height = plane.height(),
            channels = plane.channels(),
            %scale,
            "Lanczos resample"
        );

        let channel_count = plane.channels();
        let resize = |c: usize| resize_channel(plane, c, out_w, out_h);
        let resized: Vec<GrayImage> =
            if plane.width() * plane.height() >= PARALLEL_PIXEL_THRESHOLD && channel_count > 1 {
                (0..channel_count).into_par_iter().map(resize).collect()
            } else {
                (0..channel_count).map(resize).collect()
            };

        Ok(Image::from_fn(new_w, new_h, plane.layout(), |(row, col, c)| {
            resized[c].get_pixel(col as u32, row as u32).0[0]
        }))
    }
}

fn resize_channel(plane: &Image, channel: usize, out_w: u32, out_h: u32) -> GrayImage {
    let view = plane.channel(channel);
    let src = GrayImage::from_fn(plane.width() as u32, plane.height() as u32, |x, y| {
        image::Luma([view[[y as usize, x as usize]]])
    });
    imageops::resize(&src, out_w, out_h, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ChannelLayout;

    #[test]
    fn output_dimensions_follow_scale() {
        let img = Image::from_fn(7, 5, ChannelLayout::Rgba, |(r, c, ch)| (r * 20 + c * 3 + ch) as u8);
        let out = LanczosResampler
            .resample(&img, ScaleFactor::new(3).unwrap())
            .unwrap();
        assert_eq!(out.width(), 21);
        assert_eq!(out.height(), 15);
        assert_eq!(out.channels(), 4);
    }

    #[test]
    fn empty_plane_is_unreadable() {
        let img = Image::from_raw(0, 4, 1, vec![]).unwrap();
        let err = LanczosResampler
            .resample(&img, ScaleFactor::default())
            .unwrap_err();
        assert!(matches!(err, UpscaleError::UnreadableImage { width: 0, height: 4 }));
    }

    #[test]
    fn identity_scale_is_a_copy() {
        let img = Image::from_fn(6, 4, ChannelLayout::Rgb, |(r, c, ch)| (r * 40 + c * 7 + ch * 2) as u8);
        let out = LanczosResampler
            .resample(&img, ScaleFactor::new(1).unwrap())
            .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn constant_plane_stays_constant() {
        let img = Image::from_fn(8, 8, ChannelLayout::Gray, |_| 200);
        let out = LanczosResampler
            .resample(&img, ScaleFactor::new(2).unwrap())
            .unwrap();
        assert!(out.data().iter().all(|&v| v == 200));
    }

    #[test]
    fn channels_are_resampled_independently() {
        let rgb = Image::from_fn(9, 6, ChannelLayout::Rgb, |(r, c, ch)| {
            ((r * 31 + c * 17) * (ch + 1)) as u8
        });
        let scale = ScaleFactor::new(2).unwrap();
        let whole = LanczosResampler.resample(&rgb, scale).unwrap();

        for ch in 0..3 {
            let single = rgb.select_channels(ch..ch + 1);
            let alone = LanczosResampler.resample(&single, scale).unwrap();
            assert_eq!(whole.channel(ch), alone.channel(0));
        }
    }
}
