use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::channels::{join, split};
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, UpscaleError};
use crate::io::image_io::{decode, encode};
use crate::raster::{Image, ScaleFactor};
use crate::resample::Resampler;
use crate::superres::{
    ModelSelection, ProviderAvailability, SuperResolution, SuperResolutionFactory,
};

use super::config::UpscaleConfig;
use super::types::{
    Capabilities, NoOpReporter, PipelineResult, PipelineStage, ProgressReporter, UpscalePath,
};

/// Upscale an in-memory image.
///
/// Color goes through super-resolution and alpha through the resampler. If
/// super-resolution is unavailable or any step of that route fails, the whole
/// original image is resampled instead; partial results are discarded.
pub fn upscale_image(
    image: &Image,
    scale: ScaleFactor,
    caps: &Capabilities,
    selection: &ModelSelection,
    cwd: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineResult> {
    upscale_with(
        image,
        scale,
        caps.super_resolution.as_deref(),
        caps.resampler()?,
        selection,
        cwd,
        reporter,
    )
}

fn upscale_with(
    image: &Image,
    scale: ScaleFactor,
    factory: Option<&dyn SuperResolutionFactory>,
    resampler: &dyn Resampler,
    selection: &ModelSelection,
    cwd: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineResult> {
    reporter.begin_stage(PipelineStage::Configuring);
    let availability = ProviderAvailability::probe(factory, selection, scale, cwd);
    reporter.finish_stage();
    debug!(?availability, "Super-resolution probe");

    let reason = match availability {
        ProviderAvailability::Available(handle) => {
            match super_resolve(image, scale, handle, resampler, reporter) {
                Ok(upscaled) => {
                    info!(
                        width = upscaled.width(),
                        height = upscaled.height(),
                        "Super-resolution complete"
                    );
                    return Ok(PipelineResult {
                        image: upscaled,
                        path: UpscalePath::SuperResolution,
                        fallback_reason: None,
                    });
                }
                Err(err) => Some(err),
            }
        }
        ProviderAvailability::Unavailable => None,
        ProviderAvailability::ConfigFailed(err) => Some(err),
    };

    fallback_resample(image, scale, resampler, reporter, reason)
}

/// Color plane through the model, alpha plane through the resampler.
fn super_resolve(
    image: &Image,
    scale: ScaleFactor,
    mut handle: Box<dyn SuperResolution>,
    resampler: &dyn Resampler,
    reporter: &dyn ProgressReporter,
) -> Result<Image> {
    let (color, alpha) = split(image);
    if color.channels() != COLOR_CHANNEL_COUNT {
        return Err(UpscaleError::BackendFailure(format!(
            "{} input is not supported by {}",
            color.layout(),
            handle.name()
        )));
    }

    reporter.begin_stage(PipelineStage::ColorUpscale);
    info!(model = handle.name(), family = %handle.family(), %scale, "Super-resolving color plane");
    let upscaled = handle.upscale(&color, resampler);
    drop(handle);
    reporter.finish_stage();
    let upscaled = upscaled?;

    let expected = (scale.apply(image.width())?, scale.apply(image.height())?);
    if (upscaled.width(), upscaled.height()) != expected
        || upscaled.channels() != COLOR_CHANNEL_COUNT
    {
        return Err(UpscaleError::BackendFailure(format!(
            "model produced {}x{}x{}, expected {}x{}x{}",
            upscaled.width(),
            upscaled.height(),
            upscaled.channels(),
            expected.0,
            expected.1,
            COLOR_CHANNEL_COUNT
        )));
    }

    let alpha = match alpha {
        Some(plane) => {
            reporter.begin_stage(PipelineStage::AlphaUpscale);
            let resampled = resampler.resample(&plane, scale);
            reporter.finish_stage();
            Some(resampled?)
        }
        None => None,
    };

    reporter.begin_stage(PipelineStage::Recombine);
    let joined = join(upscaled, alpha);
    reporter.finish_stage();
    Ok(joined)
}

/// Resample every channel of the original image at once.
fn fallback_resample(
    image: &Image,
    scale: ScaleFactor,
    resampler: &dyn Resampler,
    reporter: &dyn ProgressReporter,
    reason: Option<UpscaleError>,
) -> Result<PipelineResult> {
    match &reason {
        Some(err) => {
            if err.is_recoverable() {
                warn!("Super-resolution failed: {err}");
            } else {
                warn!("Super-resolution failed unexpectedly: {err}");
            }
            warn!("Falling back to {} resampling", resampler.name());
        }
        None => info!(
            resampler = resampler.name(),
            "No super-resolution backend, resampling"
        ),
    }

    reporter.begin_stage(PipelineStage::FallbackResample);
    let resampled = resampler.resample(image, scale);
    reporter.finish_stage();

    Ok(PipelineResult {
        image: resampled?,
        path: UpscalePath::FallbackResample,
        fallback_reason: reason.map(|e| e.to_string()),
    })
}

/// Decode, upscale and write one image with a progress reporter.
pub fn run_pipeline_reported(
    config: &UpscaleConfig,
    caps: &Capabilities,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineResult> {
    let scale = config.options.scale;
    let resampler = caps.resampler()?;
    info!(input = %config.input.display(), %scale, "Upscaling");

    reporter.begin_stage(PipelineStage::Decoding);
    let image = decode(&config.input);
    reporter.finish_stage();
    let image = image?;
    info!(
        width = image.width(),
        height = image.height(),
        layout = %image.layout(),
        "Input decoded"
    );

    let cwd = std::env::current_dir()?;
    let factory = if config.options.resample_only {
        info!("Super-resolution disabled by configuration");
        None
    } else {
        caps.super_resolution.as_deref()
    };
    let result = upscale_with(
        &image,
        scale,
        factory,
        resampler,
        &config.options.model,
        &cwd,
        reporter.as_ref(),
    )?;
    drop(image);

    reporter.begin_stage(PipelineStage::Writing);
    let written = encode(&result.image, &config.output);
    reporter.finish_stage();
    written?;
    info!(output = %config.output.display(), path = %result.path, "Done");

    Ok(result)
}

/// Run the pipeline with the capabilities detected in this build.
pub fn run_pipeline(config: &UpscaleConfig) -> Result<PipelineResult> {
    run_pipeline_reported(config, &Capabilities::detect(), Arc::new(NoOpReporter))
}
