#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use upscale_core::error::{Result, UpscaleError};
use upscale_core::pipeline::{PipelineStage, ProgressReporter};
use upscale_core::raster::{ChannelLayout, Image, ScaleFactor};
use upscale_core::resample::{LanczosResampler, Resampler};
use upscale_core::superres::{
    resolve_model, ModelFamily, ModelSelection, SuperResolution, SuperResolutionFactory,
};

/// 64x64-style RGB test card: smooth gradients with a hard edge.
pub fn rgb_card(w: usize, h: usize) -> Image {
    Image::from_fn(w, h, ChannelLayout::Rgb, |(row, col, c)| match c {
        0 => (col * 255 / (w - 1).max(1)) as u8,
        1 => (row * 255 / (h - 1).max(1)) as u8,
        _ => if col < w / 2 { 30 } else { 220 },
    })
}

/// RGB card plus an alpha ramp running 0..=255 left to right.
pub fn rgba_ramp(w: usize, h: usize) -> Image {
    let rgb = rgb_card(w, h);
    Image::from_fn(w, h, ChannelLayout::Rgba, |(row, col, c)| {
        if c == 3 {
            (col * 255 / (w - 1).max(1)) as u8
        } else {
            rgb.data()[[row, col, c]]
        }
    })
}

pub fn gray_card(w: usize, h: usize) -> Image {
    Image::from_fn(w, h, ChannelLayout::Gray, |(row, col, _)| ((row * 7 + col * 3) % 256) as u8)
}

pub fn scale(s: u32) -> ScaleFactor {
    ScaleFactor::new(s).unwrap()
}

/// Create an empty model file so model resolution succeeds.
pub fn touch_model(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not a real model").expect("write model stub");
    path
}

/// Nearest-neighbour replication; distinguishable from Lanczos output.
pub fn nearest(color: &Image, s: usize) -> Image {
    Image::from_fn(
        color.width() * s,
        color.height() * s,
        color.layout(),
        |(row, col, c)| color.data()[[row / s, col / s, c]],
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Upscale with nearest-neighbour replication.
    Working,
    /// `configure` always fails with a backend error.
    FailConfigure,
    /// `upscale` returns `BackendFailure`.
    FailUpscale,
    /// `upscale` returns an image of the wrong size.
    WrongSize,
    /// `upscale` hands the plane to the resampler it was given.
    Delegate,
}

/// Super-resolution double that resolves models like a real backend.
pub struct FakeFactory {
    pub behavior: Behavior,
}

impl FakeFactory {
    pub fn boxed(behavior: Behavior) -> Box<dyn SuperResolutionFactory> {
        Box::new(Self { behavior })
    }
}

impl SuperResolutionFactory for FakeFactory {
    fn name(&self) -> &str {
        "fake"
    }

    fn configure(
        &self,
        selection: &ModelSelection,
        scale: ScaleFactor,
        cwd: &Path,
    ) -> Result<Box<dyn SuperResolution>> {
        if self.behavior == Behavior::FailConfigure {
            return Err(UpscaleError::BackendFailure("runtime not loadable".into()));
        }
        let model = resolve_model(selection, scale, cwd)?;
        Ok(Box::new(FakeModel {
            family: model.family,
            scale: scale.get() as usize,
            behavior: self.behavior,
        }))
    }
}

struct FakeModel {
    family: ModelFamily,
    scale: usize,
    behavior: Behavior,
}

impl SuperResolution for FakeModel {
    fn name(&self) -> &str {
        "fake-model"
    }

    fn family(&self) -> ModelFamily {
        self.family
    }

    fn upscale(&mut self, color: &Image, resampler: &dyn Resampler) -> Result<Image> {
        match self.behavior {
            Behavior::FailUpscale => Err(UpscaleError::BackendFailure("inference crashed".into())),
            Behavior::WrongSize => Ok(nearest(color, self.scale + 1)),
            Behavior::Delegate => resampler.resample(color, ScaleFactor::new(self.scale as u32)?),
            _ => Ok(nearest(color, self.scale)),
        }
    }
}

/// Records the stages the pipeline walks through.
#[derive(Default)]
pub struct RecordingReporter {
    pub stages: Mutex<Vec<PipelineStage>>,
}

impl RecordingReporter {
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.stages.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.stages.lock().unwrap().push(stage);
    }
}

/// Lanczos resampler that counts how many planes it was asked to resample.
#[derive(Default)]
pub struct CountingResampler {
    pub calls: Arc<AtomicUsize>,
}

impl CountingResampler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resampler for CountingResampler {
    fn name(&self) -> &str {
        "counting"
    }

    fn resample(&self, plane: &Image, scale: ScaleFactor) -> Result<Image> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LanczosResampler.resample(plane, scale)
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return the WARN lines it logged.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_target(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    let lines = String::from_utf8_lossy(&bytes)
        .lines()
        .filter(|line| line.contains("WARN"))
        .map(str::to_owned)
        .collect();
    (out, lines)
}
