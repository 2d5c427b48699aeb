use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use upscale_core::pipeline::{PipelineStage, ProgressReporter};

/// Spinner on stderr showing the current pipeline stage.
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    /// Writer factory for the tracing subscriber. Each record is written
    /// with the spinner hidden so log lines never share its line.
    pub fn log_writer(&self) -> impl Fn() -> SuspendingWriter<io::Stderr> + Send + Sync + 'static {
        let bar = self.bar.clone();
        move || SuspendingWriter::new(bar.clone(), io::stderr())
    }

    /// Remove the spinner so the result line is printed on a clean terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for SpinnerReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn finish_stage(&self) {
        self.bar.tick();
    }
}

/// Writes to `inner` while the progress bar is suspended.
pub struct SuspendingWriter<W> {
    bar: ProgressBar,
    inner: W,
}

impl<W: Write> SuspendingWriter<W> {
    pub fn new(bar: ProgressBar, inner: W) -> Self {
        Self { bar, inner }
    }
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.flush())
    }
}
