use std::path::Path;

use console::Style;
use upscale_core::pipeline::config::UpscaleConfig;
use upscale_core::pipeline::{Capabilities, PipelineResult, UpscalePath};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            error: Style::new().red().bold(),
        }
    }
}

/// Describe the run before it starts (verbose mode).
pub fn print_run_summary(config: &UpscaleConfig, caps: &Capabilities) {
    let s = Styles::new();
    let opts = &config.options;

    eprintln!();
    eprintln!("  {}", s.title.apply_to("Upscale"));
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    eprintln!("  {:<14}{}", s.label.apply_to("Scale"), s.value.apply_to(opts.scale));

    let backend = match caps.super_resolution.as_deref() {
        _ if opts.resample_only => s.disabled.apply_to("disabled".to_string()),
        Some(factory) => s.method.apply_to(factory.name().to_string()),
        None => s.disabled.apply_to("not available".to_string()),
    };
    eprintln!("  {:<14}{}", s.label.apply_to("Backend"), backend);

    let model = match (&opts.model.path, &opts.model.name_hint) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(hint)) => format!("{hint} (cwd)"),
        (None, None) => "default".to_string(),
    };
    eprintln!("  {:<14}{}", s.label.apply_to("Model"), s.value.apply_to(model));

    if let Some(resampler) = caps.resampler.as_deref() {
        eprintln!(
            "  {:<14}{}",
            s.label.apply_to("Resampler"),
            s.method.apply_to(resampler.name())
        );
    }
    eprintln!();
}

/// The single confirmation line on stdout.
pub fn print_success(result: &PipelineResult, output: &Path) {
    let s = Styles::new();
    let route = match result.path {
        UpscalePath::SuperResolution => s.method.apply_to(result.path),
        UpscalePath::FallbackResample => s.disabled.apply_to(result.path),
    };
    println!(
        "Upscaled via {} ({}x{}) \u{2192} {}",
        route,
        result.image.width(),
        result.image.height(),
        s.path.apply_to(output.display())
    );
}

/// Why the run fell back, for verbose output.
pub fn fallback_note(result: &PipelineResult) -> Option<String> {
    result
        .fallback_reason
        .as_ref()
        .map(|reason| format!("{} after: {reason}", result.path))
}

pub fn print_fallback_note(result: &PipelineResult) {
    if let Some(note) = fallback_note(result) {
        let s = Styles::new();
        eprintln!("  {:<14}{}", s.label.apply_to("Fallback"), s.disabled.apply_to(note));
    }
}

pub fn print_error(message: &str) {
    let s = Styles::new();
    eprintln!("{} {}", s.error.apply_to("error:"), message);
}
