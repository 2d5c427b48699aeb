mod progress;
mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use upscale_core::error::UpscaleError;
use upscale_core::pipeline::config::{UpscaleConfig, UpscaleOptions};
use upscale_core::pipeline::{run_pipeline_reported, Capabilities};
use upscale_core::raster::ScaleFactor;

use progress::SpinnerReporter;

/// Exit code when the input path does not exist.
const EXIT_INPUT_MISSING: u8 = 2;
/// Exit code when neither super-resolution nor resampling is available.
const EXIT_NO_RESAMPLER: u8 = 3;

#[derive(Parser)]
#[command(name = "upscale", about = "Integer-factor image upscaler with super-resolution and RGBA support")]
#[command(version)]
struct Cli {
    /// Input image path
    input: PathBuf,

    /// Output image path (format from extension)
    output: PathBuf,

    /// Upscale factor
    #[arg(short = 'r', long)]
    scale: Option<u32>,

    /// Super-resolution model file (e.g. EDSR_x2.onnx)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Model file name looked up in the current directory
    #[arg(long)]
    model_name: Option<String>,

    /// Settings file (TOML) with scale and model defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip super-resolution and resample the whole image
    #[arg(long)]
    no_sr: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    let spinner = Arc::new(SpinnerReporter::new());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(spinner.log_writer())
        .with_target(false)
        .init();

    ExitCode::from(execute(&cli, spinner))
}

/// Run the CLI and map the outcome to a process exit code.
fn execute(cli: &Cli, spinner: Arc<SpinnerReporter>) -> u8 {
    if let Some(code) = check_input(&cli.input) {
        return code;
    }

    match run(cli, spinner) {
        Ok(()) => 0,
        Err(err) => {
            summary::print_error(&format!("{err:#}"));
            exit_code(&err)
        }
    }
}

/// A missing input is reported before any other work.
fn check_input(input: &Path) -> Option<u8> {
    if input.exists() {
        return None;
    }
    summary::print_error(&format!("Input image does not exist: {}", input.display()));
    Some(EXIT_INPUT_MISSING)
}

fn run(cli: &Cli, spinner: Arc<SpinnerReporter>) -> Result<()> {
    let options = build_options(cli)?;
    debug!(?options, "Effective options");
    let config = UpscaleConfig {
        input: cli.input.clone(),
        output: cli.output.clone(),
        options,
    };

    let caps = Capabilities::detect();
    if cli.verbose {
        summary::print_run_summary(&config, &caps);
    }

    let result = run_pipeline_reported(&config, &caps, spinner.clone());
    spinner.finish();
    let result = result
        .with_context(|| format!("Failed to upscale {}", config.input.display()))?;

    if cli.verbose {
        summary::print_fallback_note(&result);
    }
    summary::print_success(&result, &config.output);
    Ok(())
}

/// Merge the settings file (if any) with command-line flags. Flags win.
fn build_options(cli: &Cli) -> Result<UpscaleOptions> {
    let mut options = match cli.config {
        Some(ref path) => load_options(path)?,
        None => UpscaleOptions::default(),
    };

    if let Some(scale) = cli.scale {
        options.scale = ScaleFactor::new(scale)?;
    }
    if cli.model.is_some() || cli.model_name.is_some() {
        options.model.path = cli.model.clone();
        options.model.name_hint = cli.model_name.clone();
    }
    if cli.no_sr {
        options.resample_only = true;
    }
    Ok(options)
}

fn load_options(path: &Path) -> Result<UpscaleOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents)
        .map_err(|e| UpscaleError::Config(e.to_string()))
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<UpscaleError>() {
        Some(UpscaleError::NoResampler) => EXIT_NO_RESAMPLER,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("upscale").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_scale_two() {
        let cli = parse(&["in.png", "out.png"]);
        let options = build_options(&cli).unwrap();
        assert_eq!(options.scale.get(), 2);
        assert!(options.model.path.is_none());
        assert!(!options.resample_only);
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-r", "4", "-m", "LapSRN_x4.onnx", "in.png", "out.png"]);
        let options = build_options(&cli).unwrap();
        assert_eq!(options.scale.get(), 4);
        assert_eq!(options.model.path, Some(PathBuf::from("LapSRN_x4.onnx")));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let cli = parse(&["--scale", "0", "in.png", "out.png"]);
        let err = build_options(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UpscaleError>(),
            Some(UpscaleError::InvalidScale(0))
        ));
    }

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upscale.toml");
        std::fs::write(
            &path,
            "scale = 3\nresample_only = true\n\n[model]\nname_hint = \"FSRCNN_x3.onnx\"\n",
        )
        .unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "in.png", "out.png"]);
        let options = build_options(&cli).unwrap();
        assert_eq!(options.scale.get(), 3);
        assert_eq!(options.model.name_hint.as_deref(), Some("FSRCNN_x3.onnx"));
        assert!(options.resample_only);

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--model-name",
            "EDSR_x2.onnx",
            "-r",
            "2",
            "in.png",
            "out.png",
        ]);
        let options = build_options(&cli).unwrap();
        assert_eq!(options.scale.get(), 2);
        assert_eq!(options.model.name_hint.as_deref(), Some("EDSR_x2.onnx"));
    }

    #[test]
    fn bad_settings_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upscale.toml");
        std::fs::write(&path, "scale = 0\n").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "in.png", "out.png"]);
        let err = build_options(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UpscaleError>(),
            Some(UpscaleError::Config(_))
        ));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn exit_code_mapping() {
        let err = anyhow::Error::new(UpscaleError::NoResampler).context("Failed to upscale x.png");
        assert_eq!(exit_code(&err), EXIT_NO_RESAMPLER);

        let err = anyhow::Error::new(UpscaleError::InputUnreadable {
            path: PathBuf::from("x.png"),
            reason: "bad".into(),
        });
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn missing_input_exits_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.png");
        let output = dir.path().join("out.png");
        assert_eq!(check_input(&input), Some(EXIT_INPUT_MISSING));

        let cli = parse(&[input.to_str().unwrap(), output.to_str().unwrap()]);
        assert_eq!(execute(&cli, Arc::new(SpinnerReporter::new())), EXIT_INPUT_MISSING);
        assert!(!output.exists());
    }

    #[test]
    fn existing_input_passes_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"not checked here").unwrap();
        assert_eq!(check_input(&input), None);
    }
}
