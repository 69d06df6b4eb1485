//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the per-channel input sources
//! - runs the calibration pipeline for each channel
//! - prints reports/plots
//! - writes the combined export when every channel calibrated

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{CalibrateArgs, Command, SynthArgs, picker};
use crate::data::SynthSpec;
use crate::domain::{ARGON_LINES_NM, CalConfig, ChannelCalibration, ChannelOutcome};
use crate::error::{AppError, ChannelError};
use crate::io::ingest::FileSource;

pub mod pipeline;

/// Channels read out by the instrument.
const CHANNELS: u32 = 2;

/// Entry point for the `wavecal` binary.
pub fn run() -> Result<(), AppError> {
    // We want `wavecal` and `wavecal --ch1 a.csv` to behave like
    // `wavecal calibrate ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Calibrate(args) => handle_calibrate(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_calibrate(args: CalibrateArgs) -> Result<(), AppError> {
    let config = cal_config_from_args(&args);

    println!("Calibration to known emission lines:");
    println!(
        "{}",
        config
            .known_lines
            .iter()
            .map(|l| format!("{l} nm"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let explicit = [args.ch1.clone(), args.ch2.clone()];
    let mut outcomes = Vec::with_capacity(CHANNELS as usize);

    for channel in 1..=CHANNELS {
        let source = match resolve_source(channel, &explicit[(channel - 1) as usize])? {
            Some(source) => source,
            None => {
                println!(
                    "Channel {channel}: {}, skipping...",
                    ChannelError::InputNotProvided
                );
                outcomes.push(ChannelOutcome::Skipped);
                continue;
            }
        };

        let outcome = match pipeline::run_channel(channel, &source, &config) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("Channel {channel} failed: {err}");
                ChannelOutcome::Skipped
            }
        };

        present_outcome(channel, &outcome, &config);
        outcomes.push(outcome);
    }

    let calibrated: Vec<ChannelCalibration> = outcomes
        .iter()
        .filter_map(|o| match o {
            ChannelOutcome::Calibrated(cal) => Some(cal.clone()),
            _ => None,
        })
        .collect();

    if calibrated.len() != outcomes.len() {
        println!("Not all channels produced a calibration; skipping export.");
        return Ok(());
    }

    let output = match &config.output {
        Some(path) => Some(path.clone()),
        None => picker::prompt_for_save_path("wavecal.calib.csv")?,
    };
    let Some(output) = output else {
        println!("Output file not provided, skipping export...");
        return Ok(());
    };

    crate::io::export::write_calibration_csv(&output, &config.known_lines, &calibrated)?;
    println!("Wrote calibration table to {}", output.display());

    if let Some(path) = &config.export_fit {
        crate::io::export::write_fit_json(path, &config.known_lines, &calibrated)?;
        println!("Wrote fit parameters to {}", path.display());
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let spec = synth_spec_from_args(&args);
    crate::data::write_synthetic_csv(&args.out, &spec)?;
    println!("Wrote synthetic centroid CSV to {}", args.out.display());
    Ok(())
}

/// Resolve the input source for one channel: explicit flag first, interactive
/// picker otherwise. `None` means the channel is skipped.
fn resolve_source(channel: u32, explicit: &Option<PathBuf>) -> Result<Option<FileSource>, AppError> {
    if let Some(path) = explicit {
        let path = picker::validate_csv_path(path)?;
        return Ok(Some(FileSource::new(path)));
    }

    let picked = picker::prompt_for_input_csv(&format!("Centroid CSV for channel {channel}:"))?;
    Ok(picked.map(FileSource::new))
}

fn present_outcome(channel: u32, outcome: &ChannelOutcome, config: &CalConfig) {
    match outcome {
        ChannelOutcome::Calibrated(cal) => {
            println!("{}", crate::report::format_channel_summary(cal));

            if config.plot {
                let plot = crate::plot::render_calibration_plot(
                    &cal.peaks_px,
                    &config.known_lines,
                    &cal.fit,
                    config.sensor_bins as f64,
                    config.plot_width,
                    config.plot_height,
                );
                println!("{plot}");
            }
        }
        ChannelOutcome::Mismatched {
            spectrum,
            peaks_px,
            expected,
        } => {
            println!(
                "Channel {channel}: found {} peaks, expected {expected}; unable to match to known emission lines.",
                peaks_px.len()
            );

            if config.plot {
                let plot = crate::plot::render_spectrum_plot(
                    spectrum,
                    peaks_px,
                    config.resolution,
                    config.plot_width,
                    config.plot_height,
                );
                println!("{plot}");
            }
        }
        ChannelOutcome::Skipped => {}
    }
}

pub fn cal_config_from_args(args: &CalibrateArgs) -> CalConfig {
    let known_lines = if args.lines.is_empty() {
        ARGON_LINES_NM.to_vec()
    } else {
        args.lines.clone()
    };

    CalConfig {
        pixel_pitch: args.pixel_pitch,
        sensor_bins: args.sensor_bins,
        resolution: args.resolution.max(1),
        peak_floor_divisor: args.peak_floor,
        band_half_width: args.band_sigmas,
        known_lines,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        output: args.output.clone(),
        export_fit: args.export_fit.clone(),
    }
}

pub fn synth_spec_from_args(args: &SynthArgs) -> SynthSpec {
    let defaults = SynthSpec::default();
    SynthSpec {
        seed: args.seed,
        centers: if args.centers.is_empty() {
            defaults.centers
        } else {
            args.centers.clone()
        },
        cluster_sigma: args.cluster_sigma,
        events_per_line: args.events_per_line,
        background: args.background,
        row: args.row,
        row_sigma: args.row_sigma,
        resolution: args.resolution.max(1),
        pixel_pitch: args.pixel_pitch,
        sensor_bins: defaults.sensor_bins,
    }
}

/// Rewrite argv so `wavecal` defaults to `wavecal calibrate`.
///
/// Rules:
/// - `wavecal`                      -> `wavecal calibrate`
/// - `wavecal --ch1 a.csv ...`      -> `wavecal calibrate --ch1 a.csv ...`
/// - `wavecal --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("calibrate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "calibrate" | "synth");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "calibrate flags".
    if arg1.starts_with('-') {
        argv.insert(1, "calibrate".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_calibrate() {
        assert_eq!(rewrite_args(argv(&["wavecal"])), argv(&["wavecal", "calibrate"]));
    }

    #[test]
    fn leading_flag_is_treated_as_calibrate_flags() {
        assert_eq!(
            rewrite_args(argv(&["wavecal", "--ch1", "a.csv"])),
            argv(&["wavecal", "calibrate", "--ch1", "a.csv"])
        );
    }

    #[test]
    fn help_and_subcommands_pass_through() {
        assert_eq!(rewrite_args(argv(&["wavecal", "--help"])), argv(&["wavecal", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["wavecal", "synth", "-o", "x.csv"])),
            argv(&["wavecal", "synth", "-o", "x.csv"])
        );
    }

    #[test]
    fn empty_line_list_falls_back_to_the_argon_set() {
        let args = CalibrateArgs::parse_from(["calibrate"]);
        let config = cal_config_from_args(&args);
        assert_eq!(config.known_lines, ARGON_LINES_NM.to_vec());
        assert!(config.plot);

        let args = CalibrateArgs::parse_from(["calibrate", "--line", "794.8", "--no-plot"]);
        let config = cal_config_from_args(&args);
        assert_eq!(config.known_lines, vec![794.8]);
        assert!(!config.plot);
    }
}
