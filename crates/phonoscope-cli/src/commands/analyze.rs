//! Run the pipeline and summarize the tracks.

use std::path::PathBuf;

use clap::Args;
use phonoscope_analysis::{AnalysisReport, SampleBuffer, Spectrogram, note::note_name};

use super::common::{AnalysisArgs, print_warnings, run_pipeline};
use crate::progress::StageSpinner;

/// Analyze a recording without composing a report.
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Export every track as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = args.analysis.settings()?;
    let params = settings.to_params()?;
    let buffer = args.analysis.load()?;

    let spinner = StageSpinner::new();
    let report = run_pipeline(&buffer, &params, &spinner);
    spinner.finish();
    let report = report?;
    print_warnings(&report);

    print_summary(&report);

    if let Some(path) = args.json {
        let json = export(&buffer, &report);
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
        println!("\nWrote tracks to {}", path.display());
    }
    Ok(())
}

fn describe(spec: &Spectrogram) -> String {
    format!(
        "{} frames x {} bins (n_fft {}, hop {})",
        spec.num_frames, spec.num_bins, spec.fft_size, spec.hop_size
    )
}

fn print_summary(report: &AnalysisReport) {
    println!("Spectrograms:");
    println!("  Wideband:   {}", describe(&report.wideband));
    println!("  Narrowband: {}", describe(&report.narrowband));

    let pitch = &report.pitch;
    println!("\nPitch ({} frames):", pitch.len());
    println!("  Voiced:     {:.1}%", pitch.voiced_ratio() * 100.0);
    match pitch.median_frequency() {
        Some(hz) => {
            let note = note_name(hz).unwrap_or_default();
            println!("  Median:     {hz:.1} Hz {note}");
        }
        None => println!("  Median:     -"),
    }
    if let Some((lo, hi)) = pitch.frequency_range() {
        println!("  Range:      {lo:.1} - {hi:.1} Hz");
    }

    println!("\nIntensity ({} frames):", report.energy.len());
    if let Some((lo, hi)) = report.energy.db_range() {
        println!("  Range:      {lo:.1} to {hi:.1} dB");
    }

    println!("\nZero crossing rate ({} frames):", report.zcr.len());
    println!("  Threshold:  {}", report.zcr.threshold);
    println!("  Mean:       {:.4}", report.zcr.mean());
}

fn export(buffer: &SampleBuffer, report: &AnalysisReport) -> serde_json::Value {
    let spectrogram = |spec: &Spectrogram| {
        serde_json::json!({
            "n_fft": spec.fft_size,
            "hop_length": spec.hop_size,
            "num_frames": spec.num_frames,
            "num_bins": spec.num_bins,
            "range_db": spec.range(),
            "peak_hz": (0..spec.num_frames)
                .map(|frame| spec.peak_frequency(frame))
                .collect::<Vec<_>>(),
        })
    };
    let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();

    serde_json::json!({
        "sample_rate": buffer.sample_rate(),
        "duration_secs": buffer.duration_secs(),
        "wideband": spectrogram(&report.wideband),
        "narrowband": spectrogram(&report.narrowband),
        "pitch": {
            "times": report.pitch.times(),
            "frequency_hz": report.pitch.frequency,
            "voiced": report.pitch.voiced,
            "voiced_probability": report.pitch.voiced_probability,
        },
        "energy": {
            "times": report.energy.times(),
            "rms": report.energy.rms,
            "rms_db": report.energy.db,
        },
        "zcr": {
            "times": report.zcr.times(),
            "threshold": report.zcr.threshold,
            "rate": report.zcr.rate,
        },
        "warnings": warnings,
    })
}
