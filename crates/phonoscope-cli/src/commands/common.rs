//! Shared CLI helpers used across multiple commands.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use phonoscope_analysis::{
    AnalysisObserver, AnalysisParams, AnalysisReport, MAX_THRESHOLD, SampleBuffer, analyze,
};
use phonoscope_config::{PitchBound, Settings};
use phonoscope_io::load_audio;

/// Input file and the analysis flags shared by `report` and `analyze`.
#[derive(Args)]
pub struct AnalysisArgs {
    /// Input audio file (WAV, MP3, OGG, FLAC, M4A)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Amplitude below which samples are silenced before counting zero crossings
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Lowest pitch searched, in Hz or as a note name (e.g. 65.4, C2)
    #[arg(long)]
    pub fmin: Option<PitchBound>,

    /// Highest pitch searched, in Hz or as a note name (e.g. 1046.5, C6)
    #[arg(long)]
    pub fmax: Option<PitchBound>,

    /// Settings file (default: the user config file if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl AnalysisArgs {
    /// Discovered settings with command-line flags applied on top.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::discover(self.config.as_deref())
            .context("failed to load settings")?;

        if let Some(threshold) = self.threshold {
            if !(0.0..=MAX_THRESHOLD).contains(&threshold) {
                anyhow::bail!("--threshold must be between 0.0 and {MAX_THRESHOLD}, got {threshold}");
            }
            settings.analysis.threshold = threshold;
        }
        if let Some(fmin) = &self.fmin {
            settings.analysis.fmin = fmin.clone();
        }
        if let Some(fmax) = &self.fmax {
            settings.analysis.fmax = fmax.clone();
        }
        Ok(settings)
    }

    /// Decode the input to a mono buffer and announce its length on stderr.
    pub fn load(&self) -> anyhow::Result<SampleBuffer> {
        let audio = load_audio(&self.input)
            .with_context(|| format!("failed to load {}", self.input.display()))?;
        eprintln!(
            "Loaded: {:.2}s / {}Hz",
            audio.duration_secs(),
            audio.sample_rate
        );
        let buffer = SampleBuffer::new(audio.samples, audio.sample_rate)?;
        Ok(buffer)
    }
}

/// Run the pipeline, turning parameter errors into user-facing messages.
pub fn run_pipeline(
    buffer: &SampleBuffer,
    params: &AnalysisParams,
    observer: &dyn AnalysisObserver,
) -> anyhow::Result<AnalysisReport> {
    let tracker = params.tracker();
    let report = analyze(buffer, params, &tracker, observer).context("invalid analysis parameters")?;
    Ok(report)
}

/// Print non-fatal warnings to stderr.
pub fn print_warnings(report: &AnalysisReport) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}
