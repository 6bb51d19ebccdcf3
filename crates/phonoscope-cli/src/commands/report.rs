//! Full pipeline plus the one-page PDF report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use phonoscope_report::{ReportMeta, compose};

use super::common::{AnalysisArgs, print_warnings, run_pipeline};
use crate::progress::StageSpinner;

/// Analyze a recording and write `{patient_id}_{date}.pdf`.
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Patient identifier used in the report file name
    #[arg(long)]
    pub patient_id: Option<String>,

    /// Date string used in the report file name (e.g. 20251231)
    #[arg(long)]
    pub date: Option<String>,

    /// Directory to write the report to (default: current directory)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output_dir: Option<PathBuf>,

    /// Write the PDF to standard output instead of a file
    #[arg(long)]
    pub stdout: bool,
}

/// Run the report command.
pub fn run(args: ReportArgs) -> anyhow::Result<()> {
    let mut settings = args.analysis.settings()?;
    if let Some(patient_id) = args.patient_id {
        settings.report.patient_id = patient_id;
    }
    if let Some(date) = args.date {
        settings.report.date = date;
    }
    let params = settings.to_params()?;
    let meta = ReportMeta::new(settings.report.patient_id, settings.report.date);
    // reject bad identifiers before the expensive part
    meta.file_name()?;

    let buffer = args.analysis.load()?;

    let spinner = StageSpinner::new();
    let report = run_pipeline(&buffer, &params, &spinner);
    let doc = report.and_then(|report| {
        spinner.set_message("composing report");
        let doc = compose(&buffer, &report, &meta).context("failed to compose report")?;
        Ok((report, doc))
    });
    spinner.finish();
    let (report, doc) = doc?;
    print_warnings(&report);

    if args.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(&doc.into_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let dir = args
        .output_dir
        .or(settings.report.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = doc.write_to_dir(&dir)?;
    println!("Report written to {}", path.display());
    Ok(())
}
