//! Single-page PDF voice reports.
//!
//! [`compose`] lays out the four analysis panels of an
//! [`AnalysisReport`] on a fixed 12 × 8 inch page:
//!
//! | position     | panel                                            |
//! |--------------|--------------------------------------------------|
//! | top left     | waveform envelope, pitch and intensity contours  |
//! | top right    | zero-crossing rate                               |
//! | bottom left  | wideband spectrogram (jet)                       |
//! | bottom right | narrowband spectrogram (magma)                   |
//!
//! Axes, text and curves are vector graphics; spectrograms are embedded as
//! RGB images whose size depends on the plot area, never on the recording
//! length.
//!
//! # Example
//!
//! ```rust,no_run
//! use phonoscope_analysis::{AnalysisParams, NoopObserver, SampleBuffer, analyze};
//! use phonoscope_report::{ReportMeta, compose};
//!
//! let buffer = SampleBuffer::new(vec![0.0; 16000], 16000).unwrap();
//! let params = AnalysisParams::default();
//! let report = analyze(&buffer, &params, &params.tracker(), &NoopObserver).unwrap();
//!
//! let doc = compose(&buffer, &report, &ReportMeta::new("p001", "20251231")).unwrap();
//! doc.write_to_dir(std::path::Path::new("reports")).unwrap();
//! ```

pub mod axes;
pub mod canvas;
pub mod colormap;
mod error;
pub mod font;
pub mod panels;
pub mod pdf;
pub mod raster;

use std::fs;
use std::path::{Path, PathBuf};

use phonoscope_analysis::{AnalysisReport, SampleBuffer};

pub use canvas::{Align, Canvas, Image, Rect};
pub use colormap::{Colormap, Rgb};
pub use error::RenderError;
pub use panels::{PAGE_HEIGHT, PAGE_WIDTH};
pub use pdf::{DocumentInfo, write_pdf};

/// MIME type of a composed report.
pub const MIME_TYPE: &str = "application/pdf";

/// Identifiers used to name the report artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    /// Patient identifier
    pub patient_id: String,
    /// Recording date, free-form (e.g. "20251231")
    pub date: String,
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

impl ReportMeta {
    /// Metadata from a patient id and date string
    pub fn new(patient_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            date: date.into(),
        }
    }

    /// `{patient_id}_{date}.pdf` with path separators replaced by `_`.
    ///
    /// Empty (or whitespace-only) identifiers are rejected.
    pub fn file_name(&self) -> Result<String, RenderError> {
        let id = sanitize(&self.patient_id);
        let date = sanitize(&self.date);
        if id.is_empty() {
            return Err(RenderError::InvalidMeta("patient id is empty".to_string()));
        }
        if date.is_empty() {
            return Err(RenderError::InvalidMeta("date is empty".to_string()));
        }
        Ok(format!("{id}_{date}.pdf"))
    }
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    file_name: String,
}

impl Document {
    /// Serialized PDF
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the serialized PDF
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Artifact name, `{patient_id}_{date}.pdf`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Always [`MIME_TYPE`]
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Write to `dir/{file_name}`, creating `dir` if needed
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        let path = dir.join(&self.file_name);
        fs::create_dir_all(dir).map_err(|source| RenderError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        fs::write(&path, &self.bytes).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "report written");
        Ok(path)
    }
}

/// Lay out `report` for `buffer` as a one-page PDF.
///
/// Nothing is written to disk; the returned [`Document`] is complete.
pub fn compose(
    buffer: &SampleBuffer,
    report: &AnalysisReport,
    meta: &ReportMeta,
) -> Result<Document, RenderError> {
    let file_name = meta.file_name()?;
    let duration = buffer.duration_secs() as f32;

    let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    let [top_left, top_right, bottom_left, bottom_right] = panels::cells();
    panels::waveform(
        &mut canvas,
        top_left,
        buffer,
        &report.pitch,
        &report.energy,
        report.pitch_fell_back(),
    );
    panels::zero_crossings(&mut canvas, top_right, &report.zcr, duration);
    panels::spectrogram(
        &mut canvas,
        bottom_left,
        panels::WIDEBAND_TITLE,
        &report.wideband,
        Colormap::Jet,
        duration,
    )?;
    panels::spectrogram(
        &mut canvas,
        bottom_right,
        panels::NARROWBAND_TITLE,
        &report.narrowband,
        Colormap::Magma,
        duration,
    )?;

    let title = format!("Voice report {} {}", meta.patient_id.trim(), meta.date.trim());
    let bytes = write_pdf(
        &canvas,
        DocumentInfo {
            title: &title,
            producer: concat!("phonoscope ", env!("CARGO_PKG_VERSION")),
        },
    )?;
    tracing::debug!(
        file = %file_name,
        bytes = bytes.len(),
        images = canvas.images().len(),
        "composed report"
    );

    Ok(Document { bytes, file_name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_replaces_separators() {
        let meta = ReportMeta::new("ward/3\\bed", "2025/12/31");
        assert_eq!(meta.file_name().unwrap(), "ward_3_bed_2025_12_31.pdf");
    }

    #[test]
    fn default_style_name() {
        let meta = ReportMeta::new("test_patient", "20251231");
        assert_eq!(meta.file_name().unwrap(), "test_patient_20251231.pdf");
    }

    #[test]
    fn empty_identifiers_rejected() {
        assert!(matches!(
            ReportMeta::new("  ", "20251231").file_name(),
            Err(RenderError::InvalidMeta(_))
        ));
        assert!(matches!(
            ReportMeta::new("p1", "").file_name(),
            Err(RenderError::InvalidMeta(_))
        ));
    }
}
