//! Spectrogram rasterization onto a log-frequency image.
//!
//! The image covers the plot area at no more than [`RASTER_DPI`]; its pixel
//! size depends only on that area and on the spectrogram's own resolution,
//! so a long recording never grows the page.

use phonoscope_analysis::Spectrogram;

use crate::axes::Axis;
use crate::canvas::Image;
use crate::colormap::Colormap;
use crate::error::RenderError;

/// Upper bound on raster resolution.
pub const RASTER_DPI: f32 = 300.0;

/// Lowest frequency shown on spectrogram axes (Hz).
pub const LOG_FLOOR_HZ: f32 = 32.0;

/// Frequency axis for a spectrogram: [`LOG_FLOOR_HZ`] (or the first non-DC
/// bin, whichever is higher) up to Nyquist.
pub fn frequency_axis(spec: &Spectrogram) -> Axis {
    let nyquist = spec.max_frequency();
    let floor = LOG_FLOOR_HZ.max(spec.bin_to_freq(1)).min(nyquist / 2.0);
    Axis::log2(floor, nyquist)
}

/// Color limits: the finite value range, widened by 1 dB when flat
pub fn color_range(spec: &Spectrogram) -> (f32, f32) {
    match spec.range() {
        Some((lo, hi)) if hi - lo > 1e-3 => (lo, hi),
        Some((_, hi)) => (hi - 1.0, hi),
        None => (-1.0, 0.0),
    }
}

fn pixels(points: f32, limit: usize) -> u32 {
    let at_dpi = (points / 72.0 * RASTER_DPI).round().max(1.0) as usize;
    at_dpi.min(limit.max(1)) as u32
}

/// Paint `spec` for a plot area of `width_pt` × `height_pt` points.
///
/// Columns sample the nearest frame in time over `duration` seconds; rows
/// sample the nearest bin on the log-frequency `axis`, top row highest.
pub fn spectrogram_image(
    panel: &'static str,
    spec: &Spectrogram,
    colormap: Colormap,
    axis: Axis,
    duration: f32,
    (width_pt, height_pt): (f32, f32),
) -> Result<Image, RenderError> {
    if spec.num_frames == 0 || spec.num_bins == 0 {
        return Err(RenderError::EmptySpectrogram {
            panel,
            frames: spec.num_frames,
            bins: spec.num_bins,
        });
    }
    let width = pixels(width_pt, spec.num_frames);
    let height = pixels(height_pt, spec.num_bins);
    let (lo, hi) = color_range(spec);
    let lut = colormap.lut();

    let frames_per_sec = spec.sample_rate as f32 / spec.hop_size as f32;
    let columns: Vec<usize> = (0..width)
        .map(|x| {
            let t = (x as f32 + 0.5) / width as f32 * duration;
            ((t * frames_per_sec).round() as usize).min(spec.num_frames - 1)
        })
        .collect();
    let bin_hz = spec.bin_to_freq(1);

    let mut image = Image::new(width, height);
    for y in 0..height {
        let fraction = 1.0 - (y as f32 + 0.5) / height as f32;
        let freq = axis.value_at(fraction);
        let bin = ((freq / bin_hz).round() as usize).min(spec.num_bins - 1);
        let Some(row) = spec.row(bin) else {
            continue;
        };
        for (x, &frame) in columns.iter().enumerate() {
            let value = row[frame];
            let t = if value.is_finite() {
                (value - lo) / (hi - lo)
            } else {
                0.0
            };
            let idx = (t.clamp(0.0, 1.0) * 255.0).round() as usize;
            image.set(x as u32, y, lut[idx]);
        }
    }
    Ok(image)
}

/// Vertical gradient for a colorbar, top row at the high end
pub fn colorbar_image(colormap: Colormap) -> Image {
    let lut = colormap.lut();
    let mut image = Image::new(1, lut.len() as u32);
    for (i, &color) in lut.iter().rev().enumerate() {
        image.set(0, i as u32, color);
    }
    image
}
