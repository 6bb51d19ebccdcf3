//! The four report panels and their shared axis furniture.

use phonoscope_analysis::energy::peak;
use phonoscope_analysis::{EnergyTrack, PitchTrack, SampleBuffer, Spectrogram, ZcrTrack};

use crate::axes::{Axis, db_step, format_db, linear_ticks};
use crate::canvas::{Align, Canvas, Rect};
use crate::colormap::{Colormap, Rgb};
use crate::error::RenderError;
use crate::font::text_width;
use crate::raster::{color_range, colorbar_image, frequency_axis, spectrogram_image};

/// Page width in points (12 in).
pub const PAGE_WIDTH: f32 = 864.0;
/// Page height in points (8 in).
pub const PAGE_HEIGHT: f32 = 576.0;

const TITLE_SIZE: f32 = 11.0;
const LABEL_SIZE: f32 = 8.5;
const TICK_SIZE: f32 = 7.5;
const TICK_LEN: f32 = 3.5;
const AXIS_WIDTH: f32 = 0.8;
const CURVE_WIDTH: f32 = 1.5;
const CELL_MARGIN: f32 = 6.0;

pub(crate) const WAVEFORM_TITLE: &str = "Waveform + Pitch + Intensity";
pub(crate) const ZCR_TITLE: &str = "Zero Crossing Rate";
pub(crate) const WIDEBAND_TITLE: &str = "Wideband Spectrogram";
pub(crate) const NARROWBAND_TITLE: &str = "Narrowband Spectrogram";

/// A plot area together with the axes mapping data into it.
#[derive(Debug, Clone, Copy)]
pub struct Plot {
    /// Plot area in page points
    pub area: Rect,
    /// Horizontal axis
    pub x: Axis,
    /// Vertical axis
    pub y: Axis,
}

impl Plot {
    /// Page position of a data point
    pub fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.area.x + self.x.fraction(x) * self.area.w,
            self.area.y + self.y.fraction(y) * self.area.h,
        )
    }
}

/// The 2×2 grid, row-major from the top-left
pub fn cells() -> [Rect; 4] {
    let w = PAGE_WIDTH / 2.0;
    let h = PAGE_HEIGHT / 2.0;
    let cell = |col: f32, row: f32| {
        Rect::new(col * w, (1.0 - row) * h, w, h).inset(
            CELL_MARGIN,
            CELL_MARGIN,
            CELL_MARGIN,
            CELL_MARGIN,
        )
    };
    [cell(0.0, 0.0), cell(1.0, 0.0), cell(0.0, 1.0), cell(1.0, 1.0)]
}

fn in_unit(fraction: f32) -> bool {
    (-1e-4..=1.0 + 1e-4).contains(&fraction)
}

/// Box, ticks on the bottom and left edges, title and axis labels
fn draw_frame(canvas: &mut Canvas, plot: &Plot, title: &str, x_label: &str, y_label: &str) {
    let area = plot.area;
    canvas.set_stroke(Rgb::BLACK);
    canvas.set_fill(Rgb::BLACK);
    canvas.set_line_width(AXIS_WIDTH);
    canvas.set_dash(&[]);
    canvas.stroke_rect(area);

    for (value, label) in plot.x.ticks(6) {
        let f = plot.x.fraction(value);
        if !in_unit(f) {
            continue;
        }
        let px = area.x + f * area.w;
        canvas.line(px, area.y, px, area.y - TICK_LEN);
        canvas.text(px, area.y - TICK_LEN - TICK_SIZE - 1.0, TICK_SIZE, &label, Align::Center);
    }
    for (value, label) in plot.y.ticks(5) {
        let f = plot.y.fraction(value);
        if !in_unit(f) {
            continue;
        }
        let py = area.y + f * area.h;
        canvas.line(area.x, py, area.x - TICK_LEN, py);
        canvas.text(
            area.x - TICK_LEN - 2.0,
            py - TICK_SIZE * 0.35,
            TICK_SIZE,
            &label,
            Align::Right,
        );
    }

    canvas.text(area.x + area.w / 2.0, area.top() + 8.0, TITLE_SIZE, title, Align::Center);
    if !x_label.is_empty() {
        canvas.text(area.x + area.w / 2.0, area.y - 28.0, LABEL_SIZE, x_label, Align::Center);
    }
    if !y_label.is_empty() {
        canvas.text_vertical(area.x - 38.0, area.y + area.h / 2.0, LABEL_SIZE, y_label);
    }
}

/// Ticks and label on the right edge for a secondary axis
fn draw_right_axis(canvas: &mut Canvas, area: Rect, axis: &Axis, label: &str) {
    canvas.set_stroke(Rgb::BLACK);
    canvas.set_fill(Rgb::BLACK);
    canvas.set_line_width(AXIS_WIDTH);
    canvas.set_dash(&[]);
    let mut widest: f32 = 0.0;
    for (value, text) in axis.ticks(5) {
        let f = axis.fraction(value);
        if !in_unit(f) {
            continue;
        }
        let py = area.y + f * area.h;
        canvas.line(area.right(), py, area.right() + TICK_LEN, py);
        canvas.text(
            area.right() + TICK_LEN + 2.0,
            py - TICK_SIZE * 0.35,
            TICK_SIZE,
            &text,
            Align::Left,
        );
        widest = widest.max(text_width(&text, TICK_SIZE));
    }
    let x = area.right() + TICK_LEN + 2.0 + widest + LABEL_SIZE;
    canvas.text_vertical(x, area.y + area.h / 2.0, LABEL_SIZE, label);
}

/// Min/max of each of `columns` equal slices of `samples`
pub fn envelope(samples: &[f32], columns: usize) -> Vec<(f32, f32)> {
    let columns = columns.min(samples.len());
    (0..columns)
        .map(|c| {
            let start = c * samples.len() / columns;
            let end = ((c + 1) * samples.len() / columns).max(start + 1);
            samples[start..end]
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                    (lo.min(s), hi.max(s))
                })
        })
        .collect()
}

/// Runs of consecutive voiced frames as (time, Hz) polylines
pub fn voiced_segments(pitch: &PitchTrack) -> Vec<Vec<(f32, f32)>> {
    let times = pitch.times();
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (t, f) in times.iter().zip(&pitch.frequency) {
        match f {
            Some(hz) if hz.is_finite() => current.push((*t, *hz)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Shared secondary range over voiced pitch (Hz) and intensity (dB)
fn secondary_axis(pitch: &PitchTrack, energy: &EnergyTrack) -> Axis {
    let values = pitch
        .frequency
        .iter()
        .flatten()
        .chain(energy.db.iter())
        .copied()
        .filter(|v| v.is_finite());
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        Axis::linear_nice(-60.0, 0.0, 5)
    } else {
        Axis::linear_nice(lo, hi, 5)
    }
}

fn draw_legend(canvas: &mut Canvas, area: Rect) {
    let entries: [(&str, Rgb, &[f32]); 2] = [
        ("Pitch", Rgb::MAGENTA, &[]),
        ("Intensity", Rgb::CYAN, &[4.0, 2.0]),
    ];
    let line_len = 16.0;
    let row_h = LABEL_SIZE + 4.0;
    let text_w = entries
        .iter()
        .map(|(label, _, _)| text_width(label, LABEL_SIZE))
        .fold(0.0f32, f32::max);
    let w = line_len + text_w + 14.0;
    let h = row_h * entries.len() as f32 + 6.0;
    let frame = Rect::new(area.right() - w - 6.0, area.top() - h - 6.0, w, h);

    canvas.save();
    canvas.set_alpha(0.8);
    canvas.set_fill(Rgb::WHITE);
    canvas.fill_rect(frame);
    canvas.restore();
    canvas.set_stroke(Rgb::LIGHT_GREY);
    canvas.set_line_width(0.5);
    canvas.set_dash(&[]);
    canvas.stroke_rect(frame);

    for (i, (label, color, dash)) in entries.iter().enumerate() {
        let y = frame.top() - 3.0 - row_h * (i as f32 + 0.5);
        canvas.set_stroke(*color);
        canvas.set_line_width(CURVE_WIDTH);
        canvas.set_dash(dash);
        canvas.line(frame.x + 4.0, y, frame.x + 4.0 + line_len, y);
        canvas.set_fill(Rgb::BLACK);
        canvas.text(
            frame.x + 8.0 + line_len,
            y - LABEL_SIZE * 0.35,
            LABEL_SIZE,
            label,
            Align::Left,
        );
    }
    canvas.set_dash(&[]);
}

/// Panel 1: waveform envelope with pitch and intensity on a secondary axis
pub fn waveform(
    canvas: &mut Canvas,
    cell: Rect,
    buffer: &SampleBuffer,
    pitch: &PitchTrack,
    energy: &EnergyTrack,
    pitch_missing: bool,
) {
    let area = cell.inset(52.0, 36.0, 58.0, 24.0);
    let duration = buffer.duration_secs() as f32;
    let level = peak(buffer.samples());
    let amplitude = if level > 0.0 && level.is_finite() {
        level * 1.1
    } else {
        1.0
    };
    let plot = Plot {
        area,
        x: Axis::linear(0.0, duration),
        y: Axis::linear(-amplitude, amplitude),
    };
    let secondary = Plot {
        y: secondary_axis(pitch, energy),
        ..plot
    };

    let columns = (area.w * 2.0) as usize;
    let env = envelope(buffer.samples(), columns);
    let step = area.w / env.len().max(1) as f32;
    let mut outline = Vec::with_capacity(env.len() * 4);
    for (c, &(_, hi)) in env.iter().enumerate() {
        let (_, y) = plot.point(0.0, hi);
        outline.push((area.x + c as f32 * step, y));
        outline.push((area.x + (c + 1) as f32 * step, y));
    }
    for (c, &(lo, _)) in env.iter().enumerate().rev() {
        let (_, y) = plot.point(0.0, lo);
        outline.push((area.x + (c + 1) as f32 * step, y));
        outline.push((area.x + c as f32 * step, y));
    }

    canvas.save();
    canvas.clip(area);
    canvas.set_alpha(0.5);
    canvas.set_fill(Rgb::BLUE);
    canvas.fill_polygon(&outline);
    canvas.restore();

    canvas.save();
    canvas.clip(area);
    canvas.set_line_width(CURVE_WIDTH);
    canvas.set_stroke(Rgb::MAGENTA);
    for segment in voiced_segments(pitch) {
        let points: Vec<(f32, f32)> = segment
            .iter()
            .map(|&(t, hz)| secondary.point(t, hz))
            .collect();
        canvas.polyline(&points);
    }
    canvas.set_stroke(Rgb::CYAN);
    canvas.set_dash(&[4.0, 2.0]);
    let intensity: Vec<(f32, f32)> = energy
        .times()
        .into_iter()
        .zip(&energy.db)
        .filter(|(_, db)| db.is_finite())
        .map(|(t, &db)| secondary.point(t, db))
        .collect();
    canvas.polyline(&intensity);
    canvas.restore();

    draw_frame(canvas, &plot, WAVEFORM_TITLE, "Time (s)", "Amplitude");
    draw_right_axis(canvas, area, &secondary.y, "Frequency (Hz) / Intensity (dB)");
    draw_legend(canvas, area);
    if pitch_missing {
        canvas.set_fill(Rgb::GREY);
        canvas.text(area.x + 4.0, area.y + 4.0, TICK_SIZE, "pitch unavailable", Align::Left);
    }
}

/// Panel 2: zero-crossing rate over time
pub fn zero_crossings(canvas: &mut Canvas, cell: Rect, zcr: &ZcrTrack, duration: f32) {
    let area = cell.inset(52.0, 36.0, 20.0, 24.0);
    let top = zcr
        .rate
        .iter()
        .copied()
        .filter(|r| r.is_finite())
        .fold(0.0f32, f32::max);
    let plot = Plot {
        area,
        x: Axis::linear(0.0, duration),
        y: Axis::linear_nice(0.0, if top > 0.0 { top } else { 1.0 }, 4),
    };
    let points: Vec<(f32, f32)> = zcr
        .times()
        .into_iter()
        .zip(&zcr.rate)
        .map(|(t, &r)| plot.point(t, r))
        .collect();

    canvas.save();
    canvas.clip(area);
    canvas.set_stroke(Rgb::BLACK);
    canvas.set_line_width(CURVE_WIDTH);
    canvas.polyline(&points);
    canvas.restore();

    draw_frame(canvas, &plot, ZCR_TITLE, "Time (s)", "");
}

/// Panels 3 and 4: a log-frequency spectrogram with its colorbar
pub fn spectrogram(
    canvas: &mut Canvas,
    cell: Rect,
    title: &'static str,
    spec: &Spectrogram,
    colormap: Colormap,
    duration: f32,
) -> Result<(), RenderError> {
    let area = cell.inset(52.0, 36.0, 74.0, 24.0);
    let freq = frequency_axis(spec);
    let image = spectrogram_image(title, spec, colormap, freq, duration, (area.w, area.h))?;
    canvas.image(image, area);

    let plot = Plot {
        area,
        x: Axis::linear(0.0, duration),
        y: freq,
    };
    draw_frame(canvas, &plot, title, "Time (s)", "Hz");

    let bar = Rect::new(area.right() + 10.0, area.y, 10.0, area.h);
    canvas.image(colorbar_image(colormap), bar);
    canvas.set_stroke(Rgb::BLACK);
    canvas.set_line_width(AXIS_WIDTH);
    canvas.stroke_rect(bar);

    let (lo, hi) = color_range(spec);
    for value in linear_ticks(lo, hi, db_step(hi - lo)) {
        let y = bar.y + (value - lo) / (hi - lo) * bar.h;
        canvas.line(bar.right(), y, bar.right() + TICK_LEN, y);
        canvas.text(
            bar.right() + TICK_LEN + 2.0,
            y - TICK_SIZE * 0.35,
            TICK_SIZE,
            &format_db(value),
            Align::Left,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonoscope_analysis::{FrameConfig, Padding};

    #[test]
    fn cells_tile_the_page() {
        let [tl, tr, bl, br] = cells();
        assert!(tl.y > bl.y);
        assert!(tr.x > tl.x);
        assert_eq!(br.x, tr.x);
        assert!(tr.right() <= PAGE_WIDTH);
        assert!(tl.top() <= PAGE_HEIGHT);
        assert!(bl.y >= 0.0);
    }

    #[test]
    fn envelope_tracks_extremes() {
        let samples = [0.0, 1.0, -1.0, 0.5, -0.25, 0.0];
        assert_eq!(envelope(&samples, 2), vec![(-1.0, 1.0), (-0.25, 0.5)]);
        // more columns than samples
        assert_eq!(envelope(&[0.3, -0.3], 10).len(), 2);
        assert!(envelope(&[], 10).is_empty());
    }

    #[test]
    fn unvoiced_frames_split_segments() {
        let grid = FrameConfig {
            frame_length: 4,
            hop_length: 2,
        }
        .grid(8, 100, Padding::Zeros);
        let mut track = PitchTrack::unvoiced(grid);
        assert_eq!(track.len(), 5);
        track.frequency[0] = Some(100.0);
        track.frequency[1] = Some(110.0);
        track.frequency[3] = Some(120.0);
        let segments = voiced_segments(&track);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1][0].1, 120.0);
    }

    #[test]
    fn plot_maps_corners() {
        let plot = Plot {
            area: Rect::new(10.0, 20.0, 100.0, 50.0),
            x: Axis::linear(0.0, 2.0),
            y: Axis::linear(-1.0, 1.0),
        };
        assert_eq!(plot.point(0.0, -1.0), (10.0, 20.0));
        assert_eq!(plot.point(2.0, 1.0), (110.0, 70.0));
    }
}
