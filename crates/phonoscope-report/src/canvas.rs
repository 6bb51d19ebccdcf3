//! Vector drawing surface recorded as PDF content-stream operators.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page and y growing upwards.

use std::fmt::Write as _;

use crate::colormap::Rgb;
use crate::font::text_width;

/// Axis-aligned rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Rectangle from its bottom-left corner and size
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink by the given margins
    pub fn inset(&self, left: f32, bottom: f32, right: f32, top: f32) -> Rect {
        Rect::new(
            self.x + left,
            self.y + bottom,
            (self.w - left - right).max(0.0),
            (self.h - bottom - top).max(0.0),
        )
    }
}

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text starts at x
    Left,
    /// Text is centered on x
    Center,
    /// Text ends at x
    Right,
}

/// An RGB raster, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Image {
    /// White image of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![255; width as usize * height as usize * 3],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw interleaved RGB bytes
    pub fn data(&self) -> &[u8] {
        &self.rgb
    }

    /// Set pixel (`x`, `y`), `y` counted from the top. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.rgb[i] = color.0;
        self.rgb[i + 1] = color.1;
        self.rgb[i + 2] = color.2;
    }

    /// Pixel (`x`, `y`)
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb(self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]))
    }
}

/// A page being drawn.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    ops: String,
    images: Vec<Image>,
    /// Opacity levels in percent, one graphics state each
    alphas: Vec<u8>,
}

/// Escape a PDF literal string; non-ASCII characters become `?`.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

impl Canvas {
    /// Empty page of `width` × `height` points
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: String::new(),
            images: Vec::new(),
            alphas: Vec::new(),
        }
    }

    /// Page width in points
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height in points
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Push the graphics state
    pub fn save(&mut self) {
        self.ops.push_str("q\n");
    }

    /// Pop the graphics state
    pub fn restore(&mut self) {
        self.ops.push_str("Q\n");
    }

    /// Stroke color
    pub fn set_stroke(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        let _ = writeln!(self.ops, "{r:.3} {g:.3} {b:.3} RG");
    }

    /// Fill color (also used for text)
    pub fn set_fill(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        let _ = writeln!(self.ops, "{r:.3} {g:.3} {b:.3} rg");
    }

    /// Stroke width in points
    pub fn set_line_width(&mut self, width: f32) {
        let _ = writeln!(self.ops, "{width:.2} w");
    }

    /// Dash pattern in points; empty for solid lines
    pub fn set_dash(&mut self, pattern: &[f32]) {
        let parts: Vec<String> = pattern.iter().map(|v| format!("{v:.2}")).collect();
        let _ = writeln!(self.ops, "[{}] 0 d", parts.join(" "));
    }

    /// Opacity for both strokes and fills, in [0, 1]
    pub fn set_alpha(&mut self, alpha: f32) {
        let percent = (alpha.clamp(0.0, 1.0) * 100.0).round() as u8;
        let idx = match self.alphas.iter().position(|&a| a == percent) {
            Some(idx) => idx,
            None => {
                self.alphas.push(percent);
                self.alphas.len() - 1
            }
        };
        let _ = writeln!(self.ops, "/GS{idx} gs");
    }

    /// Straight line segment
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let _ = writeln!(self.ops, "{x0:.2} {y0:.2} m {x1:.2} {y1:.2} l S");
    }

    /// Open polyline; fewer than two points draws nothing
    pub fn polyline(&mut self, points: &[(f32, f32)]) {
        if points.len() < 2 {
            return;
        }
        self.path(points);
        self.ops.push_str("S\n");
    }

    /// Filled closed polygon; fewer than three points draws nothing
    pub fn fill_polygon(&mut self, points: &[(f32, f32)]) {
        if points.len() < 3 {
            return;
        }
        self.path(points);
        self.ops.push_str("h f\n");
    }

    fn path(&mut self, points: &[(f32, f32)]) {
        for (i, &(x, y)) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let _ = writeln!(self.ops, "{x:.2} {y:.2} {op}");
        }
    }

    /// Rectangle outline
    pub fn stroke_rect(&mut self, r: Rect) {
        let _ = writeln!(self.ops, "{:.2} {:.2} {:.2} {:.2} re S", r.x, r.y, r.w, r.h);
    }

    /// Filled rectangle
    pub fn fill_rect(&mut self, r: Rect) {
        let _ = writeln!(self.ops, "{:.2} {:.2} {:.2} {:.2} re f", r.x, r.y, r.w, r.h);
    }

    /// Restrict drawing to `r` until the enclosing [`Canvas::restore`]
    pub fn clip(&mut self, r: Rect) {
        let _ = writeln!(self.ops, "{:.2} {:.2} {:.2} {:.2} re W n", r.x, r.y, r.w, r.h);
    }

    /// Helvetica text with its baseline at `y`
    pub fn text(&mut self, x: f32, y: f32, size: f32, text: &str, align: Align) {
        let width = text_width(text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let _ = writeln!(
            self.ops,
            "BT /F1 {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
            escape_text(text)
        );
    }

    /// Text rotated 90° counter-clockwise, centered on (`x`, `y`)
    pub fn text_vertical(&mut self, x: f32, y: f32, size: f32, text: &str) {
        let width = text_width(text, size);
        let y = y - width / 2.0;
        let _ = writeln!(
            self.ops,
            "BT /F1 {size:.1} Tf 0 1 -1 0 {x:.2} {y:.2} Tm ({}) Tj ET",
            escape_text(text)
        );
    }

    /// Paint `image` stretched over `r`
    pub fn image(&mut self, image: Image, r: Rect) {
        let idx = self.images.len();
        self.images.push(image);
        let _ = writeln!(
            self.ops,
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{idx} Do Q",
            r.w, r.h, r.x, r.y
        );
    }

    /// Content stream so far
    pub fn content(&self) -> &str {
        &self.ops
    }

    /// Images placed so far, in resource order
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Opacity levels in percent, in resource order
    pub fn alphas(&self) -> &[u8] {
        &self.alphas
    }
}
