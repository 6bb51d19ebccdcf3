//! Colormaps for spectrogram images.

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// White
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Waveform blue
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    /// Pitch contour
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    /// Intensity contour
    pub const CYAN: Rgb = Rgb(0, 191, 191);
    /// Grid lines
    pub const LIGHT_GREY: Rgb = Rgb(220, 220, 220);
    /// Secondary text
    pub const GREY: Rgb = Rgb(90, 90, 90);

    /// Components scaled to [0, 1] for PDF color operators
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

/// Magma anchors (matplotlib) at evenly spaced positions, plus one extra
/// anchor at 15/16 where the map bends towards yellow.
const MAGMA: [(f32, Rgb); 10] = [
    (0.0, Rgb(0, 0, 4)),
    (0.125, Rgb(20, 14, 54)),
    (0.25, Rgb(59, 15, 112)),
    (0.375, Rgb(100, 26, 128)),
    (0.5, Rgb(140, 41, 129)),
    (0.625, Rgb(183, 55, 121)),
    (0.75, Rgb(222, 73, 104)),
    (0.875, Rgb(247, 112, 92)),
    (0.9375, Rgb(254, 159, 109)),
    (1.0, Rgb(252, 253, 191)),
];

/// Colormap used to paint a spectrogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Blue → cyan → yellow → red
    Jet,
    /// Black → purple → orange → pale yellow
    Magma,
}

impl Colormap {
    /// Color at position `t` in [0, 1] (clamped; NaN maps to 0)
    pub fn map(self, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Jet => jet(t),
            Colormap::Magma => interpolate(&MAGMA, t),
        }
    }

    /// 256-entry lookup table
    pub fn lut(self) -> Vec<Rgb> {
        (0..256).map(|i| self.map(i as f32 / 255.0)).collect()
    }
}

fn jet(t: f32) -> Rgb {
    let channel = |center: f32| {
        let v = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb(channel(3.0), channel(2.0), channel(1.0))
}

fn interpolate(anchors: &[(f32, Rgb)], t: f32) -> Rgb {
    let upper = anchors
        .iter()
        .position(|&(pos, _)| pos >= t)
        .unwrap_or(anchors.len() - 1)
        .max(1);
    let (p0, c0) = anchors[upper - 1];
    let (p1, c1) = anchors[upper];
    let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
    let mix = |a: u8, b: u8| (f32::from(a) + f * (f32::from(b) - f32::from(a))).round() as u8;
    Rgb(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        assert_eq!(Colormap::Jet.map(0.0), Rgb(0, 0, 128));
        assert_eq!(Colormap::Jet.map(0.5), Rgb(128, 255, 128));
        assert_eq!(Colormap::Jet.map(1.0), Rgb(128, 0, 0));
    }

    #[test]
    fn magma_hits_anchors() {
        assert_eq!(Colormap::Magma.map(0.0), Rgb(0, 0, 4));
        assert_eq!(Colormap::Magma.map(0.5), Rgb(140, 41, 129));
        assert_eq!(Colormap::Magma.map(1.0), Rgb(252, 253, 191));
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Colormap::Magma.map(-3.0), Colormap::Magma.map(0.0));
        assert_eq!(Colormap::Jet.map(7.0), Colormap::Jet.map(1.0));
        assert_eq!(Colormap::Jet.map(f32::NAN), Colormap::Jet.map(0.0));
    }

    #[test]
    fn magma_brightens_monotonically() {
        let lut = Colormap::Magma.lut();
        let luma = |c: Rgb| 0.2126 * f32::from(c.0) + 0.7152 * f32::from(c.1) + 0.0722 * f32::from(c.2);
        for pair in lut.windows(2) {
            assert!(luma(pair[1]) + 1.0 >= luma(pair[0]));
        }
    }
}
