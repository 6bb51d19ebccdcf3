//! Axis scales and tick placement.

/// A numeric axis mapping data values onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Lower limit
    pub min: f32,
    /// Upper limit
    pub max: f32,
    /// Base-2 logarithmic spacing
    pub log: bool,
}

impl Axis {
    /// Linear axis. Degenerate or non-finite limits are widened so the axis
    /// always spans a positive range.
    pub fn linear(min: f32, max: f32) -> Self {
        let (min, max) = if min.is_finite() && max.is_finite() {
            (min.min(max), min.max(max))
        } else {
            (0.0, 1.0)
        };
        let (min, max) = if max - min > f32::EPSILON * max.abs().max(1.0) {
            (min, max)
        } else {
            let pad = (min.abs() * 0.05).max(0.5);
            (min - pad, max + pad)
        };
        Self {
            min,
            max,
            log: false,
        }
    }

    /// Linear axis with limits extended outwards to the nearest ticks
    pub fn linear_nice(min: f32, max: f32, target_ticks: usize) -> Self {
        let axis = Self::linear(min, max);
        let step = nice_step(axis.max - axis.min, target_ticks);
        Self::linear(
            (axis.min / step).floor() * step,
            (axis.max / step).ceil() * step,
        )
    }

    /// Base-2 log axis over strictly positive limits
    pub fn log2(min: f32, max: f32) -> Self {
        let min = if min > 0.0 && min.is_finite() { min } else { 1.0 };
        let max = if max > min && max.is_finite() {
            max
        } else {
            min * 2.0
        };
        Self {
            min,
            max,
            log: true,
        }
    }

    /// Position of `value` along the axis: 0 at `min`, 1 at `max`.
    /// Not clamped; log axes map non-positive values to −∞.
    pub fn fraction(&self, value: f32) -> f32 {
        if self.log {
            (value.log2() - self.min.log2()) / (self.max.log2() - self.min.log2())
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Inverse of [`Axis::fraction`]
    pub fn value_at(&self, fraction: f32) -> f32 {
        if self.log {
            (self.min.log2() + fraction * (self.max.log2() - self.min.log2())).exp2()
        } else {
            self.min + fraction * (self.max - self.min)
        }
    }

    /// Tick positions with their labels
    pub fn ticks(&self, target: usize) -> Vec<(f32, String)> {
        if self.log {
            log2_ticks(self.min, self.max)
                .into_iter()
                .map(|v| (v, format!("{v:.0}")))
                .collect()
        } else {
            let step = nice_step(self.max - self.min, target);
            linear_ticks(self.min, self.max, step)
                .into_iter()
                .map(|v| (v, format_tick(v, step)))
                .collect()
        }
    }
}

/// Step from the 1, 2, 2.5, 5 × 10ⁿ series giving about `target` intervals over `span`
pub fn nice_step(span: f32, target: usize) -> f32 {
    let raw = span.abs() / target.max(1) as f32;
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Multiples of `step` inside [`min`, `max`]
pub fn linear_ticks(min: f32, max: f32, step: f32) -> Vec<f32> {
    if !(step > 0.0) || !(max >= min) {
        return Vec::new();
    }
    let tolerance = step * 1e-4;
    let first = ((min - tolerance) / step).ceil() as i64;
    let last = ((max + tolerance) / step).floor() as i64;
    (first..=last)
        .map(|k| {
            let v = k as f32 * step;
            // avoid "-0"
            if v.abs() < tolerance { 0.0 } else { v }
        })
        .collect()
}

/// Powers of two inside [`min`, `max`]
pub fn log2_ticks(min: f32, max: f32) -> Vec<f32> {
    if !(min > 0.0) || !(max >= min) {
        return Vec::new();
    }
    let first = (min.log2() - 1e-4).ceil() as i32;
    let last = (max.log2() + 1e-4).floor() as i32;
    (first..=last).map(|e| (e as f32).exp2()).collect()
}

/// Label for a tick at `value` with spacing `step`, using just enough decimals
pub fn format_tick(value: f32, step: f32) -> String {
    let mut decimals = 0usize;
    while decimals < 4 {
        let scaled = step * 10f32.powi(decimals as i32);
        if (scaled - scaled.round()).abs() < 1e-3 {
            break;
        }
        decimals += 1;
    }
    format!("{value:.decimals$}")
}

/// Colorbar label in signed whole decibels, e.g. "+0 dB", "-20 dB"
pub fn format_db(value: f32) -> String {
    let value = if value.abs() < 0.5 { 0.0 } else { value };
    format!("{value:+.0} dB")
}

/// Colorbar tick spacing: 10 dB for short ranges, 20 dB otherwise
pub fn db_step(span: f32) -> f32 {
    if span <= 40.0 { 10.0 } else { 20.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 5), 2.0);
        assert!((nice_step(1.0, 4) - 0.25).abs() < 1e-7);
        assert_eq!(nice_step(60.0, 4), 20.0);
        assert_eq!(nice_step(0.0, 4), 1.0);
    }

    #[test]
    fn linear_ticks_cover_range() {
        assert_eq!(linear_ticks(-1.0, 1.0, 0.5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linear_ticks(0.1, 0.9, 0.5), vec![0.5]);
    }

    #[test]
    fn log_ticks_are_powers_of_two() {
        assert_eq!(
            log2_ticks(32.0, 8000.0),
            vec![32.0, 64.0, 128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0]
        );
        assert!(log2_ticks(0.0, 10.0).is_empty());
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(1.5, 0.5), "1.5");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
        assert_eq!(format_tick(200.0, 100.0), "200");
        assert_eq!(format_tick(-0.5, 0.5), "-0.5");
    }

    #[test]
    fn db_labels_are_signed() {
        assert_eq!(format_db(0.0), "+0 dB");
        assert_eq!(format_db(-0.0), "+0 dB");
        assert_eq!(format_db(-20.0), "-20 dB");
        assert_eq!(format_db(10.0), "+10 dB");
    }

    #[test]
    fn degenerate_linear_axis_is_widened() {
        let axis = Axis::linear(3.0, 3.0);
        assert!(axis.max > axis.min);
        let axis = Axis::linear(f32::NAN, 1.0);
        assert_eq!((axis.min, axis.max), (0.0, 1.0));
    }

    #[test]
    fn log_axis_fraction() {
        let axis = Axis::log2(32.0, 8192.0);
        assert_eq!(axis.fraction(32.0), 0.0);
        assert!((axis.fraction(512.0) - 0.5).abs() < 1e-6);
        assert!((axis.value_at(0.5) - 512.0).abs() < 1e-2);
    }

    proptest! {
        #[test]
        fn nice_limits_contain_data(lo in -1000.0f32..1000.0, span in 0.01f32..1000.0) {
            let axis = Axis::linear_nice(lo, lo + span, 5);
            let tol = (lo.abs() + span) * 1e-5;
            prop_assert!(axis.min <= lo + tol);
            prop_assert!(axis.max >= lo + span - tol);
        }

        #[test]
        fn linear_fraction_roundtrips(lo in -100.0f32..100.0, span in 0.1f32..100.0, f in 0.0f32..1.0) {
            let axis = Axis::linear(lo, lo + span);
            let v = axis.value_at(f);
            prop_assert!((axis.fraction(v) - f).abs() < 1e-3);
        }
    }
}
