//! Amplitude to decibel conversion with a clipped dynamic range.

/// Smallest amplitude considered above silence (−100 dB re 1.0).
pub const AMIN: f32 = 1e-5;

/// Decibel scale: `20·log10(max(x, AMIN) / reference)`, floored at
/// `top_db` below the maximum of the converted block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbScale {
    /// Amplitude mapped to 0 dB.
    pub reference: f32,
    /// Dynamic range kept below the block maximum.
    pub top_db: f32,
}

impl Default for DbScale {
    fn default() -> Self {
        Self {
            reference: 1.0,
            top_db: 60.0,
        }
    }
}

impl DbScale {
    /// Scale with an absolute 1.0 reference and the given range.
    pub fn with_top_db(top_db: f32) -> Self {
        Self {
            top_db,
            ..Self::default()
        }
    }

    /// Convert amplitudes in place.
    ///
    /// The floor is `max − top_db` over the whole block. A block whose
    /// maximum never exceeds `AMIN` carries no level information, so it is
    /// anchored at the reference level instead and every value lands on
    /// `−top_db`.
    pub fn apply(&self, values: &mut [f32]) {
        let ref_db = 20.0 * self.reference.abs().max(AMIN).log10();
        let silence_db = 20.0 * AMIN.log10() - ref_db;

        let mut peak = f32::NEG_INFINITY;
        for v in values.iter_mut() {
            *v = 20.0 * v.max(AMIN).log10() - ref_db;
            peak = peak.max(*v);
        }

        let floor = if peak <= silence_db {
            -self.top_db
        } else {
            peak - self.top_db
        };
        for v in values.iter_mut() {
            *v = v.max(floor);
        }
    }

    /// Convert amplitudes into a new vector.
    pub fn to_db(&self, values: &[f32]) -> Vec<f32> {
        let mut out = values.to_vec();
        self.apply(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_amplitude_is_zero_db() {
        let db = DbScale::default().to_db(&[1.0, 0.1, 0.01]);
        assert!((db[0] - 0.0).abs() < 1e-5);
        assert!((db[1] + 20.0).abs() < 1e-4);
        assert!((db[2] + 40.0).abs() < 1e-4);
    }

    #[test]
    fn floors_at_top_db_below_peak() {
        let db = DbScale::default().to_db(&[0.5, 1e-4, 0.0]);
        let peak = db[0];
        assert!((db[1] - (peak - 60.0)).abs() < 1e-4);
        assert!((db[2] - (peak - 60.0)).abs() < 1e-4);
    }

    #[test]
    fn silence_anchors_at_reference() {
        let db = DbScale::default().to_db(&[0.0; 8]);
        assert!(db.iter().all(|&v| v == -60.0), "{db:?}");
    }

    #[test]
    fn custom_range() {
        let db = DbScale::with_top_db(80.0).to_db(&[1.0, 0.0]);
        assert!((db[1] + 80.0).abs() < 1e-4);
    }
}
