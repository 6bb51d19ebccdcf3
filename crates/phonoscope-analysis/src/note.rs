//! Scientific pitch notation (A4 = 440 Hz, equal temperament)

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Frequency in Hz of a MIDI note number (may be fractional)
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * 2f32.powf((midi - 69.0) / 12.0)
}

/// MIDI note number of a frequency in Hz (fractional)
pub fn hz_to_midi(hz: f32) -> f32 {
    69.0 + 12.0 * (hz / 440.0).log2()
}

/// Parse a note name such as `"C1"`, `"A#4"`, `"Db5"` or `"C-1"` into Hz
///
/// Accepts `#`/`♯` for sharps and `b`/`♭` for flats, any number of them.
/// Returns `None` for anything else.
pub fn note_to_hz(name: &str) -> Option<f32> {
    let mut chars = name.trim().chars().peekable();

    let pitch_class: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut accidental: i32 = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '#' | '♯' => accidental = accidental.checked_add(1)?,
            'b' | '♭' => accidental = accidental.checked_sub(1)?,
            _ => break,
        }
        chars.next();
    }

    let octave: String = chars.collect();
    let octave: i32 = octave.parse().ok()?;

    let midi = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(pitch_class + accidental)?;
    Some(midi_to_hz(midi as f32))
}

/// Nearest note name with sharps, e.g. `"A4"` or `"C#5"`
pub fn note_name(hz: f32) -> Option<String> {
    if !(hz.is_finite() && hz > 0.0) {
        return None;
    }
    let midi = hz_to_midi(hz).round() as i32;
    let name = SHARP_NAMES[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    Some(format!("{name}{octave}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_notes() {
        assert!((note_to_hz("A4").unwrap() - 440.0).abs() < 1e-3);
        assert!((note_to_hz("C1").unwrap() - 32.703).abs() < 1e-3);
        assert!((note_to_hz("C6").unwrap() - 1046.502).abs() < 1e-2);
        assert!((note_to_hz("a#4").unwrap() - 466.164).abs() < 1e-2);
        assert!((note_to_hz("Db5").unwrap() - note_to_hz("C#5").unwrap()).abs() < 1e-3);
        assert!((note_to_hz("C-1").unwrap() - 8.1758).abs() < 1e-3);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(note_to_hz(""), None);
        assert_eq!(note_to_hz("H4"), None);
        assert_eq!(note_to_hz("C"), None);
        assert_eq!(note_to_hz("C#x"), None);
    }

    #[test]
    fn huge_octave_is_rejected() {
        assert_eq!(note_to_hz("C2147483647"), None);
        assert_eq!(note_to_hz("B178956970"), None);
        assert_eq!(note_to_hz("C-2147483648"), None);
    }

    #[test]
    fn names_nearest_note() {
        assert_eq!(note_name(440.0).as_deref(), Some("A4"));
        assert_eq!(note_name(277.18).as_deref(), Some("C#4"));
        assert_eq!(note_name(0.0), None);
    }
}
