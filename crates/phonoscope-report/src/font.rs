//! Helvetica metrics for laying out text without embedding a font.

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width of `text` set in Helvetica at `size` points.
///
/// Characters outside printable ASCII are measured as '?', which is how
/// they are written to the page.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            let idx = if (32..=126).contains(&code) {
                code - 32
            } else {
                u32::from(b'?') - 32
            };
            u32::from(HELVETICA_WIDTHS[idx as usize])
        })
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_monospaced() {
        assert_eq!(text_width("0", 10.0), text_width("8", 10.0));
        assert!((text_width("100", 10.0) - 16.68).abs() < 1e-4);
    }

    #[test]
    fn table_lines_up_with_ascii() {
        assert_eq!(HELVETICA_WIDTHS[(b'A' - 32) as usize], 667);
        assert_eq!(HELVETICA_WIDTHS[(b'a' - 32) as usize], 556);
        assert_eq!(HELVETICA_WIDTHS[(b'~' - 32) as usize], 584);
        assert_eq!(HELVETICA_WIDTHS[(b'W' - 32) as usize], 944);
        assert_eq!(HELVETICA_WIDTHS[(b'i' - 32) as usize], 222);
    }

    #[test]
    fn non_ascii_measured_as_question_mark() {
        assert_eq!(text_width("é", 12.0), text_width("?", 12.0));
    }
}
