//! Minimal PDF 1.4 writer for a single page.
//!
//! Object layout:
//!
//! | id        | object                                   |
//! |-----------|------------------------------------------|
//! | 1         | Catalog                                  |
//! | 2         | Pages                                    |
//! | 3         | Page                                     |
//! | 4         | Helvetica (WinAnsiEncoding)              |
//! | 5         | Content stream                           |
//! | 6         | Info                                     |
//! | 7..       | Image XObjects, then ExtGState opacities |
//!
//! Streams are stored uncompressed.

use std::fmt::Write as _;

use crate::canvas::{Canvas, escape_text};
use crate::error::RenderError;

/// Header line plus a binary comment marking the file as 8-bit.
const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

const FIRST_IMAGE_ID: usize = 7;

/// Document-level metadata written to the Info dictionary.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'a> {
    /// Title shown by viewers
    pub title: &'a str,
    /// Producing application
    pub producer: &'a str,
}

struct Writer {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: HEADER.to_vec(),
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self, id: usize) {
        // Objects are written in id order starting at 1.
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.out.len());
        self.out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, id: usize, body: &str) {
        self.begin(id);
        self.out.extend_from_slice(body.as_bytes());
        self.out.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.begin(id);
        self.out.extend_from_slice(
            format!("<< {dict} /Length {} >>\nstream\n", data.len()).as_bytes(),
        );
        self.out.extend_from_slice(data);
        self.out.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.out.len();
        let count = self.offsets.len() + 1;
        let mut table = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(table, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            table,
            "trailer\n<< /Size {count} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        );
        self.out.extend_from_slice(table.as_bytes());
        self.out
    }
}

/// Serialize `canvas` as a one-page PDF.
pub fn write_pdf(canvas: &Canvas, info: DocumentInfo<'_>) -> Result<Vec<u8>, RenderError> {
    let images = canvas.images();
    for (index, image) in images.iter().enumerate() {
        let expected = image.width() as usize * image.height() as usize * 3;
        if image.data().len() != expected || expected == 0 {
            return Err(RenderError::ImageData {
                index,
                expected,
                actual: image.data().len(),
            });
        }
    }
    let first_gs = FIRST_IMAGE_ID + images.len();

    let mut xobjects = String::new();
    for i in 0..images.len() {
        let _ = write!(xobjects, " /Im{i} {} 0 R", FIRST_IMAGE_ID + i);
    }
    let mut states = String::new();
    for i in 0..canvas.alphas().len() {
        let _ = write!(states, " /GS{i} {} 0 R", first_gs + i);
    }

    let mut w = Writer::new();
    w.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
    w.object(2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    w.object(
        3,
        &format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R >> /XObject <<{xobjects} >> /ExtGState <<{states} >> >> \
             /Contents 5 0 R >>",
            canvas.width().round() as i64,
            canvas.height().round() as i64,
        ),
    );
    w.object(
        4,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    w.stream(5, "", canvas.content().as_bytes());
    w.object(
        6,
        &format!(
            "<< /Title ({}) /Producer ({}) >>",
            escape_text(info.title),
            escape_text(info.producer)
        ),
    );
    for (i, image) in images.iter().enumerate() {
        w.stream(
            FIRST_IMAGE_ID + i,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8",
                image.width(),
                image.height()
            ),
            image.data(),
        );
    }
    for (i, &percent) in canvas.alphas().iter().enumerate() {
        let alpha = f32::from(percent) / 100.0;
        w.object(
            first_gs + i,
            &format!("<< /Type /ExtGState /CA {alpha:.2} /ca {alpha:.2} >>"),
        );
    }

    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Image, Rect};

    const INFO: DocumentInfo<'static> = DocumentInfo {
        title: "t",
        producer: "p",
    };

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut canvas = Canvas::new(200.0, 100.0);
        canvas.set_alpha(0.5);
        canvas.image(Image::new(2, 1), Rect::new(0.0, 0.0, 10.0, 10.0));
        let bytes = write_pdf(&canvas, INFO).unwrap();
        let doc = text(&bytes);

        let start = doc.rfind("startxref\n").unwrap() + "startxref\n".len();
        let xref: usize = doc[start..].lines().next().unwrap().parse().unwrap();
        // the header comment is not UTF-8, so index the raw bytes
        let table = std::str::from_utf8(&bytes[xref..]).unwrap();
        assert!(table.starts_with("xref\n0 9\n"));

        let entries: Vec<&str> = table.lines().skip(3).take(8).collect();
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {} not at {offset}",
                i + 1
            );
        }
    }

    #[test]
    fn stream_length_matches_payload() {
        let mut canvas = Canvas::new(10.0, 10.0);
        canvas.line(0.0, 0.0, 5.0, 5.0);
        let doc = text(&write_pdf(&canvas, INFO).unwrap());
        let content = canvas.content();
        assert!(doc.contains(&format!("/Length {} >>\nstream\n{content}\nendstream", content.len())));
    }

    #[test]
    fn page_size_and_single_page() {
        let canvas = Canvas::new(864.0, 576.0);
        let doc = text(&write_pdf(&canvas, INFO).unwrap());
        assert!(doc.starts_with("%PDF-1.4"));
        assert!(doc.contains("/MediaBox [0 0 864 576]"));
        assert!(doc.contains("/Count 1"));
        assert_eq!(doc.matches("/Type /Page ").count(), 1);
        assert!(doc.ends_with("%%EOF\n"));
    }

    #[test]
    fn info_strings_are_escaped() {
        let canvas = Canvas::new(10.0, 10.0);
        let info = DocumentInfo {
            title: "a (b)",
            producer: "p",
        };
        let doc = text(&write_pdf(&canvas, info).unwrap());
        assert!(doc.contains("/Title (a \\(b\\))"));
    }

    #[test]
    fn empty_image_rejected() {
        let mut canvas = Canvas::new(10.0, 10.0);
        canvas.image(Image::new(0, 4), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(
            write_pdf(&canvas, INFO),
            Err(RenderError::ImageData { index: 0, .. })
        ));
    }
}
