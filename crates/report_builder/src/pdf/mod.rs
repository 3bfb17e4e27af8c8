//! # PDF Output
//!
//! Minimal vector PDF writer on top of `lopdf`: pages are drawn on a
//! [`Canvas`] and serialized with the two Helvetica fonts and the fill
//! opacity states as shared resources.

pub mod canvas;
pub mod color;
pub mod font;

pub use canvas::{Align, Alpha, Canvas, Paint, TextStyle};
pub use color::Color;
pub use font::Font;

use anyhow::{Context, Result};
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// US letter, landscape.
pub const LETTER_LANDSCAPE: (f64, f64) = (792.0, 612.0);

pub struct PdfDocument {
    title: String,
    width: f64,
    height: f64,
    pages: Vec<Canvas>,
}

impl PdfDocument {
    pub fn new(title: &str, (width, height): (f64, f64)) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            pages: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn add_page(&mut self, canvas: Canvas) {
        self.pages.push(canvas);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize every page into a compressed PDF.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in Font::ALL {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), id);
        }

        let mut states = lopdf::Dictionary::new();
        for alpha in Alpha::ALL {
            states.set(
                alpha.resource_name(),
                dictionary! {
                    "Type" => "ExtGState",
                    "ca" => alpha.value(),
                    "CA" => alpha.value(),
                },
            );
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "ExtGState" => states,
        });

        let page_total = self.pages.len();
        let mut kids: Vec<Object> = Vec::with_capacity(page_total);
        for (index, canvas) in self.pages.into_iter().enumerate() {
            let content = Content {
                operations: canvas.into_operations(),
            };
            let bytes = content
                .encode()
                .with_context(|| format!("Failed to encode page {}", index + 1))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_total as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                canvas::real(self.width),
                canvas::real(self.height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.as_str()),
            "Producer" => Object::string_literal(concat!("report_builder ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(
                chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut out = Vec::new();
        doc.save_to(&mut out).context("Failed to serialize PDF")?;
        debug!("Serialized {} pages ({} bytes)", page_total, out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_round_trip_through_lopdf() -> Result<()> {
        let mut pdf = PdfDocument::new("Test", LETTER_LANDSCAPE);
        for i in 0..3 {
            let mut canvas = Canvas::new();
            canvas.rect(10.0, 10.0, 50.0 + i as f64, 20.0, Paint::Fill);
            pdf.add_page(canvas);
        }
        assert_eq!(pdf.page_count(), 3);

        let bytes = pdf.to_bytes()?;
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes)?;
        assert_eq!(doc.get_pages().len(), 3);
        Ok(())
    }

    #[test]
    fn test_empty_document_is_valid() -> Result<()> {
        let bytes = PdfDocument::new("Empty", LETTER_LANDSCAPE).to_bytes()?;
        let doc = Document::load_mem(&bytes)?;
        assert!(doc.get_pages().is_empty());
        Ok(())
    }
}
