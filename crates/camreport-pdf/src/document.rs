//! Low-level PDF document writer.
//!
//! Thin stateful wrapper around `pdf_writer`: it owns reference
//! allocation, the page tree, the two standard fonts, and image XObject
//! registration. Output is fully deterministic; nothing here depends on
//! the clock or on randomness.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use crate::image_data::EmbeddedImage;
use crate::layout::{PAGE_HEIGHT, PAGE_WIDTH};

/// Resource names the content streams use.
pub(crate) const FONT_REGULAR: Name<'static> = Name(b"F1");
pub(crate) const FONT_BOLD: Name<'static> = Name(b"F2");

/// Rough Helvetica advance width as a fraction of the font size, good
/// enough for right-aligning short labels.
const AVG_CHAR_WIDTH: f32 = 0.5;

struct PageRecord {
    page_id: Ref,
    content_id: Ref,
    images: Vec<(String, Ref)>,
}

pub(crate) struct DocumentWriter {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    page_tree_id: Ref,
    regular_id: Ref,
    bold_id: Ref,
    pages: Vec<PageRecord>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        let mut writer = Self {
            pdf: Pdf::new(),
            next_id: 1,
            catalog_id: Ref::new(1),
            page_tree_id: Ref::new(1),
            regular_id: Ref::new(1),
            bold_id: Ref::new(1),
            pages: Vec::new(),
        };
        writer.catalog_id = writer.alloc();
        writer.page_tree_id = writer.alloc();
        writer.regular_id = writer.alloc();
        writer.bold_id = writer.alloc();
        writer
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register an image XObject and return its reference.
    pub fn add_image(&mut self, image: &EmbeddedImage) -> Ref {
        let id = self.alloc();
        let mut xobject = self.pdf.image_xobject(id, &image.data);
        xobject.filter(Filter::DctDecode);
        xobject.width(image.width as i32);
        xobject.height(image.height as i32);
        xobject.bits_per_component(8);
        if image.grayscale {
            xobject.color_space().device_gray();
        } else {
            xobject.color_space().device_rgb();
        }
        xobject.finish();
        id
    }

    /// Close a page: write its content stream and remember the resources
    /// it references.
    pub fn add_page(&mut self, content: Content, images: Vec<(String, Ref)>) {
        let content_id = self.alloc();
        self.pdf.stream(content_id, &content.finish());
        let page_id = self.alloc();
        self.pages.push(PageRecord {
            page_id,
            content_id,
            images,
        });
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write the page tree, catalog and fonts, and serialize the document.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf
            .type1_font(self.regular_id)
            .base_font(Name(b"Helvetica"));
        self.pdf
            .type1_font(self.bold_id)
            .base_font(Name(b"Helvetica-Bold"));

        for record in &self.pages {
            let mut page = self.pdf.page(record.page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(self.page_tree_id);
            page.contents(record.content_id);

            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                fonts.pair(FONT_REGULAR, self.regular_id);
                fonts.pair(FONT_BOLD, self.bold_id);
            }
            if !record.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, id) in &record.images {
                    xobjects.pair(Name(name.as_bytes()), *id);
                }
            }
            resources.finish();
            page.finish();
        }

        let kids: Vec<Ref> = self.pages.iter().map(|p| p.page_id).collect();
        self.pdf
            .pages(self.page_tree_id)
            .kids(kids.iter().copied())
            .count(kids.len() as i32);
        self.pdf.catalog(self.catalog_id).pages(self.page_tree_id);

        self.pdf.finish()
    }
}

/// Draw one line of text with the given font at `(x, y)`.
///
/// The standard Type1 fonts carry no embedded encoding here, so text is
/// reduced to printable ASCII; anything else becomes `?`.
pub(crate) fn show_text(content: &mut Content, font: Name, size: f32, x: f32, y: f32, text: &str) {
    let bytes = sanitize(text);
    content.begin_text();
    content.set_font(font, size);
    content.next_line(x, y);
    content.show(Str(&bytes));
    content.end_text();
}

/// Estimated rendered width of `text`, for right alignment.
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

fn sanitize(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                b'?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize("Tor 1"), b"Tor 1".to_vec());
        assert_eq!(sanitize("Tür"), b"T?r".to_vec());
    }

    #[test]
    fn test_empty_document_has_pdf_magic() {
        let doc = DocumentWriter::new();
        let bytes = doc.finish();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_identical_pages_produce_identical_bytes() {
        let build = || {
            let mut doc = DocumentWriter::new();
            let mut content = Content::new();
            show_text(&mut content, FONT_BOLD, 12.0, 10.0, 10.0, "hello");
            doc.add_page(content, Vec::new());
            doc.finish()
        };
        assert_eq!(build(), build());
    }
}
