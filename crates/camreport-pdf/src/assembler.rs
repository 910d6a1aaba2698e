//! Report assembly.
//!
//! Consumes the ordered capture results plus project metadata and renders
//! the paginated document: a cover page, then one section per camera in
//! input order. Failed captures occupy their layout slot with a
//! placeholder instead of dropping out of the report.

use pdf_writer::{Content, Name};
use tracing::{debug, warn};

use camreport_models::{CaptureKind, CaptureResult, ProjectMetadata};

use crate::document::{show_text, text_width, DocumentWriter, FONT_BOLD, FONT_REGULAR};
use crate::error::ReportResult;
use crate::image_data::{prepare_image, prepare_logo, EmbeddedImage};
use crate::layout::{self, Slot, CM, MARGIN, MM, PAGE_WIDTH};

const TITLE: &str = "Camera Reference Images";
const FOOTER: &str = "camreport 0.1";

/// Maximum camera name length before truncation.
const NAME_MAX_CHARS: usize = 35;

// Colors (RGB, 0..1).
const ACCENT: (f32, f32, f32) = (0.902, 0.318, 0.0);
const BORDER_GRAY: f32 = 0.867;
const LABEL_GRAY: f32 = 0.5;
const TEXT_DARK: f32 = 0.2;
const ERROR_RED: (f32, f32, f32) = (0.8, 0.0, 0.0);

/// Per-camera grouping of the flat result list.
struct Section<'a> {
    name: String,
    live: Option<&'a CaptureResult>,
    archive: Option<&'a CaptureResult>,
}

/// Render the full report; deterministic for identical inputs.
pub fn assemble(metadata: &ProjectMetadata, results: &[CaptureResult]) -> ReportResult<Vec<u8>> {
    let mut doc = DocumentWriter::new();
    cover_page(&mut doc, metadata)?;

    let sections = group_sections(results);
    let with_archive = sections.iter().any(|s| s.archive.is_some());

    if with_archive {
        for chunk in sections.chunks(layout::ARCHIVE_ROWS_PER_PAGE) {
            archive_page(&mut doc, chunk)?;
        }
    } else {
        for chunk in sections.chunks(layout::GRID_PER_PAGE) {
            grid_page(&mut doc, chunk)?;
        }
    }

    debug!(
        pages = doc.page_count(),
        cameras = sections.len(),
        "report assembled"
    );
    Ok(doc.finish())
}

/// Group results into camera sections, preserving input order. Results
/// arrive live-first per camera; an archive result attaches to the
/// preceding section of the same camera.
fn group_sections(results: &[CaptureResult]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section> = Vec::new();

    for result in results {
        match result.request.kind {
            CaptureKind::Live => sections.push(Section {
                name: result.request.camera.name.clone(),
                live: Some(result),
                archive: None,
            }),
            CaptureKind::Archive => {
                let attachable = sections
                    .last_mut()
                    .filter(|s| s.archive.is_none())
                    .filter(|s| {
                        s.live
                            .map(|l| l.request.camera.id == result.request.camera.id)
                            .unwrap_or(false)
                    });
                match attachable {
                    Some(section) => section.archive = Some(result),
                    None => sections.push(Section {
                        name: result.request.camera.name.clone(),
                        live: None,
                        archive: Some(result),
                    }),
                }
            }
        }
    }

    sections
}

fn cover_page(doc: &mut DocumentWriter, metadata: &ProjectMetadata) -> ReportResult<()> {
    let mut content = Content::new();
    let mut images = Vec::new();
    let mut y = layout::PAGE_HEIGHT - MARGIN;

    if let Some(logo_bytes) = &metadata.logo {
        let logo = prepare_logo(logo_bytes)?;
        let logo_height = 2.0 * CM;
        let logo_width = logo_height * (logo.width as f32 / logo.height as f32);
        place_image(
            doc,
            &mut content,
            &mut images,
            &logo,
            MARGIN,
            y - logo_height,
            logo_width,
            logo_height,
        );
        y -= logo_height + 1.5 * CM;
    } else {
        y -= 1.0 * CM;
    }

    content.set_fill_rgb(0.0, 0.0, 0.0);
    show_text(&mut content, FONT_BOLD, 24.0, MARGIN, y, TITLE);

    content.set_stroke_rgb(ACCENT.0, ACCENT.1, ACCENT.2);
    content.set_line_width(2.0);
    content.move_to(MARGIN, y - 3.0 * MM);
    content.line_to(MARGIN + 7.0 * CM, y - 3.0 * MM);
    content.stroke();

    y -= 1.5 * CM;
    show_text(&mut content, FONT_BOLD, 12.0, MARGIN, y, "Project Information");
    y -= 0.8 * CM;

    let rows = [
        ("Project:", metadata.name.as_str()),
        ("Site:", metadata.site.as_str()),
        ("Technician:", metadata.technician.as_str()),
        ("Company:", metadata.company.as_str()),
    ];
    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        content.set_fill_rgb(TEXT_DARK, TEXT_DARK, TEXT_DARK);
        show_text(&mut content, FONT_BOLD, 10.0, MARGIN, y, label);
        show_text(
            &mut content,
            FONT_REGULAR,
            10.0,
            MARGIN + 2.5 * CM,
            y,
            value,
        );
        y -= 0.5 * CM;
    }

    content.set_fill_rgb(LABEL_GRAY, LABEL_GRAY, LABEL_GRAY);
    show_text(&mut content, FONT_REGULAR, 8.0, MARGIN, MARGIN, FOOTER);

    doc.add_page(content, images);
    Ok(())
}

/// Live-only page: up to six cameras in a 2x3 grid.
fn grid_page(doc: &mut DocumentWriter, sections: &[Section<'_>]) -> ReportResult<()> {
    let mut content = Content::new();
    let mut images = Vec::new();

    for (index, section) in sections.iter().enumerate() {
        let slot = layout::grid_slot(index);
        if let Some(live) = section.live {
            draw_grid_cell(doc, &mut content, &mut images, live, slot, &section.name);
        }
    }

    page_number(&mut content, doc.page_count() + 1);
    doc.add_page(content, images);
    Ok(())
}

/// Live+archive page: up to three camera rows, images side by side.
fn archive_page(doc: &mut DocumentWriter, sections: &[Section<'_>]) -> ReportResult<()> {
    let mut content = Content::new();
    let mut images = Vec::new();

    for (index, section) in sections.iter().enumerate() {
        let row = layout::archive_row(index);

        content.set_fill_rgb(0.0, 0.0, 0.0);
        show_text(
            &mut content,
            FONT_BOLD,
            9.0,
            MARGIN,
            row.name_y,
            &truncate(&section.name),
        );

        if let Some(live) = section.live {
            draw_row_image(doc, &mut content, &mut images, live, row.live, "Live");
        }
        if let Some(archive) = section.archive {
            let label = match archive.request.timestamp {
                Some(ts) => format!("Archive {}", ts.format("%Y-%m-%d %H:%M UTC")),
                None => "Archive".to_string(),
            };
            draw_row_image(doc, &mut content, &mut images, archive, row.archive, &label);
        }
    }

    page_number(&mut content, doc.page_count() + 1);
    doc.add_page(content, images);
    Ok(())
}

/// Grid cell: image anchored to the top of the slot, camera name below.
fn draw_grid_cell(
    doc: &mut DocumentWriter,
    content: &mut Content,
    images: &mut Vec<(String, pdf_writer::Ref)>,
    result: &CaptureResult,
    slot: Slot,
    name: &str,
) {
    let name_y = match embeddable(result) {
        Some(image) => {
            let (w, h) = layout::fit(image.width, image.height, slot.width, slot.height);
            let image_y = slot.y + slot.height - h;
            draw_border(content, slot.x, image_y, w, h);
            place_image(doc, content, images, &image, slot.x, image_y, w, h);
            image_y
        }
        None => {
            placeholder(content, slot, &failure_text(result));
            slot.y
        }
    };

    content.set_fill_rgb(0.0, 0.0, 0.0);
    show_text(
        content,
        FONT_BOLD,
        8.0,
        slot.x,
        name_y - 3.5 * MM,
        &truncate(name),
    );
}

/// Archive-row image: anchored to the slot bottom, label line above.
fn draw_row_image(
    doc: &mut DocumentWriter,
    content: &mut Content,
    images: &mut Vec<(String, pdf_writer::Ref)>,
    result: &CaptureResult,
    slot: Slot,
    label: &str,
) {
    let label_y = match embeddable(result) {
        Some(image) => {
            let (w, h) = layout::fit(image.width, image.height, slot.width, slot.height);
            draw_border(content, slot.x, slot.y, w, h);
            place_image(doc, content, images, &image, slot.x, slot.y, w, h);
            slot.y + h + 1.0 * MM
        }
        None => {
            placeholder(content, slot, &failure_text(result));
            slot.y + slot.height + 1.0 * MM
        }
    };

    content.set_fill_rgb(LABEL_GRAY, LABEL_GRAY, LABEL_GRAY);
    show_text(content, FONT_REGULAR, 7.0, slot.x, label_y, label);
}

/// Decode a successful capture for embedding. Snapshot bytes the server
/// delivered but we cannot decode degrade to a placeholder instead of
/// aborting the whole report.
fn embeddable(result: &CaptureResult) -> Option<EmbeddedImage> {
    let bytes = result.bytes()?;
    match prepare_image(bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(
                camera = %result.request.camera.id,
                error = %e,
                "snapshot bytes are not a decodable image"
            );
            None
        }
    }
}

fn failure_text(result: &CaptureResult) -> String {
    match result.reason() {
        Some(reason) => format!("capture failed: {reason}"),
        None => "capture failed: invalid image data".to_string(),
    }
}

fn place_image(
    doc: &mut DocumentWriter,
    content: &mut Content,
    images: &mut Vec<(String, pdf_writer::Ref)>,
    image: &EmbeddedImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    let id = doc.add_image(image);
    let name = format!("Im{}", images.len());

    content.save_state();
    content.transform([width, 0.0, 0.0, height, x, y]);
    content.x_object(Name(name.as_bytes()));
    content.restore_state();

    images.push((name, id));
}

fn draw_border(content: &mut Content, x: f32, y: f32, width: f32, height: f32) {
    content.set_stroke_rgb(BORDER_GRAY, BORDER_GRAY, BORDER_GRAY);
    content.set_line_width(0.5);
    content.rect(x, y, width, height);
    content.stroke();
}

/// Outlined box filling the slot with the failure reason inside.
fn placeholder(content: &mut Content, slot: Slot, text: &str) {
    draw_border(content, slot.x, slot.y, slot.width, slot.height);
    content.set_fill_rgb(ERROR_RED.0, ERROR_RED.1, ERROR_RED.2);
    show_text(
        content,
        FONT_REGULAR,
        8.0,
        slot.x + 2.0 * MM,
        slot.y + slot.height / 2.0,
        text,
    );
}

fn page_number(content: &mut Content, number: usize) {
    let text = format!("Page {number}");
    let x = PAGE_WIDTH - MARGIN - text_width(&text, 8.0);
    content.set_fill_rgb(LABEL_GRAY, LABEL_GRAY, LABEL_GRAY);
    show_text(content, FONT_REGULAR, 8.0, x, MARGIN / 2.0, &text);
}

fn truncate(name: &str) -> String {
    name.chars().take(NAME_MAX_CHARS).collect()
}
