//! Page geometry.
//!
//! All values are in PDF points with the origin at the bottom-left corner
//! of an A4 page. Camera sections occupy fixed slots, so an image plus its
//! label can never straddle a page break.

/// A4 page size in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// Points per millimeter / centimeter.
pub const MM: f32 = 2.834_645_7;
pub const CM: f32 = 28.346_457;

/// Outer page margin.
pub const MARGIN: f32 = CM;

/// Live-only grid: two columns, three rows, six cameras per page.
pub const GRID_COLS: usize = 2;
pub const GRID_ROWS: usize = 3;
pub const GRID_PER_PAGE: usize = GRID_COLS * GRID_ROWS;

/// Live+archive layout: three camera rows per page.
pub const ARCHIVE_ROWS_PER_PAGE: usize = 3;

/// Rectangular slot an image is fitted into; `(x, y)` is the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One camera row on a live+archive page.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveRow {
    /// Baseline of the camera name header.
    pub name_y: f32,
    pub live: Slot,
    pub archive: Slot,
}

/// Image slot for position `index` (0-based) on a live-only grid page.
pub fn grid_slot(index: usize) -> Slot {
    debug_assert!(index < GRID_PER_PAGE);

    let available_width = PAGE_WIDTH - 2.0 * MARGIN;
    let available_height = PAGE_HEIGHT - 2.0 * MARGIN - 0.5 * CM;

    let gap_x = 0.4 * CM;
    let gap_y = 0.8 * CM;

    let cell_width = (available_width - (GRID_COLS as f32 - 1.0) * gap_x) / GRID_COLS as f32;
    let cell_height = (available_height - (GRID_ROWS as f32 - 1.0) * gap_y) / GRID_ROWS as f32;

    let col = (index % GRID_COLS) as f32;
    let row = (index / GRID_COLS) as f32;

    Slot {
        x: MARGIN + col * (cell_width + gap_x),
        y: PAGE_HEIGHT - MARGIN - (row + 1.0) * cell_height - row * gap_y + 5.0 * MM,
        width: cell_width,
        // Strip below the image is reserved for the camera name.
        height: cell_height - 5.0 * MM,
    }
}

/// Row geometry for position `index` (0-based) on a live+archive page.
pub fn archive_row(index: usize) -> ArchiveRow {
    debug_assert!(index < ARCHIVE_ROWS_PER_PAGE);

    let available_width = PAGE_WIDTH - 2.0 * MARGIN;
    let available_height = PAGE_HEIGHT - 2.0 * MARGIN - 0.5 * CM;

    let gap_y = 0.6 * CM;
    let gap_x = 0.3 * CM;

    let rows = ARCHIVE_ROWS_PER_PAGE as f32;
    let row_height = (available_height - (rows - 1.0) * gap_y) / rows;
    let image_width = (available_width - gap_x) / 2.0;
    // Space above for the label line, below for the name header.
    let image_height = row_height - 6.0 * MM;

    let row = index as f32;
    let y_base = PAGE_HEIGHT - MARGIN - (row + 1.0) * row_height - row * gap_y;
    let y_image = y_base + 5.0 * MM;

    ArchiveRow {
        name_y: y_base + row_height - 1.0 * MM,
        live: Slot {
            x: MARGIN,
            y: y_image,
            width: image_width,
            height: image_height,
        },
        archive: Slot {
            x: MARGIN + image_width + gap_x,
            y: y_image,
            width: image_width,
            height: image_height,
        },
    }
}

/// Scale `(width, height)` to fit inside `(max_width, max_height)` while
/// keeping the aspect ratio.
pub fn fit(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    let aspect = width as f32 / height as f32;
    if aspect > max_width / max_height {
        (max_width, max_width / aspect)
    } else {
        (max_height * aspect, max_height)
    }
}
