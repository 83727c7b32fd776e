//! Cell-grid to PNG rasterization.

use std::io::Cursor;

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb as Pixel, RgbImage};
use tracing::debug;

use termview_core::{dim_rgb, CellRecord, Dimensions, Error, Result, Rgb, DEFAULT_BG};

use crate::config::RenderConfig;

/// Vertical offset applied to glyph tops so ascenders are not clipped.
const GLYPH_TOP_OFFSET: u32 = 2;

/// Look up the 8x8 bitmap for a character across the available pages.
fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
}

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel([color.r, color.g, color.b])
}

/// Canvas size in pixels for a window under the given configuration,
/// clamped to at least 1x1.
pub fn canvas_size(window: Dimensions, config: &RenderConfig) -> (u32, u32) {
    let width = (window.cols as f32 * config.cell_width + 2.0 * config.padding).ceil() as u32;
    let height = (window.rows as f32 * config.cell_height + 2.0 * config.padding).ceil() as u32;
    (width.max(1), height.max(1))
}

/// Render a snapshot cell matrix to PNG bytes.
///
/// The canvas is `ceil(cols*cell_width + 2*padding)` by
/// `ceil(rows*cell_height + 2*padding)` pixels, clamped to at least
/// 1x1 so an empty window still produces a valid image. Output bytes
/// grow with the window for non-degenerate inputs.
pub fn render(
    records: &[Vec<CellRecord>],
    window: Dimensions,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let (width, height) = canvas_size(window, config);

    debug!(
        "Rendering {}x{} cells to {}x{} px",
        window.cols, window.rows, width, height
    );

    let mut canvas = RgbImage::from_pixel(width, height, pixel(DEFAULT_BG));

    for (row_idx, row) in records.iter().enumerate().take(window.rows as usize) {
        for (col_idx, record) in row.iter().enumerate().take(window.cols as usize) {
            let x0 = (config.padding + col_idx as f32 * config.cell_width) as u32;
            let y0 = (config.padding + row_idx as f32 * config.cell_height) as u32;
            draw_cell(&mut canvas, record, x0, y0, config);
        }
    }

    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Render(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}

/// Draw one cell: background, glyph, then decoration strokes.
fn draw_cell(canvas: &mut RgbImage, record: &CellRecord, x0: u32, y0: u32, config: &RenderConfig) {
    let cell_w = config.cell_width.ceil() as u32;
    let cell_h = config.cell_height.ceil() as u32;

    // The inverse swap happens exactly here, once per cell.
    let (fg, bg) = record.effective_colors();
    let fg = if record.dim { dim_rgb(fg) } else { fg };

    if bg != DEFAULT_BG {
        fill_rect(canvas, x0, y0, cell_w, cell_h, bg);
    }

    if record.ch != ' ' {
        // Unknown characters render as a filled block so their presence
        // is still visible.
        let bitmap = glyph(record.ch).unwrap_or([0xff; 8]);
        draw_glyph(canvas, &bitmap, record, fg, x0, y0, cell_w, cell_h);
    }

    if record.underline && cell_h > 2 {
        stroke_row(canvas, x0, y0 + cell_h - 2, cell_w, fg);
    }
    if record.strikethrough {
        stroke_row(canvas, x0, y0 + cell_h / 2, cell_w, fg);
    }
}

/// Draw an 8x8 bitmap scaled into the cell box below the top offset.
#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    canvas: &mut RgbImage,
    bitmap: &[u8; 8],
    record: &CellRecord,
    fg: Rgb,
    x0: u32,
    y0: u32,
    cell_w: u32,
    cell_h: u32,
) {
    let glyph_h = cell_h.saturating_sub(GLYPH_TOP_OFFSET).max(1);
    let color = pixel(fg);

    for py in 0..glyph_h {
        let gy = ((py * 8) / glyph_h).min(7) as usize;
        // Italic: shear the top half of the glyph one pixel right.
        let shear = if record.italic && gy < 4 { 1 } else { 0 };

        for px in 0..cell_w {
            let gx = ((px * 8) / cell_w.max(1)).min(7);
            if (bitmap[gy] >> gx) & 1 == 0 {
                continue;
            }

            let x = x0 + px + shear;
            let y = y0 + py + GLYPH_TOP_OFFSET;
            put(canvas, x, y, color);
            if record.bold {
                // Double-strike for weight.
                put(canvas, x + 1, y, color);
            }
        }
    }
}

fn fill_rect(canvas: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb) {
    let color = pixel(color);
    for y in y0..y0.saturating_add(h) {
        for x in x0..x0.saturating_add(w) {
            put(canvas, x, y, color);
        }
    }
}

fn stroke_row(canvas: &mut RgbImage, x0: u32, y: u32, w: u32, color: Rgb) {
    let color = pixel(color);
    for x in x0..x0.saturating_add(w) {
        put(canvas, x, y, color);
    }
}

/// Bounds-checked pixel write.
fn put(canvas: &mut RgbImage, x: u32, y: u32, color: Pixel<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}
