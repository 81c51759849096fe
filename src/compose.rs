/// 2x2 grid compositor
///
/// Tiles the four slots into one canvas:
///
/// ```text
/// +-------+-------+
/// | slot0 | slot1 |
/// +-------+-------+
/// | slot2 | slot3 |
/// +-------+-------+
/// ```
///
/// Each image is stretched to fill its cell. Empty slots leave their cell
/// transparent; the remaining images are never shifted to fill the gap.

use image::{imageops, imageops::FilterType, ImageFormat, RgbaImage};
use std::path::Path;

use crate::state::data::{ImageHandle, SLOT_COUNT};

/// Default canvas edge in logical units
pub const CANVAS_EDGE: u32 = 400;

/// Grid columns (and rows)
const GRID: u32 = 2;

/// Output canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: CANVAS_EDGE,
            height: CANVAS_EDGE,
        }
    }
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of one grid cell
    pub fn cell(&self) -> (u32, u32) {
        (self.width / GRID, self.height / GRID)
    }

    /// Top-left corner of the cell for a slot: row = i / 2, col = i % 2
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let (cell_w, cell_h) = self.cell();
        let col = index as u32 % GRID;
        let row = index as u32 / GRID;
        (col * cell_w, row * cell_h)
    }
}

/// Compose the four slots into a single image. Never fails: with no images
/// the result is a blank (fully transparent) canvas.
pub fn compose(slots: &[Option<ImageHandle>; SLOT_COUNT], canvas: CanvasSize) -> ImageHandle {
    let mut out = RgbaImage::new(canvas.width, canvas.height);
    let (cell_w, cell_h) = canvas.cell();

    if cell_w == 0 || cell_h == 0 {
        return ImageHandle::new(out);
    }

    for (index, slot) in slots.iter().enumerate() {
        let Some(image) = slot else { continue };
        if image.is_empty() {
            log::debug!("slot {index} holds an empty image, leaving its cell blank");
            continue;
        }

        let (x, y) = canvas.cell_origin(index);
        if image.width() == cell_w && image.height() == cell_h {
            imageops::replace(&mut out, image.pixels(), x as i64, y as i64);
        } else {
            let tile = imageops::resize(image.pixels(), cell_w, cell_h, FilterType::Triangle);
            imageops::replace(&mut out, &tile, x as i64, y as i64);
        }
    }

    ImageHandle::new(out)
}

/// Save a composed grid as PNG
pub fn export_png(path: &Path, image: &ImageHandle) -> Result<(), image::ImageError> {
    image.pixels().save_with_format(path, ImageFormat::Png)?;
    log::info!("💾 Exported grid to {}", path.display());
    Ok(())
}
