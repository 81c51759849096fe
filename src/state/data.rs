/// Shared data structures for the application state
///
/// These types flow between the slot store, the filter engine,
/// the compositor and the UI layer.
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// Number of image slots. Fixed, never grows.
pub const SLOT_COUNT: usize = 4;

/// Opaque reference to decoded RGBA8 pixel data
///
/// Cloning is cheap (the pixels are shared behind an `Arc`), but the store
/// never hands the same handle to two slots: every write replaces the
/// slot's handle and drops the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle(Arc<RgbaImage>);

impl ImageHandle {
    /// Wrap an RGBA buffer
    pub fn new(pixels: RgbaImage) -> Self {
        Self(Arc::new(pixels))
    }

    /// A `width` x `height` image filled with one color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// True when the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.0.width() == 0 || self.0.height() == 0
    }

    /// Borrow the pixel buffer
    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    /// Raw RGBA bytes, row-major (for uploading to the UI)
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_raw()
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(img: DynamicImage) -> Self {
        Self::new(img.to_rgba8())
    }
}

impl From<RgbaImage> for ImageHandle {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

/// Display/targeting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Slot 0 alone is displayed and edited
    #[default]
    Single,
    /// All four slots participate (2x2 grid)
    Quad,
}

impl Mode {
    pub fn is_quad(self) -> bool {
        self == Mode::Quad
    }
}

/// Which capability produced an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    Library,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Camera => write!(f, "Camera"),
            SourceKind::Library => write!(f, "Photo Library"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality_is_pixel_equality() {
        let a = ImageHandle::solid(2, 2, [10, 20, 30, 255]);
        let b = ImageHandle::solid(2, 2, [10, 20, 30, 255]);
        let c = ImageHandle::solid(2, 2, [10, 20, 31, 255]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_handle() {
        assert!(ImageHandle::new(RgbaImage::new(0, 5)).is_empty());
        assert!(!ImageHandle::solid(1, 1, [0, 0, 0, 0]).is_empty());
    }
}
