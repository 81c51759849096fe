/// Capture and pick capabilities
///
/// This module handles:
/// - The `ImageSource` contract shared by the camera and the photo library
/// - Decoding the chosen file off the UI thread
///
/// Presenting a source is modal and returns the chosen file, or `None` when
/// the user dismisses it. Decoding then runs on a blocking worker; the UI
/// receives the result as a message and only then writes the slot store.

pub mod library;
pub mod tether;

pub use library::LibraryPicker;
pub use tether::TetherCamera;

use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::CaptureError;
use crate::state::data::{ImageHandle, SourceKind};

/// File extensions offered by the picker and accepted from the tether folder
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// A modal capability that yields one image file
pub trait ImageSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Present the capability. `None` means dismissed with no result.
    fn present(&self) -> Option<PathBuf>;
}

/// Check if a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode an image file on a blocking worker
pub async fn load_image(path: PathBuf) -> Result<ImageHandle, CaptureError> {
    // Spawn blocking because decoding is CPU-bound
    task::spawn_blocking(move || load_image_blocking(&path))
        .await
        .map_err(|e| CaptureError::Join(e.to_string()))?
}

/// Blocking implementation of image decoding
pub fn load_image_blocking(path: &Path) -> Result<ImageHandle, CaptureError> {
    if !path.exists() {
        return Err(CaptureError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|e| CaptureError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("📷 Loaded {}x{} image from {}", img.width(), img.height(), path.display());
    Ok(ImageHandle::from(img))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_check() {
        assert!(is_image_file(Path::new("/a/b/IMG_0001.JPG")));
        assert!(is_image_file(Path::new("shot.png")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_image(PathBuf::from("/nonexistent/path.png")).await;
        assert!(matches!(result, Err(CaptureError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        ImageHandle::solid(3, 2, [1, 2, 3, 255]).pixels().save(&path).unwrap();

        let handle = load_image(path).await.unwrap();
        assert_eq!((handle.width(), handle.height()), (3, 2));
        assert_eq!(handle.pixels().get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_sources_report_their_kind() {
        let sources: [Box<dyn ImageSource>; 2] =
            [Box::new(TetherCamera::new("/tmp/shots")), Box::new(LibraryPicker)];
        let kinds: Vec<SourceKind> = sources.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![SourceKind::Camera, SourceKind::Library]);
    }

    #[test]
    fn test_garbage_file_fails_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(load_image_blocking(&path), Err(CaptureError::Decode { .. })));
    }
}
