use rfd::FileDialog;
use std::path::PathBuf;

use super::{ImageSource, IMAGE_EXTENSIONS};
use crate::state::data::SourceKind;

/// Photo library: the native "open file" dialog, filtered to images
///
/// The dialog opens in the platform Pictures folder when there is one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryPicker;

impl ImageSource for LibraryPicker {
    fn kind(&self) -> SourceKind {
        SourceKind::Library
    }

    fn present(&self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Choose a Photo")
            .add_filter("Images", &IMAGE_EXTENSIONS);

        if let Some(dir) = dirs::picture_dir() {
            dialog = dialog.set_directory(dir);
        }

        let picked = dialog.pick_file();
        if picked.is_none() {
            log::debug!("photo picker dismissed");
        }
        picked
    }
}
