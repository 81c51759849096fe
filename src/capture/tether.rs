use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use super::{is_image_file, ImageSource};
use crate::state::data::SourceKind;

/// Tethered camera: the newest image a camera (or its tethering software)
/// has written into a watched folder.
///
/// An empty or missing folder behaves like a dismissed camera: no result.
#[derive(Debug, Clone)]
pub struct TetherCamera {
    dir: PathBuf,
}

impl TetherCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Most recently modified image file under the tether folder
    pub fn latest_shot(&self) -> Option<PathBuf> {
        if !self.dir.is_dir() {
            log::warn!("⚠️  Tether folder {} does not exist", self.dir.display());
            return None;
        }

        WalkDir::new(&self.dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && is_image_file(entry.path()))
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, entry.into_path()))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, path)| path)
    }
}

impl ImageSource for TetherCamera {
    fn kind(&self) -> SourceKind {
        SourceKind::Camera
    }

    fn present(&self) -> Option<PathBuf> {
        let shot = self.latest_shot();
        match &shot {
            Some(path) => log::info!("📸 Camera shot: {}", path.display()),
            None => log::debug!("no shot in {}", self.dir.display()),
        }
        shot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(path: &Path, secs: u64) {
        std::fs::write(path, b"x").unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_picks_newest_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("roll2")).unwrap();
        touch(&dir.path().join("a.jpg"), 1_000);
        touch(&dir.path().join("roll2").join("b.png"), 3_000);
        touch(&dir.path().join("c.jpeg"), 2_000);
        touch(&dir.path().join("newer.txt"), 9_000);

        let camera = TetherCamera::new(dir.path());
        assert_eq!(camera.present(), Some(dir.path().join("roll2").join("b.png")));
        assert_eq!(camera.kind(), SourceKind::Camera);
    }

    #[test]
    fn test_empty_or_missing_folder_is_cancel() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(TetherCamera::new(dir.path()).present(), None);
        assert_eq!(TetherCamera::new(dir.path().join("missing")).present(), None);
    }
}
