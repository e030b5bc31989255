//! Where background and thumbnail art lives for a selected entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};

use super::loader::DecodedImage;
use crate::config::FeatureFlags;
use crate::library::{Entry, EntryKind, LibraryPaths};

const MEDIA_DIR: &str = ".media";

/// Library-wide fallback background.
pub fn default_background(paths: &LibraryPaths) -> PathBuf {
    paths.root.join("bg.png")
}

/// Background art for `entry`: a folder's own `bg.png`, the rom folder's
/// `bglist.png`, or the library default when neither exists.
pub fn background_path(entry: &Entry, paths: &LibraryPaths, features: FeatureFlags) -> PathBuf {
    if features.folder_backgrounds
        && let Some(candidate) = background_candidate(entry)
        && candidate.is_file()
    {
        return candidate;
    }
    default_background(paths)
}

fn background_candidate(entry: &Entry) -> Option<PathBuf> {
    match entry.kind {
        EntryKind::Directory => Some(entry.path().join(MEDIA_DIR).join("bg.png")),
        EntryKind::RomFile => Some(entry.path().parent()?.join(MEDIA_DIR).join("bglist.png")),
        EntryKind::PackageApp => None,
    }
}

/// Box art for a rom: `<rom folder>/.media/<file stem>.png`.
pub fn thumbnail_path(entry: &Entry, features: FeatureFlags) -> Option<PathBuf> {
    if !features.show_game_art || entry.kind != EntryKind::RomFile {
        return None;
    }
    let stem = entry.path().file_stem()?.to_string_lossy().into_owned();
    Some(
        entry
            .path()
            .parent()?
            .join(MEDIA_DIR)
            .join(format!("{stem}.png")),
    )
}

/// Issues background requests only when the backing folder or entry kind changes.
#[derive(Debug, Default)]
pub struct ArtTracker {
    last: Option<(PathBuf, EntryKind)>,
}

impl ArtTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background to load for the new selection, or `None` when it would repeat
    /// the previous request.
    pub fn background_request(
        &mut self,
        entry: &Entry,
        paths: &LibraryPaths,
        features: FeatureFlags,
    ) -> Option<PathBuf> {
        let folder = art_folder(entry);
        let key = (folder, entry.kind);
        if self.last.as_ref() == Some(&key) {
            return None;
        }
        self.last = Some(key);
        Some(background_path(entry, paths, features))
    }

    /// Forget the last request so the next selection always loads.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn art_folder(entry: &Entry) -> PathBuf {
    match entry.kind {
        EntryKind::Directory => entry.path().to_path_buf(),
        _ => entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    }
}

/// Aspect-preserving size of a `width`×`height` image inside `max_width`×`max_height`.
///
/// The image is scaled to the full width first and shrunk further only if that
/// overflows the height.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let aspect = height as f64 / width as f64;
    let mut fit_w = max_width as f64;
    let mut fit_h = fit_w * aspect;
    if fit_h > max_height as f64 {
        fit_h = max_height as f64;
        fit_w = fit_h / aspect;
    }
    (fit_w.round() as u32, fit_h.round() as u32)
}

/// Scale `image` into the box with [`fit_within`]; returned as-is when it already fits exactly.
pub fn fit_image(image: DecodedImage, max_width: u32, max_height: u32) -> DecodedImage {
    let (width, height) = fit_within(image.width(), image.height(), max_width, max_height);
    if width == 0 || height == 0 || (width, height) == image.dimensions() {
        return image;
    }
    Arc::new(imageops::resize(&*image, width, height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(path: PathBuf, kind: EntryKind) -> Entry {
        Entry::new(path, "x".into(), kind)
    }

    #[test]
    fn background_prefers_folder_art_then_default() {
        let dir = tempdir().unwrap();
        let paths = LibraryPaths::for_root(dir.path(), "x");
        let console = paths.roms.join("Game Boy (GB)");
        let folder = entry(console.clone(), EntryKind::Directory);
        let rom = entry(console.join("tetris.gb"), EntryKind::RomFile);
        let features = FeatureFlags::default();

        assert_eq!(background_path(&folder, &paths, features), default_background(&paths));

        let folder_bg = console.join(".media/bg.png");
        let list_bg = console.join(".media/bglist.png");
        std::fs::create_dir_all(folder_bg.parent().unwrap()).unwrap();
        std::fs::write(&folder_bg, "").unwrap();
        std::fs::write(&list_bg, "").unwrap();
        assert_eq!(background_path(&folder, &paths, features), folder_bg);
        assert_eq!(background_path(&rom, &paths, features), list_bg);

        let plain = FeatureFlags {
            folder_backgrounds: false,
            ..features
        };
        assert_eq!(background_path(&rom, &paths, plain), default_background(&paths));
    }

    #[test]
    fn tracker_skips_repeat_folders() {
        let paths = LibraryPaths::for_root("/sd", "x");
        let features = FeatureFlags::default();
        let mut tracker = ArtTracker::new();
        let a = entry(PathBuf::from("/sd/Roms/GB/a.gb"), EntryKind::RomFile);
        let b = entry(PathBuf::from("/sd/Roms/GB/b.gb"), EntryKind::RomFile);
        let sub = entry(PathBuf::from("/sd/Roms/GB/Hacks"), EntryKind::Directory);

        assert!(tracker.background_request(&a, &paths, features).is_some());
        assert!(tracker.background_request(&b, &paths, features).is_none());
        assert!(tracker.background_request(&sub, &paths, features).is_some());
        assert!(tracker.background_request(&a, &paths, features).is_some());
        tracker.reset();
        assert!(tracker.background_request(&a, &paths, features).is_some());
    }

    #[test]
    fn thumbnails_only_for_roms_when_enabled() {
        let rom = entry(PathBuf::from("/sd/Roms/GB/Tetris (World).gb"), EntryKind::RomFile);
        let features = FeatureFlags::default();
        assert_eq!(
            thumbnail_path(&rom, features),
            Some(PathBuf::from("/sd/Roms/GB/.media/Tetris (World).png"))
        );
        let folder = entry(PathBuf::from("/sd/Roms/GB"), EntryKind::Directory);
        assert_eq!(thumbnail_path(&folder, features), None);
        let off = FeatureFlags {
            show_game_art: false,
            ..features
        };
        assert_eq!(thumbnail_path(&rom, off), None);
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(fit_within(200, 100, 100, 100), (100, 50));
        assert_eq!(fit_within(100, 200, 100, 100), (50, 100));
        assert_eq!(fit_within(50, 50, 120, 80), (80, 80));
        assert_eq!(fit_within(0, 10, 100, 100), (0, 0));
    }

    #[test]
    fn fit_image_scales_into_the_box() {
        let wide = Arc::new(image::RgbaImage::from_pixel(480, 240, image::Rgba([9, 8, 7, 255])));
        let scaled = fit_image(wide, 240, 240);
        assert_eq!(scaled.dimensions(), (240, 120));
        assert_eq!(scaled.get_pixel(100, 60), &image::Rgba([9, 8, 7, 255]));

        let exact = Arc::new(image::RgbaImage::new(240, 120));
        let same = fit_image(Arc::clone(&exact), 240, 240);
        assert!(Arc::ptr_eq(&exact, &same));
    }
}
