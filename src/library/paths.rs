use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;

use super::names;

/// Folder name of the synthetic recents frame under the library root.
pub const RECENTS_FOLDER_NAME: &str = "Recently Played";
const STATE_DIR_NAME: &str = ".romshelf";

/// Every well-known location of one library, resolved once from settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryPaths {
    pub root: PathBuf,
    pub platform: String,
    pub roms: PathBuf,
    pub collections: PathBuf,
    pub tools: PathBuf,
    /// Sentinel path of the synthetic "Recently Played" frame.
    pub recents_sentinel: PathBuf,
    pub system_paks: PathBuf,
    /// Resume descriptors and previews live under `<state_root>/<emu>/`.
    pub state_root: PathBuf,
    pub recents_file: PathBuf,
    pub last_file: PathBuf,
    pub change_disc_file: PathBuf,
    pub next_command_file: PathBuf,
    pub resume_slot_file: PathBuf,
    /// Rom to relaunch straight into its save state on the next start.
    pub auto_resume_file: PathBuf,
}

impl LibraryPaths {
    /// Resolve the layout described by the `[library]` config section.
    pub fn from_settings(settings: &LibrarySettings) -> Self {
        let root = settings.root.clone();
        let platform = settings.platform.clone();
        let system_paks = settings
            .system_paks
            .clone()
            .unwrap_or_else(|| root.join(".system").join(&platform).join("paks"));
        let userdata = settings
            .userdata
            .clone()
            .unwrap_or_else(|| root.join(".userdata").join("shared"));
        let runtime = settings
            .runtime_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("romshelf"));
        let state_root = userdata.join(STATE_DIR_NAME);
        Self {
            auto_resume_file: state_root.join("auto_resume.txt"),
            roms: root.join("Roms"),
            collections: root.join("Collections"),
            tools: root.join("Tools").join(&platform),
            recents_sentinel: root.join(RECENTS_FOLDER_NAME),
            system_paks,
            recents_file: state_root.join("recent.txt"),
            state_root,
            last_file: runtime.join("last.txt"),
            change_disc_file: runtime.join("change_disc.txt"),
            next_command_file: runtime.join("next.sh"),
            resume_slot_file: runtime.join("resume_slot.txt"),
            root,
            platform,
        }
    }

    /// Layout for `root` with every optional location at its default.
    pub fn for_root(root: impl Into<PathBuf>, platform: &str) -> Self {
        Self::from_settings(&LibrarySettings {
            root: root.into(),
            platform: platform.to_string(),
            ..LibrarySettings::default()
        })
    }

    /// Library-relative form (`/Roms/...`) that survives a change of mount point.
    pub fn to_relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(format!("/{}", parts.join("/")))
    }

    /// Absolute path for a library-relative string.
    pub fn from_relative(&self, rel: &str) -> PathBuf {
        self.root.join(rel.trim_start_matches('/'))
    }

    pub fn display_name(&self, path: &Path) -> String {
        if path == self.recents_sentinel {
            return RECENTS_FOLDER_NAME.to_string();
        }
        names::display_name(path, &self.platform)
    }

    pub fn emulator_name(&self, path: &Path) -> String {
        names::emulator_name(path, &self.roms)
    }

    /// Top-level console folder directly under `Roms`.
    pub fn is_console_dir(&self, path: &Path) -> bool {
        path.parent() == Some(self.roms.as_path())
    }

    pub fn is_under_roms(&self, path: &Path) -> bool {
        path.starts_with(&self.roms)
    }

    /// Anything inside the Collections tree, the tree root included.
    pub fn is_under_collections(&self, path: &Path) -> bool {
        path.starts_with(&self.collections)
    }

    /// A collection list file (not the Collections folder itself).
    pub fn is_collection_file(&self, path: &Path) -> bool {
        path != self.collections
            && self.is_under_collections(path)
            && path.extension().is_some_and(|ext| ext == "txt")
    }

    /// Resume slot descriptor for an emulator and rom file name.
    pub fn slot_descriptor(&self, emulator: &str, rom_file: &str) -> PathBuf {
        self.state_root.join(emulator).join(format!("{rom_file}.txt"))
    }

    /// Save-state preview image for an emulator and rom file name.
    pub fn slot_preview(&self, emulator: &str, rom_file: &str) -> PathBuf {
        self.state_root.join(emulator).join(format!("{rom_file}.0.bmp"))
    }

    /// Disc chosen by a multi-disc title's save in `slot`.
    pub fn slot_disc(&self, emulator: &str, m3u_file: &str, slot: &str) -> PathBuf {
        self.state_root
            .join(emulator)
            .join(format!("{m3u_file}.{slot}.txt"))
    }
}
