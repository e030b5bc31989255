use std::path::{Path, PathBuf};

use romshelf::config::LibrarySettings;
use tempfile::TempDir;

pub const PLATFORM: &str = "handheld";

/// A library tree on disk with its runtime files kept beside it.
pub struct LibraryTree {
    pub temp: TempDir,
    pub settings: LibrarySettings,
}

impl LibraryTree {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let settings = LibrarySettings {
            root: temp.path().join("sd"),
            platform: PLATFORM.to_string(),
            runtime_dir: Some(temp.path().join("run")),
            ..LibrarySettings::default()
        };
        std::fs::create_dir_all(&settings.root).expect("create library root");
        Self { temp, settings }
    }

    pub fn root(&self) -> &Path {
        &self.settings.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create an empty file (and its parents) at `relative`.
    pub fn file(&self, relative: &str) -> PathBuf {
        self.write(relative, "")
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write library file");
        path
    }

    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(&path).expect("create library dir");
        path
    }

    /// Install an emulator pak under the system paks folder.
    pub fn emulator(&self, name: &str) -> PathBuf {
        self.write(
            &format!(".system/{PLATFORM}/paks/Emus/{name}.pak/launch.sh"),
            "#!/bin/sh\n",
        )
    }
}
