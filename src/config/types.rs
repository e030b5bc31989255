use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::{
    clamp_page_size, clamp_row_height, default_animation_frames, default_false,
    default_label_padding, default_origin, default_page_size, default_platform, default_root,
    default_row_height, default_row_width, default_settle_ms, default_true,
};

/// Aggregate launcher settings loaded from `config.toml`.
///
/// Config sections (TOML): `library`, `features`, `layout`, `assets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibrarySettings,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

impl AppConfig {
    pub(super) fn normalized(mut self) -> Self {
        self.layout.page_size = clamp_page_size(self.layout.page_size);
        self.layout.row_height = clamp_row_height(self.layout.row_height);
        self
    }
}

/// Where the library and its side files live.
///
/// Config keys: `root`, `platform`, `system_paks`, `userdata`, `runtime_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// Library root; console folders live under `<root>/Roms`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Platform tag used for the Tools folder and per-platform emulator paks.
    #[serde(default = "default_platform")]
    pub platform: String,
    /// System pak directory; defaults to `<root>/.system/<platform>/paks`.
    #[serde(default)]
    pub system_paks: Option<PathBuf>,
    /// Shared userdata directory; defaults to `<root>/.userdata/shared`.
    #[serde(default)]
    pub userdata: Option<PathBuf>,
    /// Volatile handoff files; defaults to `<temp>/romshelf`.
    #[serde(default)]
    pub runtime_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            platform: default_platform(),
            system_paks: None,
            userdata: None,
            runtime_dir: None,
        }
    }
}

/// Feature toggles.
///
/// Config keys: `show_recents`, `simple_mode`, `menu_animations`, `show_game_art`,
/// `folder_backgrounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub show_recents: bool,
    /// Hides the Tools entry.
    #[serde(default = "default_false")]
    pub simple_mode: bool,
    #[serde(default = "default_true")]
    pub menu_animations: bool,
    #[serde(default = "default_true")]
    pub show_game_art: bool,
    #[serde(default = "default_true")]
    pub folder_backgrounds: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            show_recents: true,
            simple_mode: false,
            menu_animations: true,
            show_game_art: true,
            folder_backgrounds: true,
        }
    }
}

/// List geometry shared by navigation and the highlight animation.
///
/// Config keys: `page_size`, `row_height`, `row_width`, `label_padding`, `origin_x`,
/// `origin_y`, `animation_frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Rows visible at once.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_row_height")]
    pub row_height: i32,
    #[serde(default = "default_row_width")]
    pub row_width: i32,
    #[serde(default = "default_label_padding")]
    pub label_padding: i32,
    #[serde(default = "default_origin")]
    pub origin_x: i32,
    #[serde(default = "default_origin")]
    pub origin_y: i32,
    #[serde(default = "default_animation_frames")]
    pub animation_frames: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            row_height: default_row_height(),
            row_width: default_row_width(),
            label_padding: default_label_padding(),
            origin_x: default_origin(),
            origin_y: default_origin(),
            animation_frames: default_animation_frames(),
        }
    }
}

/// Background/thumbnail loader tuning.
///
/// Config keys: `settle_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Pause between dequeuing a request and decoding it.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
        }
    }
}
