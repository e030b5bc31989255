//! Emulator lookup and launch handoff.
//!
//! The launcher never runs games itself. It resolves the command and leaves it
//! in the next-command file for the supervisor that restarts it afterwards.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::library::{LibraryPaths, listfile};
use crate::store::{self, StoreError};

/// Hidden default save slot loaded when a game starts without resuming.
pub const DEFAULT_RESUME_SLOT: &str = "8";
/// Slot written by the emulator when the device powers off mid-game.
pub const AUTO_RESUME_SLOT: &str = "9";

/// Reasons an entry could not be handed to the supervisor.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No installed pak provides the emulator.
    #[error("No emulator named {name} is installed")]
    MissingEmulator { name: String },
    /// A disc list with no usable first disc.
    #[error("No playable disc listed in {path}")]
    NoDisc { path: PathBuf },
    /// Writing the handoff files failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Name → launcher resolution for emulator paks.
pub trait EmulatorCatalog {
    /// Launch script for the emulator, if installed.
    fn launcher_path(&self, name: &str) -> Option<PathBuf>;

    fn has_emulator(&self, name: &str) -> bool {
        self.launcher_path(name).is_some()
    }
}

/// Emulator paks installed under the system paks folder or the library's `Emus` folder.
#[derive(Clone, Debug)]
pub struct PakEmulators {
    system_paks: PathBuf,
    library_emus: PathBuf,
}

impl PakEmulators {
    pub fn new(paths: &LibraryPaths) -> Self {
        Self {
            system_paks: paths.system_paks.join("Emus"),
            library_emus: paths.root.join("Emus").join(&paths.platform),
        }
    }
}

impl EmulatorCatalog for PakEmulators {
    fn launcher_path(&self, name: &str) -> Option<PathBuf> {
        let pak = format!("{name}.pak");
        [&self.system_paks, &self.library_emus]
            .into_iter()
            .map(|dir| dir.join(&pak).join("launch.sh"))
            .find(|script| script.is_file())
    }
}

/// Quote `text` for a POSIX shell.
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// A resolved launch, ready to hand to the supervisor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    pub command: String,
    /// Rom or package being launched.
    pub target: PathBuf,
    pub emulator: Option<String>,
    /// Save slot the emulator should load, if any.
    pub resume_slot: Option<String>,
}

impl LaunchRequest {
    pub fn rom(emulator_launcher: &Path, emulator: &str, rom: &Path, slot: String) -> Self {
        Self {
            command: format!(
                "{} {}",
                shell_quote(&emulator_launcher.to_string_lossy()),
                shell_quote(&rom.to_string_lossy())
            ),
            target: rom.to_path_buf(),
            emulator: Some(emulator.to_string()),
            resume_slot: Some(slot),
        }
    }

    pub fn package(pak: &Path) -> Self {
        Self {
            command: shell_quote(&pak.join("launch.sh").to_string_lossy()),
            target: pak.to_path_buf(),
            emulator: None,
            resume_slot: None,
        }
    }

    /// Write the command and slot to the runtime handoff files.
    pub fn queue(&self, paths: &LibraryPaths) -> Result<(), LaunchError> {
        if let Some(slot) = &self.resume_slot {
            store::write_file(&paths.resume_slot_file, slot)?;
        }
        store::write_file(&paths.next_command_file, &self.command)?;
        tracing::info!("Queued launch: {}", self.command);
        Ok(())
    }
}

/// Relaunch request for a game interrupted by power-off.
///
/// The handoff file is consumed even when the rom or its emulator has since
/// disappeared; the launcher then starts normally. Recents are left untouched.
pub fn auto_resume(paths: &LibraryPaths, emulators: &dyn EmulatorCatalog) -> Option<LaunchRequest> {
    if !paths.auto_resume_file.exists() {
        return None;
    }
    let value = listfile::read_value(&paths.auto_resume_file);
    if let Err(err) = store::remove_file(&paths.auto_resume_file) {
        tracing::warn!("{err}");
    }
    let rom = paths.from_relative(&value?);
    if !rom.exists() {
        tracing::info!("Auto-resume rom {} is gone", rom.display());
        return None;
    }
    let emulator = paths.emulator_name(&rom);
    let Some(launcher) = emulators.launcher_path(&emulator) else {
        tracing::info!("Auto-resume emulator {emulator} is not installed");
        return None;
    };
    tracing::info!("Auto-resuming {}", rom.display());
    Some(LaunchRequest::rom(
        &launcher,
        &emulator,
        &rom,
        AUTO_RESUME_SLOT.to_string(),
    ))
}
