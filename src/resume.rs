//! Save-state availability for the current selection.

use std::path::{Path, PathBuf};

use crate::library::{Entry, EntryKind, LibraryPaths, listfile};

/// Whether the selected title has a resumable save state, and where it lives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResumeState {
    pub can_resume: bool,
    pub has_preview: bool,
    /// Slot descriptor; holds the slot number to hand to the emulator.
    pub slot_path: Option<PathBuf>,
    pub preview_path: Option<PathBuf>,
}

impl ResumeState {
    /// Nothing resumable.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_entry(entry: &Entry, paths: &LibraryPaths) -> Self {
        Self::for_path(entry.path(), entry.kind, paths)
    }

    /// Resolve the save-state files for a rom, or for a folder holding a
    /// folder-named `.cue`/`.m3u`. Only titles under `Roms` can resume.
    pub fn for_path(path: &Path, kind: EntryKind, paths: &LibraryPaths) -> Self {
        let Some(resolved) = resumable_path(path, kind, paths) else {
            return Self::none();
        };
        let Some(file) = resolved.file_name().map(|name| name.to_string_lossy().into_owned())
        else {
            return Self::none();
        };
        let emulator = paths.emulator_name(&resolved);
        let slot_path = paths.slot_descriptor(&emulator, &file);
        let preview_path = paths.slot_preview(&emulator, &file);
        Self {
            can_resume: slot_path.is_file(),
            has_preview: preview_path.is_file(),
            slot_path: Some(slot_path),
            preview_path: Some(preview_path),
        }
    }
}

fn resumable_path(path: &Path, kind: EntryKind, paths: &LibraryPaths) -> Option<PathBuf> {
    if !paths.is_under_roms(path) {
        return None;
    }
    let mut resolved = path.to_path_buf();
    if kind == EntryKind::Directory {
        let cue = listfile::folder_cue(path);
        resolved = if cue.exists() {
            cue
        } else {
            let m3u = listfile::folder_m3u(path);
            if !m3u.exists() {
                return None;
            }
            m3u
        };
    }
    let is_m3u = resolved.extension().is_some_and(|ext| ext == "m3u");
    if !is_m3u && let Some(m3u) = listfile::sibling_m3u(&resolved) {
        resolved = m3u;
    }
    Some(resolved)
}
