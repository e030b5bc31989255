//! Entry and Directory value types.

use std::path::{Path, PathBuf};

use super::classify::DirectoryKind;

/// What activating an entry does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Browsable folder (real or virtual).
    Directory,
    /// Self-launching `.pak` bundle.
    PackageApp,
    /// Rom launched through its console's emulator.
    RomFile,
}

/// One browsable catalog item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    /// Sort key; derived from the file name, possibly replaced by an alias.
    pub name: String,
    /// Disambiguation label, set only when a neighbour shares `name`.
    pub unique: Option<String>,
    pub kind: EntryKind,
    pub(crate) alpha: usize,
}

impl Entry {
    pub fn new(path: PathBuf, name: String, kind: EntryKind) -> Self {
        Self {
            path,
            name,
            unique: None,
            kind,
            alpha: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file name of the backing path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Text shown in the list: the unique label when present.
    pub fn label(&self) -> &str {
        self.unique.as_deref().unwrap_or(&self.name)
    }

    /// Position of this entry's bucket in the owning directory's alpha table.
    pub fn alpha_bucket(&self) -> usize {
        self.alpha
    }
}

/// A materialized listing for one browsable location.
#[derive(Clone, Debug)]
pub struct Directory {
    pub path: PathBuf,
    pub name: String,
    pub kind: DirectoryKind,
    pub entries: Vec<Entry>,
    /// Entry index where each alpha bucket starts; empty for unindexed kinds.
    pub alphas: Vec<usize>,
    pub selected: usize,
    /// Visible window `[start, end)`.
    pub start: usize,
    pub end: usize,
}

impl Directory {
    pub fn new(path: PathBuf, name: String, kind: DirectoryKind, entries: Vec<Entry>) -> Self {
        Self {
            path,
            name,
            kind,
            entries,
            alphas: Vec::new(),
            selected: 0,
            start: 0,
            end: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    /// Entries inside the viewport.
    pub fn visible(&self) -> &[Entry] {
        let end = self.end.min(self.entries.len());
        let start = self.start.min(end);
        &self.entries[start..end]
    }

    /// Index of the entry with exactly this path.
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|entry| entry.path() == path)
    }
}
