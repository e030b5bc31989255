//! Most-recently-played history, persisted as `path[<TAB>alias]` lines.

use std::path::{Path, PathBuf};

use crate::launch::EmulatorCatalog;
use crate::library::{Entry, EntryKind, LibraryPaths, listfile};
use crate::store::{self, StoreError};

/// History length; a multiple of every menu page size in use.
pub const MAX_RECENTS: usize = 24;

/// One history record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recent {
    /// Library-relative path (`/Roms/...`).
    pub path: String,
    /// Display name the title had when it was launched.
    pub alias: Option<String>,
    /// Whether the owning emulator is installed right now.
    pub available: bool,
}

impl Recent {
    fn new(
        path: String,
        alias: Option<String>,
        paths: &LibraryPaths,
        emulators: &dyn EmulatorCatalog,
    ) -> Self {
        let emulator = paths.emulator_name(&paths.from_relative(&path));
        Self {
            available: emulators.has_emulator(&emulator),
            alias: alias.filter(|alias| !alias.is_empty()),
            path,
        }
    }

    /// Browser entry for this record; `None` while its emulator is missing.
    pub fn to_entry(&self, paths: &LibraryPaths) -> Option<Entry> {
        if !self.available {
            return None;
        }
        let abs = paths.from_relative(&self.path);
        let kind = if self.path.ends_with(".pak") {
            EntryKind::PackageApp
        } else {
            EntryKind::RomFile
        };
        let name = self
            .alias
            .clone()
            .unwrap_or_else(|| paths.display_name(&abs));
        Some(Entry::new(abs, name, kind))
    }
}

/// Ordered history, newest first, capped at [`MAX_RECENTS`].
#[derive(Clone, Debug)]
pub struct RecentsStore {
    items: Vec<Recent>,
    file: PathBuf,
    capacity: usize,
}

impl RecentsStore {
    /// An empty store persisting to `file`.
    pub fn empty(file: PathBuf) -> Self {
        Self {
            items: Vec::new(),
            file,
            capacity: MAX_RECENTS,
        }
    }

    /// Read the history, dropping vanished roms and all but the newest disc of
    /// each multi-disc title, then write the cleaned list back.
    ///
    /// A pending change-disc handoff becomes the newest record.
    pub fn load(paths: &LibraryPaths, emulators: &dyn EmulatorCatalog) -> Self {
        let mut store = Self::empty(paths.recents_file.clone());
        let mut disc_folders: Vec<String> = Vec::new();

        if paths.change_disc_file.exists() {
            if let Some(disc) = listfile::read_value(&paths.change_disc_file)
                .map(PathBuf::from)
                .filter(|disc| disc.exists())
                && let Some(rel) = paths.to_relative(&disc)
            {
                disc_folders.push(parent_prefix(&rel).to_string());
                store.items.push(Recent::new(rel, None, paths, emulators));
            }
            if let Err(err) = store::remove_file(&paths.change_disc_file) {
                tracing::warn!("{err}");
            }
        }

        for line in listfile::read_lines(&paths.recents_file) {
            if store.items.len() >= store.capacity {
                break;
            }
            let (rel, alias) = match line.split_once('\t') {
                Some((rel, alias)) => (rel, Some(alias.to_string())),
                None => (line.as_str(), None),
            };
            let abs = paths.from_relative(rel);
            if !abs.exists() || store.position(rel).is_some() {
                continue;
            }
            if listfile::sibling_m3u(&abs).is_some() {
                let folder = parent_prefix(rel);
                if disc_folders.iter().any(|newer| folder.starts_with(newer.as_str())) {
                    continue;
                }
                disc_folders.push(folder.to_string());
            }
            store
                .items
                .push(Recent::new(rel.to_string(), alias, paths, emulators));
        }

        tracing::debug!("Loaded {} recents", store.items.len());
        store.persist();
        store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recent> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recent> {
        self.items.iter()
    }

    /// True when at least one record can be launched.
    pub fn has_available(&self) -> bool {
        self.items.iter().any(|recent| recent.available)
    }

    /// Index of a library-relative path.
    pub fn position(&self, rel: &str) -> Option<usize> {
        self.items.iter().position(|recent| recent.path == rel)
    }

    /// Record a launch: move an existing record to the front or insert a new one,
    /// evicting the oldest at capacity. Persists immediately.
    pub fn add_or_bump(
        &mut self,
        path: &Path,
        alias: Option<&str>,
        paths: &LibraryPaths,
        emulators: &dyn EmulatorCatalog,
    ) {
        let Some(rel) = paths.to_relative(path) else {
            tracing::debug!("Not recording {} outside the library", path.display());
            return;
        };
        match self.position(&rel) {
            Some(index) => {
                let recent = self.items.remove(index);
                self.items.insert(0, recent);
            }
            None => {
                while self.items.len() >= self.capacity {
                    self.items.pop();
                }
                let alias = alias.map(str::to_string);
                self.items
                    .insert(0, Recent::new(rel, alias, paths, emulators));
            }
        }
        self.persist();
    }

    /// Drop one record and persist.
    pub fn remove(&mut self, index: usize) -> Option<Recent> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.persist();
        Some(removed)
    }

    /// Entries for the recents frame, skipping unavailable titles.
    pub fn entries(&self, paths: &LibraryPaths) -> Vec<Entry> {
        self.items
            .iter()
            .filter_map(|recent| recent.to_entry(paths))
            .collect()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let mut text = String::new();
        for recent in &self.items {
            text.push_str(&recent.path);
            if let Some(alias) = &recent.alias {
                text.push('\t');
                text.push_str(alias);
            }
            text.push('\n');
        }
        store::write_file(&self.file, &text)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            tracing::warn!("Failed to persist recents: {err}");
        }
    }
}

fn parent_prefix(rel: &str) -> &str {
    match rel.rfind('/') {
        Some(slash) => &rel[..=slash],
        None => rel,
    }
}
