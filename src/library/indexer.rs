//! Builds a [`Directory`] listing from the filesystem.
//!
//! Every listing goes through the same pipeline: collect entries for the path's
//! [`DirectoryKind`], apply the applicable `map.txt`, disambiguate neighbours that
//! share a name, then record the alpha jump table.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FeatureFlags;
use crate::launch::EmulatorCatalog;
use crate::recents::RecentsStore;

use super::alias::AliasMap;
use super::catalog::{Directory, Entry, EntryKind};
use super::classify::{DirectoryKind, classify};
use super::listfile;
use super::names::{self, compare_names, hide};
use super::paths::LibraryPaths;

const MAP_FILE_NAME: &str = "map.txt";

/// Filesystem-backed listing builder.
pub struct LibraryIndexer<'a> {
    paths: &'a LibraryPaths,
    emulators: &'a dyn EmulatorCatalog,
    features: FeatureFlags,
}

impl<'a> LibraryIndexer<'a> {
    pub fn new(
        paths: &'a LibraryPaths,
        emulators: &'a dyn EmulatorCatalog,
        features: FeatureFlags,
    ) -> Self {
        Self {
            paths,
            emulators,
            features,
        }
    }

    /// Build the listing for `path`. Unreadable locations produce an empty listing.
    pub fn build(&self, path: &Path, recents: &RecentsStore) -> Directory {
        let kind = classify(path, self.paths);
        let entries = match kind {
            DirectoryKind::Root => self.root_entries(recents),
            DirectoryKind::Recents => recents.entries(self.paths),
            DirectoryKind::Collection => self.collection_entries(path),
            DirectoryKind::DiscList => disc_entries(path),
            DirectoryKind::Console => self.console_entries(path),
            DirectoryKind::CollectionsFolder | DirectoryKind::Plain => {
                let mut entries = self.folder_entries(path);
                sort_entries(&mut entries);
                entries
            }
        };
        let mut directory = Directory::new(
            path.to_path_buf(),
            self.paths.display_name(path),
            kind,
            entries,
        );
        self.index(&mut directory);
        tracing::debug!(
            "Indexed {} ({:?}): {} entries",
            path.display(),
            kind,
            directory.len()
        );
        directory
    }

    fn index(&self, directory: &mut Directory) {
        let map_path = if directory.kind.uses_collections_map() {
            self.paths.collections.join(MAP_FILE_NAME)
        } else {
            directory.path.join(MAP_FILE_NAME)
        };
        if let Some(map) = AliasMap::load(&map_path)
            && map.apply(&mut directory.entries, true)
        {
            sort_entries(&mut directory.entries);
        }
        self.disambiguate(&mut directory.entries);
        if directory.kind.has_alpha_index() {
            directory.alphas = alpha_index(&mut directory.entries);
        }
    }

    fn disambiguate(&self, entries: &mut [Entry]) {
        for idx in 1..entries.len() {
            let (before, after) = entries.split_at_mut(idx);
            let prior = &mut before[idx - 1];
            let entry = &mut after[0];
            if prior.name != entry.name {
                continue;
            }
            let prior_file = prior.file_name();
            let entry_file = entry.file_name();
            if prior_file == entry_file {
                prior.unique = Some(self.tagged_name(prior));
                entry.unique = Some(self.tagged_name(entry));
            } else {
                prior.unique = Some(prior_file);
                entry.unique = Some(entry_file);
            }
        }
    }

    fn tagged_name(&self, entry: &Entry) -> String {
        format!(
            "{} ({})",
            entry.name,
            self.paths.emulator_name(entry.path())
        )
    }

    fn entry(&self, path: PathBuf, kind: EntryKind) -> Entry {
        let name = self.paths.display_name(&path);
        Entry::new(path, name, kind)
    }

    fn root_entries(&self, recents: &RecentsStore) -> Vec<Entry> {
        let mut root = Vec::new();
        if self.features.show_recents && recents.has_available() {
            root.push(self.entry(self.paths.recents_sentinel.clone(), EntryKind::Directory));
        }

        let mut consoles: Vec<Entry> = visible_children(&self.paths.roms)
            .into_iter()
            .filter(|path| path.is_dir() && self.has_roms(path))
            .map(|path| self.entry(path, EntryKind::Directory))
            .collect();
        sort_entries(&mut consoles);
        consoles.dedup_by(|later, kept| {
            let duplicate = compare_names(&later.name, &kept.name) == Ordering::Equal;
            if duplicate {
                tracing::debug!("Dropping duplicate console folder {}", later.path().display());
            }
            duplicate
        });
        if let Some(map) = AliasMap::load(&self.paths.roms.join(MAP_FILE_NAME))
            && map.apply(&mut consoles, false)
        {
            sort_entries(&mut consoles);
        }

        let collections = visible_children(&self.paths.collections);
        let has_consoles = !consoles.is_empty();
        root.append(&mut consoles);
        if !collections.is_empty() {
            if has_consoles {
                root.push(self.entry(self.paths.collections.clone(), EntryKind::Directory));
            } else {
                let mut promoted: Vec<Entry> = collections
                    .into_iter()
                    .map(|path| self.entry(path, EntryKind::Directory))
                    .collect();
                sort_entries(&mut promoted);
                root.append(&mut promoted);
            }
        }

        if !self.features.simple_mode && self.paths.tools.exists() {
            root.push(self.entry(self.paths.tools.clone(), EntryKind::Directory));
        }
        root
    }

    /// A console folder qualifies when its emulator is installed and it has a visible child.
    fn has_roms(&self, console: &Path) -> bool {
        let emulator = self.paths.emulator_name(console);
        if !self.emulators.has_emulator(&emulator) {
            tracing::debug!("No emulator {emulator} for {}", console.display());
            return false;
        }
        !visible_children(console).is_empty()
    }

    fn collection_entries(&self, path: &Path) -> Vec<Entry> {
        listfile::read_lines(path)
            .iter()
            .map(|line| self.paths.from_relative(line.trim()))
            .filter(|rom| rom.exists())
            .map(|rom| {
                let kind = if has_suffix(&rom, ".pak") {
                    EntryKind::PackageApp
                } else {
                    EntryKind::RomFile
                };
                self.entry(rom, kind)
            })
            .collect()
    }

    /// Console folders sharing a `Name (` prefix list as one merged folder.
    fn console_entries(&self, path: &Path) -> Vec<Entry> {
        let mut entries = match names::collation_prefix(path) {
            Some(prefix) => visible_children(&self.paths.roms)
                .into_iter()
                .filter(|sibling| {
                    sibling.is_dir() && sibling.to_string_lossy().starts_with(prefix.as_str())
                })
                .flat_map(|sibling| self.folder_entries(&sibling))
                .collect(),
            None => self.folder_entries(path),
        };
        sort_entries(&mut entries);
        entries
    }

    fn folder_entries(&self, dir: &Path) -> Vec<Entry> {
        let in_collections = self.paths.is_under_collections(dir);
        visible_children(dir)
            .into_iter()
            .map(|child| {
                let kind = if child.is_dir() {
                    if has_suffix(&child, ".pak") {
                        EntryKind::PackageApp
                    } else {
                        EntryKind::Directory
                    }
                } else if in_collections {
                    EntryKind::Directory
                } else {
                    EntryKind::RomFile
                };
                self.entry(child, kind)
            })
            .collect()
    }
}

fn disc_entries(m3u: &Path) -> Vec<Entry> {
    listfile::disc_paths(m3u)
        .into_iter()
        .enumerate()
        .map(|(idx, disc)| Entry::new(disc, format!("Disc {}", idx + 1), EntryKind::RomFile))
        .collect()
}

/// Children of `dir` that pass the hide filter. Missing folders have none.
fn visible_children(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to list {}: {err}", dir.display());
            }
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !hide(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect()
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().ends_with(suffix)
}

/// Case-insensitive by name; ties fall back to file name, then full path.
fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        compare_names(&a.name, &b.name)
            .then_with(|| a.file_name().cmp(&b.file_name()))
            .then_with(|| a.path().cmp(b.path()))
    });
}

/// Boundary table over sorted entries; each entry records its boundary's position.
fn alpha_index(entries: &mut [Entry]) -> Vec<usize> {
    let mut alphas = Vec::new();
    let mut current = None;
    for (idx, entry) in entries.iter_mut().enumerate() {
        let bucket = names::alpha_bucket(&entry.name);
        if current != Some(bucket) {
            alphas.push(idx);
            current = Some(bucket);
        }
        entry.alpha = alphas.len() - 1;
    }
    alphas
}
