//! `map.txt` display-name overrides.

use std::collections::HashMap;
use std::path::Path;

use super::catalog::Entry;
use super::listfile;
use super::names::hide;

/// File name to display name mapping read from a `map.txt`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasMap {
    names: HashMap<String, String>,
}

impl AliasMap {
    /// Parse `filename<TAB>display name` lines; lines without a tab are skipped.
    pub fn parse(text: &str) -> Self {
        let mut names = HashMap::new();
        for line in listfile::split_lines(text) {
            match line.split_once('\t') {
                Some((file, alias)) => {
                    names.insert(file.to_string(), alias.to_string());
                }
                None => tracing::debug!("Skipping map line without a tab: {line:?}"),
            }
        }
        Self { names }
    }

    /// Load the map at `path`; `None` when the file is absent.
    pub fn load(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(Self::parse(&text)),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read alias map {}: {err}", path.display());
                }
                None
            }
        }
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.names.get(file_name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Rename matching entries, then drop any renamed entry that became hidden.
    ///
    /// Returns true when at least one name changed, i.e. the listing needs a re-sort.
    pub fn apply(&self, entries: &mut Vec<Entry>, drop_hidden: bool) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut renamed = false;
        let mut hidden = false;
        for entry in entries.iter_mut() {
            if let Some(alias) = self.get(&entry.file_name()) {
                entry.name = alias.to_string();
                renamed = true;
                hidden |= hide(&entry.name);
            }
        }
        if drop_hidden && hidden {
            entries.retain(|entry| !hide(&entry.name));
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::catalog::EntryKind;
    use std::path::PathBuf;

    fn rom(file: &str, name: &str) -> Entry {
        Entry::new(
            PathBuf::from(format!("/sd/Roms/SNES (SFC)/{file}")),
            name.to_string(),
            EntryKind::RomFile,
        )
    }

    #[test]
    fn parse_skips_lines_without_tab() {
        let map = AliasMap::parse("mario.zip\tSuper Mario World\nbroken line\n\nzelda.zip\tZelda\n");
        assert_eq!(map.get("mario.zip"), Some("Super Mario World"));
        assert_eq!(map.get("zelda.zip"), Some("Zelda"));
        assert_eq!(map.get("broken line"), None);
    }

    #[test]
    fn apply_renames_and_reports_change() {
        let map = AliasMap::parse("mario.zip\tSuper Mario World\n");
        let mut entries = vec![rom("mario.zip", "mario"), rom("zelda.zip", "zelda")];
        assert!(map.apply(&mut entries, true));
        assert_eq!(entries[0].name, "Super Mario World");
        assert_eq!(entries[1].name, "zelda");

        let untouched = AliasMap::parse("other.zip\tOther\n");
        assert!(!untouched.apply(&mut entries, true));

        let empty = AliasMap::parse("no tabs here\n");
        assert!(empty.is_empty());
        assert!(!empty.apply(&mut entries, true));
    }

    #[test]
    fn apply_drops_entries_renamed_to_hidden_names() {
        let map = AliasMap::parse("bios.zip\t.bios\n");
        let mut entries = vec![rom("bios.zip", "bios"), rom("zelda.zip", "zelda")];
        map.apply(&mut entries, true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), "zelda.zip");
    }
}
