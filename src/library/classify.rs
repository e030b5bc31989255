use std::path::Path;

use super::paths::LibraryPaths;

/// What kind of listing a path produces, decided once from the path alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectoryKind {
    /// The library root.
    Root,
    /// The synthetic "Recently Played" frame.
    Recents,
    /// The Collections folder or a folder beneath it.
    CollectionsFolder,
    /// A `.txt` collection list.
    Collection,
    /// An `.m3u` disc list.
    DiscList,
    /// A console folder directly under `Roms`; may collate siblings.
    Console,
    /// Any other folder.
    Plain,
}

impl DirectoryKind {
    /// Recents and collection listings keep their own order and skip the alpha index.
    pub fn has_alpha_index(self) -> bool {
        !matches!(
            self,
            DirectoryKind::Recents | DirectoryKind::CollectionsFolder | DirectoryKind::Collection
        )
    }

    /// Collections share one `map.txt` at the Collections root.
    pub fn uses_collections_map(self) -> bool {
        matches!(
            self,
            DirectoryKind::CollectionsFolder | DirectoryKind::Collection
        )
    }
}

/// Classify `path` against the library layout.
pub fn classify(path: &Path, paths: &LibraryPaths) -> DirectoryKind {
    if path == paths.root {
        DirectoryKind::Root
    } else if path == paths.recents_sentinel {
        DirectoryKind::Recents
    } else if paths.is_collection_file(path) {
        DirectoryKind::Collection
    } else if path.extension().is_some_and(|ext| ext == "m3u") {
        DirectoryKind::DiscList
    } else if paths.is_under_collections(path) {
        DirectoryKind::CollectionsFolder
    } else if paths.is_console_dir(path) {
        DirectoryKind::Console
    } else {
        DirectoryKind::Plain
    }
}
