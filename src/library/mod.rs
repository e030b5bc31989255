//! Library model: paths, naming rules and the directory indexer.

pub mod alias;
pub mod catalog;
pub mod classify;
pub mod indexer;
pub mod listfile;
pub mod names;
pub mod paths;

pub use alias::AliasMap;
pub use catalog::{Directory, Entry, EntryKind};
pub use classify::{DirectoryKind, classify};
pub use indexer::LibraryIndexer;
pub use paths::{LibraryPaths, RECENTS_FOLDER_NAME};
