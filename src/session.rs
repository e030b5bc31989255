//! Browsing session: the navigation stack plus the state derived from it.
//!
//! A [`Session`] is owned by the input thread. It builds listings, tracks the
//! selection, records launches in the recents history and persists the last
//! position so the next start reopens the same place.

use std::path::{Path, PathBuf};

use crate::config::FeatureFlags;
use crate::launch::{DEFAULT_RESUME_SLOT, EmulatorCatalog, LaunchError, LaunchRequest};
use crate::library::{
    Directory, DirectoryKind, Entry, EntryKind, LibraryIndexer, LibraryPaths, listfile, names,
};
use crate::navigation::NavigationStack;
use crate::recents::RecentsStore;
use crate::resume::ResumeState;
use crate::store;

/// Result of activating an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Still browsing; the stack may have changed.
    Browsing,
    /// A title was chosen; hand the request to the supervisor.
    Launch(LaunchRequest),
}

pub struct Session {
    paths: LibraryPaths,
    features: FeatureFlags,
    emulators: Box<dyn EmulatorCatalog>,
    stack: NavigationStack,
    recents: RecentsStore,
    resume: ResumeState,
}

impl Session {
    /// Load history, open the root and walk back to the last saved position.
    pub fn start(
        paths: LibraryPaths,
        features: FeatureFlags,
        page_size: usize,
        emulators: Box<dyn EmulatorCatalog>,
    ) -> Self {
        let recents = RecentsStore::load(&paths, emulators.as_ref());
        let root = LibraryIndexer::new(&paths, emulators.as_ref(), features)
            .build(&paths.root, &recents);
        let mut session = Self {
            stack: NavigationStack::new(root, page_size),
            paths,
            features,
            emulators,
            recents,
            resume: ResumeState::none(),
        };
        session.restore_last();
        session.refresh_resume();
        tracing::info!(
            "Session started at {} (depth {})",
            session.top().path.display(),
            session.stack.depth()
        );
        session
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    /// The displayed frame.
    pub fn top(&self) -> &Directory {
        self.stack.top()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn page_size(&self) -> usize {
        self.stack.page_size()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.stack.top().selected_entry()
    }

    pub fn resume(&self) -> &ResumeState {
        &self.resume
    }

    pub fn recents(&self) -> &RecentsStore {
        &self.recents
    }

    fn build(&self, path: &Path) -> Directory {
        LibraryIndexer::new(&self.paths, self.emulators.as_ref(), self.features)
            .build(path, &self.recents)
    }

    fn refresh_resume(&mut self) {
        self.resume = match self.selected_entry() {
            Some(entry) => ResumeState::for_entry(entry, &self.paths),
            None => ResumeState::none(),
        };
    }

    pub fn move_selection(&mut self, delta: isize, wrap: bool) -> bool {
        let moved = self.stack.move_selection(delta, wrap);
        if moved {
            self.refresh_resume();
        }
        moved
    }

    pub fn jump_alpha(&mut self, forward: bool) -> bool {
        let moved = self.stack.jump_alpha(forward);
        if moved {
            self.refresh_resume();
        }
        moved
    }

    /// Close the top frame; the root stays.
    pub fn close(&mut self) -> bool {
        let closed = self.stack.close();
        if closed {
            self.refresh_resume();
        }
        closed
    }

    /// Open a folder. With `auto_launch`, a folder holding a folder-named `.cue`
    /// or `.m3u` launches that title instead of listing it.
    pub fn open_directory(&mut self, path: &Path, auto_launch: bool) -> Result<Outcome, LaunchError> {
        if auto_launch {
            let cue = listfile::folder_cue(path);
            if cue.exists() {
                return self.open_rom(&cue, None, Some(path), false);
            }
            let m3u = listfile::folder_m3u(path);
            if m3u.exists() {
                match listfile::first_disc(&m3u) {
                    Some(disc) => return self.open_rom(&disc, None, Some(path), false),
                    None => tracing::warn!("No playable disc in {}", m3u.display()),
                }
            }
        }
        let directory = self.build(path);
        self.stack.push(directory);
        self.refresh_resume();
        Ok(Outcome::Browsing)
    }

    /// Activate the selected entry; `resume` loads its save state when one exists.
    pub fn open_selected(&mut self, resume: bool) -> Result<Outcome, LaunchError> {
        let Some(entry) = self.selected_entry().cloned() else {
            return Ok(Outcome::Browsing);
        };
        match entry.kind {
            EntryKind::RomFile => {
                let top_path = self.top().path.clone();
                let last = self
                    .paths
                    .is_under_collections(&top_path)
                    .then(|| top_path.join(entry.file_name()));
                let resume = resume && self.resume.can_resume;
                self.open_rom(entry.path(), Some(entry.name.as_str()), last.as_deref(), resume)
            }
            EntryKind::PackageApp => Ok(self.open_pak(entry.path())),
            EntryKind::Directory => self.open_directory(entry.path(), true),
        }
    }

    fn open_pak(&mut self, pak: &Path) -> Outcome {
        self.save_last(pak);
        Outcome::Launch(LaunchRequest::package(pak))
    }

    fn open_rom(
        &mut self,
        rom: &Path,
        alias: Option<&str>,
        last: Option<&Path>,
        resume: bool,
    ) -> Result<Outcome, LaunchError> {
        let m3u = listfile::sibling_m3u(rom);
        let recent_path = m3u.clone().unwrap_or_else(|| rom.to_path_buf());
        let mut target = rom.to_path_buf();
        if let Some(m3u) = &m3u
            && rom == m3u.as_path()
        {
            target = listfile::first_disc(m3u).ok_or_else(|| LaunchError::NoDisc {
                path: m3u.clone(),
            })?;
        }

        let emulator = self.paths.emulator_name(&target);
        let launcher = self
            .emulators
            .launcher_path(&emulator)
            .ok_or_else(|| LaunchError::MissingEmulator {
                name: emulator.clone(),
            })?;

        let slot = if resume {
            let slot = self
                .resume
                .slot_path
                .as_deref()
                .and_then(listfile::read_value)
                .unwrap_or_else(|| DEFAULT_RESUME_SLOT.to_string());
            if let Some(m3u) = &m3u
                && let Some(disc) = self.saved_disc(&emulator, m3u, &slot)
            {
                target = disc;
            }
            slot
        } else {
            DEFAULT_RESUME_SLOT.to_string()
        };

        self.recents
            .add_or_bump(&recent_path, alias, &self.paths, self.emulators.as_ref());
        self.save_last(last.unwrap_or(&target));
        Ok(Outcome::Launch(LaunchRequest::rom(
            &launcher, &emulator, &target, slot,
        )))
    }

    /// Disc a multi-disc save state was made on; absolute or relative to the `.m3u`.
    fn saved_disc(&self, emulator: &str, m3u: &Path, slot: &str) -> Option<PathBuf> {
        let m3u_file = m3u.file_name()?.to_string_lossy().into_owned();
        let value = listfile::read_value(&self.paths.slot_disc(emulator, &m3u_file, slot))?;
        let disc = if value.starts_with('/') {
            PathBuf::from(value)
        } else {
            m3u.parent()?.join(value)
        };
        Some(disc)
    }

    /// Forget the selected title from the recents frame.
    pub fn remove_recent(&mut self) -> bool {
        if self.top().kind != DirectoryKind::Recents {
            return false;
        }
        let Some(rel) = self
            .selected_entry()
            .and_then(|entry| self.paths.to_relative(entry.path()))
        else {
            return false;
        };
        let Some(index) = self.recents.position(&rel) else {
            return false;
        };
        self.recents.remove(index);

        let page = self.stack.page_size();
        let previous = self.top().selected;
        let mut rebuilt = self.build(&self.paths.recents_sentinel.clone());
        if rebuilt.is_empty() {
            self.stack.close();
            let root = self.build(&self.paths.root.clone());
            let selected = self.top().selected.min(root.len().saturating_sub(1));
            let top = self.stack.top_mut();
            *top = root;
            top.reset_viewport(page);
            top.scroll_to(selected, page);
        } else {
            rebuilt.reset_viewport(page);
            rebuilt.scroll_to(previous.min(rebuilt.len() - 1), page);
            *self.stack.top_mut() = rebuilt;
        }
        self.refresh_resume();
        true
    }

    /// Persist the selected entry as the position to reopen on the next start.
    pub fn save_position(&self) {
        if let Some(entry) = self.selected_entry() {
            self.save_last(entry.path());
        }
    }

    fn save_last(&self, path: &Path) {
        let path = if self.top().kind == DirectoryKind::Recents {
            self.paths.recents_sentinel.as_path()
        } else {
            path
        };
        if let Err(err) = store::write_file(&self.paths.last_file, &path.to_string_lossy()) {
            tracing::warn!("Failed to save last position: {err}");
        }
    }

    /// Reopen the frames leading to the saved position and select it.
    fn restore_last(&mut self) {
        let Some(value) = listfile::read_value(&self.paths.last_file) else {
            return;
        };
        let last = PathBuf::from(value);
        if !last.starts_with(&self.paths.root) || last == self.paths.root {
            tracing::debug!("Ignoring saved position {}", last.display());
            return;
        }
        let suffix = last
            .file_name()
            .map(|name| format!("/{}", name.to_string_lossy()))
            .unwrap_or_default();
        let in_collections = self.paths.is_under_collections(&last);

        let mut chain: Vec<PathBuf> = last
            .ancestors()
            .take_while(|ancestor| *ancestor != self.paths.root)
            .map(Path::to_path_buf)
            .collect();
        chain.reverse();

        let page = self.stack.page_size();
        let levels = chain.len();
        for (level, path) in chain.into_iter().enumerate() {
            if path == self.paths.roms {
                continue;
            }
            let is_final = level + 1 == levels;
            let collated = if path.to_string_lossy().ends_with(')') && self.paths.is_console_dir(&path) {
                names::collation_prefix(&path)
            } else {
                None
            };
            let matches: Vec<usize> = self
                .top()
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    let text = entry.path().to_string_lossy();
                    entry.path() == path
                        || collated
                            .as_deref()
                            .is_some_and(|prefix| text.starts_with(prefix))
                        || (in_collections && !suffix.is_empty() && text.ends_with(&suffix))
                })
                .map(|(idx, _)| idx)
                .collect();

            for idx in matches {
                let top = self.stack.top_mut();
                top.scroll_to(idx, page);
                let entry = top.entries[idx].clone();
                if is_final && !self.reopens_on_restore(entry.path()) {
                    break;
                }
                if entry.kind == EntryKind::Directory {
                    let directory = self.build(entry.path());
                    self.stack.push(directory);
                    break;
                }
            }
        }
    }

    /// The recents frame and collection lists reopen even as the last element.
    fn reopens_on_restore(&self, path: &Path) -> bool {
        path == self.paths.recents_sentinel
            || (path != self.paths.collections && self.paths.is_under_collections(path))
    }
}
