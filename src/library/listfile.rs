//! Line-oriented side files: collections, disc lists, maps, recents.

use std::path::{Path, PathBuf};

/// Non-empty lines of a text file with `\r\n`/`\r` endings normalized.
///
/// A missing or unreadable file reads as empty.
pub fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => split_lines(&text),
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read {}: {err}", path.display());
            }
            Vec::new()
        }
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// First line of a single-value file, trimmed.
pub fn read_value(path: &Path) -> Option<String> {
    read_lines(path)
        .into_iter()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Folder-named `.cue` inside `dir` (`Game/Game.cue`).
pub fn folder_cue(dir: &Path) -> PathBuf {
    folder_sibling(dir, "cue")
}

/// Folder-named `.m3u` inside `dir` (`Game/Game.m3u`).
pub fn folder_m3u(dir: &Path) -> PathBuf {
    folder_sibling(dir, "m3u")
}

fn folder_sibling(dir: &Path, ext: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{name}.{ext}"))
}

/// The disc list of the multi-disc title `rom` belongs to, if any.
pub fn sibling_m3u(rom: &Path) -> Option<PathBuf> {
    let m3u = folder_m3u(rom.parent()?);
    m3u.is_file().then_some(m3u)
}

/// Existing discs listed by an `.m3u`, resolved against its folder.
pub fn disc_paths(m3u: &Path) -> Vec<PathBuf> {
    let Some(base) = m3u.parent() else {
        return Vec::new();
    };
    read_lines(m3u)
        .iter()
        .map(|line| base.join(line.trim()))
        .filter(|disc| disc.exists())
        .collect()
}

/// First listed disc, provided it exists.
pub fn first_disc(m3u: &Path) -> Option<PathBuf> {
    let base = m3u.parent()?;
    let line = read_lines(m3u).into_iter().next()?;
    let disc = base.join(line.trim());
    disc.exists().then_some(disc)
}
