//! Naming conventions shared by the indexer, recents and resume lookups.

use std::cmp::Ordering;
use std::path::Path;

/// File names the browser never lists.
pub fn hide(file_name: &str) -> bool {
    file_name.starts_with('.') || file_name.ends_with(".disabled") || file_name == "map.txt"
}

/// Human-facing name derived from a path.
///
/// Strips short extensions (repeatedly, so `cart.p8.png` becomes `cart`), cuts
/// trailing `(...)`/`[...]` tags and trims whitespace. A Tools path ending in the
/// platform folder is named after its parent.
pub fn display_name(path: &Path, platform: &str) -> String {
    let mut source = path;
    if !platform.is_empty()
        && path.file_name().is_some_and(|name| name == platform)
        && let Some(parent) = path.parent()
    {
        source = parent;
    }
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string_lossy().into_owned());

    let stripped = strip_extensions(&file_name);
    let mut name = strip_tags(stripped);
    if name.is_empty() {
        name = stripped;
    }
    name.trim_end().to_string()
}

fn strip_extensions(name: &str) -> &str {
    let mut out = name;
    while let Some(dot) = out.rfind('.') {
        let ext = &out[dot + 1..];
        if (2..=3).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            out = &out[..dot];
        } else {
            break;
        }
    }
    out
}

fn strip_tags(name: &str) -> &str {
    let mut out = name;
    loop {
        let cut = out.rfind('(').or_else(|| out.rfind('['));
        match cut {
            Some(0) | None => return out,
            Some(idx) => out = &out[..idx],
        }
    }
}

/// Emulator tag for a path: the `(TAG)` of its console folder, or the folder name.
pub fn emulator_name(path: &Path, roms_root: &Path) -> String {
    let base = match path.strip_prefix(roms_root) {
        Ok(rel) => rel
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default(),
        Err(_) => path.to_string_lossy().into_owned(),
    };
    match base.rfind('(') {
        Some(open) => {
            let tag = &base[open + 1..];
            tag.split(')').next().unwrap_or(tag).to_string()
        }
        None => base,
    }
}

/// Path text up to and including the last `(`, shared by collated console folders.
///
/// `None` unless the final component itself carries a `(`.
pub fn collation_prefix(path: &Path) -> Option<String> {
    let tagged = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains('('));
    if !tagged {
        return None;
    }
    let text = path.to_string_lossy();
    text.rfind('(').map(|open| text[..=open].to_string())
}

/// ASCII case-insensitive ordering used for every listing sort.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Alpha bucket of a name: `a`..`z` map to 1..26, anything else to 0.
pub fn alpha_bucket(name: &str) -> u8 {
    match name.bytes().next().map(|c| c.to_ascii_lowercase()) {
        Some(c @ b'a'..=b'z') => c - b'a' + 1,
        _ => 0,
    }
}
