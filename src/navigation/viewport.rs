//! Selection and viewport arithmetic for a single [`Directory`].

use crate::library::Directory;

impl Directory {
    /// Select the first entry with the window at the top.
    pub fn reset_viewport(&mut self, page: usize) {
        self.selected = 0;
        self.show_first_page(page);
    }

    fn show_first_page(&mut self, page: usize) {
        self.start = 0;
        self.end = self.len().min(page);
    }

    fn show_last_page(&mut self, page: usize) {
        self.end = self.len();
        self.start = self.end.saturating_sub(page);
    }

    /// Move the selection by `delta` rows, keeping it inside the window.
    ///
    /// Running off either end clamps to that end, unless `wrap` is set and the
    /// selection already sits on it; then it wraps to the opposite end.
    pub fn move_selection(&mut self, delta: isize, wrap: bool, page: usize) {
        let total = self.len();
        if total == 0 || delta == 0 {
            return;
        }
        let distance = delta.unsigned_abs();
        if delta < 0 {
            match self.selected.checked_sub(distance) {
                None if wrap && self.selected == 0 => {
                    self.selected = total - 1;
                    self.show_last_page(page);
                }
                None => {
                    self.selected = 0;
                    self.show_first_page(page);
                }
                Some(target) => {
                    self.selected = target;
                    if target < self.start {
                        self.start = self.start.saturating_sub(distance);
                        self.end = (self.start + page).min(total);
                    }
                }
            }
        } else {
            let target = self.selected + distance;
            if target >= total {
                if wrap && self.selected == total - 1 {
                    self.selected = 0;
                    self.show_first_page(page);
                } else {
                    self.selected = total - 1;
                    self.show_last_page(page);
                }
            } else {
                self.selected = target;
                if target >= self.end {
                    self.end = (self.end + distance).min(total);
                    self.start = self.end.saturating_sub(page);
                }
            }
        }
    }

    /// Jump to the previous or next alpha bucket boundary.
    ///
    /// Returns false when there is no bucket in that direction.
    pub fn jump_alpha(&mut self, forward: bool, page: usize) -> bool {
        let Some(entry) = self.selected_entry() else {
            return false;
        };
        let current = entry.alpha_bucket();
        let target = if forward {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(previous) => previous,
                None => return false,
            }
        };
        let Some(&index) = self.alphas.get(target) else {
            return false;
        };
        self.selected = index;
        if self.len() > page {
            self.end = (index + page).min(self.len());
            self.start = self.end - page;
        }
        true
    }

    /// Select `index`, scrolling so it becomes visible when it lies past the window.
    pub fn scroll_to(&mut self, index: usize, page: usize) {
        if index >= self.len() {
            return;
        }
        self.selected = index;
        if index >= self.end {
            self.end = (index + page).min(self.len());
            self.start = self.end.saturating_sub(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::library::{Directory, DirectoryKind, Entry, EntryKind};
    use std::path::PathBuf;

    const PAGE: usize = 4;

    fn listing(names: &[&str]) -> Directory {
        let entries = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut entry = Entry::new(
                    PathBuf::from(format!("/sd/Roms/X/{name}.gb")),
                    name.to_string(),
                    EntryKind::RomFile,
                );
                entry.alpha = idx;
                entry
            })
            .collect();
        let mut dir = Directory::new(PathBuf::from("/sd/Roms/X"), "X".into(), DirectoryKind::Plain, entries);
        dir.reset_viewport(PAGE);
        dir
    }

    fn numbered(count: usize) -> Directory {
        let names: Vec<String> = (0..count).map(|idx| format!("g{idx:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        listing(&refs)
    }

    fn window(dir: &Directory) -> (usize, usize, usize) {
        (dir.selected, dir.start, dir.end)
    }

    #[test]
    fn stepping_scrolls_one_row_at_a_time() {
        let mut dir = numbered(10);
        for _ in 0..4 {
            dir.move_selection(1, false, PAGE);
        }
        assert_eq!(window(&dir), (4, 1, 5));
        for _ in 0..4 {
            dir.move_selection(-1, false, PAGE);
        }
        assert_eq!(window(&dir), (0, 0, 4));
    }

    #[test]
    fn wrapping_only_from_the_edge() {
        let mut dir = numbered(10);
        dir.move_selection(-1, false, PAGE);
        assert_eq!(window(&dir), (0, 0, 4));

        dir.move_selection(-1, true, PAGE);
        assert_eq!(window(&dir), (9, 6, 10));

        dir.move_selection(1, false, PAGE);
        assert_eq!(window(&dir), (9, 6, 10));

        dir.move_selection(1, true, PAGE);
        assert_eq!(window(&dir), (0, 0, 4));
    }

    #[test]
    fn paging_clamps_at_both_ends() {
        let mut dir = numbered(10);
        dir.move_selection(PAGE as isize, false, PAGE);
        assert_eq!(window(&dir), (4, 4, 8));
        dir.move_selection(PAGE as isize, false, PAGE);
        assert_eq!(window(&dir), (8, 6, 10));
        dir.move_selection(PAGE as isize, false, PAGE);
        assert_eq!(window(&dir), (9, 6, 10));

        dir.move_selection(-(PAGE as isize), false, PAGE);
        assert_eq!(window(&dir), (5, 2, 6));
        dir.move_selection(-(PAGE as isize), false, PAGE);
        assert_eq!(window(&dir), (1, 0, 4));
        dir.move_selection(-(PAGE as isize), false, PAGE);
        assert_eq!(window(&dir), (0, 0, 4));
    }

    #[test]
    fn short_listing_never_scrolls() {
        let mut dir = numbered(3);
        assert_eq!(window(&dir), (0, 0, 3));
        dir.move_selection(-1, true, PAGE);
        assert_eq!(window(&dir), (2, 0, 3));
        dir.move_selection(PAGE as isize, false, PAGE);
        assert_eq!(window(&dir), (2, 0, 3));
    }

    #[test]
    fn alpha_jump_puts_boundary_at_window_top() {
        let mut dir = numbered(10);
        // buckets start at 0, 3 and 8
        dir.alphas = vec![0, 3, 8];
        for (idx, entry) in dir.entries.iter_mut().enumerate() {
            entry.alpha = match idx {
                0..=2 => 0,
                3..=7 => 1,
                _ => 2,
            };
        }

        assert!(dir.jump_alpha(true, PAGE));
        assert_eq!(window(&dir), (3, 3, 7));
        assert!(dir.jump_alpha(true, PAGE));
        assert_eq!(window(&dir), (8, 6, 10));
        assert!(!dir.jump_alpha(true, PAGE));
        assert!(dir.jump_alpha(false, PAGE));
        assert_eq!(window(&dir), (3, 3, 7));
        assert!(dir.jump_alpha(false, PAGE));
        assert!(!dir.jump_alpha(false, PAGE));
        assert_eq!(window(&dir), (0, 0, 4));
    }

    #[test]
    fn unindexed_listing_ignores_alpha_jumps() {
        let mut dir = numbered(6);
        dir.alphas.clear();
        assert!(!dir.jump_alpha(true, PAGE));
        assert_eq!(window(&dir), (0, 0, 4));
    }

    #[test]
    fn scroll_to_brings_far_entries_into_view() {
        let mut dir = numbered(10);
        dir.scroll_to(2, PAGE);
        assert_eq!(window(&dir), (2, 0, 4));
        dir.scroll_to(5, PAGE);
        assert_eq!(window(&dir), (5, 5, 9));
        dir.scroll_to(9, PAGE);
        assert_eq!(window(&dir), (9, 6, 10));
        dir.scroll_to(42, PAGE);
        assert_eq!(window(&dir), (9, 6, 10));
    }
}
