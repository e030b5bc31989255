//! Stack of open listings with per-depth selection memory.

mod viewport;

use crate::library::Directory;

/// Selection and window captured when a frame closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RestoreMemo {
    /// Stack depth after the close.
    depth: usize,
    /// Selection of the frame that was revealed by the close.
    relative: usize,
    selected: usize,
    start: usize,
    end: usize,
}

/// Open directories, root first. Never empty.
#[derive(Debug)]
pub struct NavigationStack {
    frames: Vec<Directory>,
    memo: Option<RestoreMemo>,
    page_size: usize,
}

impl NavigationStack {
    /// Stack holding only `root`.
    pub fn new(mut root: Directory, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        root.reset_viewport(page_size);
        Self {
            frames: vec![root],
            memo: None,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The displayed frame.
    pub fn top(&self) -> &Directory {
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Directory {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn frames(&self) -> &[Directory] {
        &self.frames
    }

    /// Push a freshly built frame.
    ///
    /// Re-entering from the same parent selection at the depth last closed from
    /// restores that frame's selection and window.
    pub fn push(&mut self, mut directory: Directory) {
        let page = self.page_size;
        let top = self.top();
        let restored = self.memo.filter(|memo| {
            !top.is_empty()
                && memo.depth == self.frames.len()
                && top.selected == memo.relative
                && memo.selected < directory.len()
        });
        match restored {
            Some(memo) => {
                directory.selected = memo.selected;
                directory.end = memo.end.min(directory.len());
                directory.start = memo.start.min(directory.end);
                if directory.end == 0 {
                    directory.end = directory.len().min(page);
                }
            }
            None => directory.reset_viewport(page),
        }
        self.frames.push(directory);
    }

    /// Pop the top frame, remembering its position. The root frame never closes.
    pub fn close(&mut self) -> bool {
        if self.frames.len() <= 1 {
            tracing::debug!("Ignoring close at the root frame");
            return false;
        }
        let Some(closed) = self.frames.pop() else {
            return false;
        };
        let relative = self.top().selected;
        self.memo = Some(RestoreMemo {
            depth: self.frames.len(),
            relative,
            selected: closed.selected,
            start: closed.start,
            end: closed.end,
        });
        true
    }

    /// Move the top frame's selection. Returns true when it changed.
    pub fn move_selection(&mut self, delta: isize, wrap: bool) -> bool {
        let page = self.page_size;
        let top = self.top_mut();
        let before = top.selected;
        top.move_selection(delta, wrap, page);
        top.selected != before
    }

    /// Jump the top frame to the previous/next alpha bucket.
    pub fn jump_alpha(&mut self, forward: bool) -> bool {
        let page = self.page_size;
        self.top_mut().jump_alpha(forward, page)
    }
}
