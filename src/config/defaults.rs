use std::path::PathBuf;

pub(super) const MIN_PAGE_SIZE: usize = 1;

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_false() -> bool {
    false
}

pub(super) fn default_root() -> PathBuf {
    PathBuf::from("/mnt/SDCARD")
}

pub(super) fn default_platform() -> String {
    "generic".to_string()
}

pub(super) fn default_page_size() -> usize {
    8
}

pub(super) fn default_row_height() -> i32 {
    30
}

pub(super) fn default_row_width() -> i32 {
    320
}

pub(super) fn default_label_padding() -> i32 {
    12
}

pub(super) fn default_origin() -> i32 {
    10
}

pub(super) fn default_animation_frames() -> u32 {
    3
}

pub(super) fn default_settle_ms() -> u64 {
    10
}

pub(super) fn clamp_page_size(value: usize) -> usize {
    value.max(MIN_PAGE_SIZE)
}

pub(super) fn clamp_row_height(value: i32) -> i32 {
    value.max(1)
}
