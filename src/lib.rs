//! Library exports for the launcher binary and integration tests.
/// Highlight animation worker.
pub mod animation;
/// Per-user application directories.
pub mod app_dirs;
/// Background and thumbnail loading.
pub mod assets;
/// Settings persisted in `config.toml`.
pub mod config;
/// Emulator lookup and supervisor handoff.
pub mod launch;
/// Library layout, naming rules and directory indexing.
pub mod library;
/// Tracing subscriber setup.
pub mod logging;
/// Directory stack and viewport movement.
pub mod navigation;
/// Single-slot handoff between the input thread and workers.
pub mod queue;
/// Recently played history.
pub mod recents;
/// Save-state lookup for the selected title.
pub mod resume;
/// Browsing session owned by the input thread.
pub mod session;
/// Small file writers for persisted state.
pub mod store;
