//! Asynchronous background and thumbnail art.

pub mod art;
pub mod loader;
pub mod shared;

pub use art::{ArtTracker, background_path, fit_image, fit_within, thumbnail_path};
pub use loader::{AssetLoader, AssetRequest, DecodedImage, ImageDecoder, RgbaDecoder};
pub use shared::{RedrawFlag, SharedImage};
