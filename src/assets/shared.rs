//! Display slots written by workers and read by the render loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::art::fit_image;
use super::loader::DecodedImage;

/// Set by workers whenever something on screen needs repainting.
#[derive(Clone, Debug, Default)]
pub struct RedrawFlag(Arc<AtomicBool>);

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether a redraw was requested.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

#[derive(Default)]
struct Slot {
    image: Option<DecodedImage>,
    changed: bool,
}

/// Latest decoded image for one screen region.
///
/// Workers install, the render loop reads; both hold the lock only to swap an `Arc`.
pub struct SharedImage {
    slot: Mutex<Slot>,
    redraw: RedrawFlag,
}

impl SharedImage {
    pub fn new(redraw: RedrawFlag) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot::default()),
            redraw,
        })
    }

    /// Replace the image (clearing it on `None`) and request a redraw.
    pub fn install(&self, image: Option<DecodedImage>) {
        {
            let mut slot = self.slot.lock().expect("shared image poisoned");
            slot.image = image;
            slot.changed = true;
        }
        self.redraw.request();
    }

    pub fn current(&self) -> Option<DecodedImage> {
        let slot = self.slot.lock().expect("shared image poisoned");
        slot.image.clone()
    }

    /// The image if it changed since the last call.
    pub fn take_changed(&self) -> Option<Option<DecodedImage>> {
        let mut slot = self.slot.lock().expect("shared image poisoned");
        if !slot.changed {
            return None;
        }
        slot.changed = false;
        Some(slot.image.clone())
    }

    /// Callback that installs a loader result into this slot.
    pub fn installer(self: &Arc<Self>) -> impl FnOnce(Option<DecodedImage>) + Send + 'static {
        let shared = Arc::clone(self);
        move |image| shared.install(image)
    }

    /// Like [`installer`](Self::installer), scaling the image into `max_width`×`max_height` first.
    pub fn fitting_installer(
        self: &Arc<Self>,
        max_width: u32,
        max_height: u32,
    ) -> impl FnOnce(Option<DecodedImage>) + Send + 'static {
        let shared = Arc::clone(self);
        move |image| shared.install(image.map(|image| fit_image(image, max_width, max_height)))
    }
}
