//! Background image loading through a latest-only queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::RgbaImage;

use crate::queue::LatestOnlyQueue;

/// Decoded art shared between the worker and the renderer.
pub type DecodedImage = Arc<RgbaImage>;

/// Invoked on the worker thread with the decoded image, or `None` when the file
/// is missing or undecodable.
pub type AssetCallback = Box<dyn FnOnce(Option<DecodedImage>) + Send>;

/// One pending load.
pub struct AssetRequest {
    pub path: PathBuf,
    pub callback: AssetCallback,
}

impl AssetRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        callback: impl FnOnce(Option<DecodedImage>) + Send + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            callback: Box::new(callback),
        }
    }
}

/// Turns an image file into pixels.
pub trait ImageDecoder: Send + 'static {
    fn decode(&self, path: &Path) -> Option<RgbaImage>;
}

/// Decodes any format the `image` crate recognizes into RGBA8.
#[derive(Clone, Copy, Debug, Default)]
pub struct RgbaDecoder;

impl ImageDecoder for RgbaDecoder {
    fn decode(&self, path: &Path) -> Option<RgbaImage> {
        match image::open(path) {
            Ok(image) => Some(image.to_rgba8()),
            Err(err) => {
                tracing::warn!("Failed to decode {}: {err}", path.display());
                None
            }
        }
    }
}

/// Handle to one asset worker thread.
///
/// Enqueuing replaces a request the worker has not started yet, so fast
/// scrolling decodes only the art that is still wanted.
pub struct AssetLoader {
    queue: Arc<LatestOnlyQueue<AssetRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl AssetLoader {
    /// Start a named worker. `settle` is the pause between taking a request and
    /// decoding it.
    pub fn spawn(
        name: &str,
        decoder: impl ImageDecoder,
        settle: Duration,
    ) -> std::io::Result<Self> {
        let queue: Arc<LatestOnlyQueue<AssetRequest>> = Arc::new(LatestOnlyQueue::new());
        let worker_queue = Arc::clone(&queue);
        let worker = thread::Builder::new()
            .name(format!("{name}-loader"))
            .spawn(move || {
                while let Some(request) = worker_queue.take_blocking() {
                    if !settle.is_zero() {
                        thread::sleep(settle);
                    }
                    let image = load(&decoder, &request.path);
                    (request.callback)(image);
                }
                tracing::debug!("Asset worker stopped");
            })?;
        Ok(Self {
            queue,
            worker: Some(worker),
        })
    }

    /// Queue a load, discarding any request still waiting.
    pub fn enqueue(&self, request: AssetRequest) {
        if let Some(stale) = self.queue.send(request) {
            tracing::trace!("Dropped stale asset request {}", stale.path.display());
        }
    }

    /// Stop the worker after its in-flight request finishes.
    pub fn shutdown(mut self) {
        self.queue.close();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!("Asset worker panicked");
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.queue.close();
    }
}

fn load(decoder: &impl ImageDecoder, path: &Path) -> Option<DecodedImage> {
    if !path.is_file() {
        tracing::debug!("No art at {}", path.display());
        return None;
    }
    decoder.decode(path).map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Barrier, Mutex};
    use tempfile::tempdir;

    /// Blocks inside the first decode until the test releases it.
    struct GatedDecoder {
        entered: Arc<Barrier>,
        release: Arc<Barrier>,
        first: Mutex<bool>,
    }

    impl ImageDecoder for GatedDecoder {
        fn decode(&self, _path: &Path) -> Option<RgbaImage> {
            let mut first = self.first.lock().unwrap();
            if *first {
                *first = false;
                drop(first);
                self.entered.wait();
                self.release.wait();
            }
            Some(RgbaImage::new(1, 1))
        }
    }

    #[test]
    fn only_latest_pending_request_runs() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..4).map(|idx| dir.path().join(format!("{idx}.png"))).collect();
        for file in &files {
            std::fs::write(file, "x").unwrap();
        }
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let loader = AssetLoader::spawn(
            "test",
            GatedDecoder {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
                first: Mutex::new(true),
            },
            Duration::ZERO,
        )
        .unwrap();
        let (tx, rx) = mpsc::channel();
        let request = |path: &PathBuf| {
            let tx = tx.clone();
            let label = path.clone();
            AssetRequest::new(path.clone(), move |image| {
                tx.send((label, image.is_some())).unwrap();
            })
        };

        loader.enqueue(request(&files[0]));
        entered.wait();
        // worker is busy with the first file; these three pile up in the slot
        loader.enqueue(request(&files[1]));
        loader.enqueue(request(&files[2]));
        loader.enqueue(request(&files[3]));
        release.wait();

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, (files[0].clone(), true));
        assert_eq!(second, (files[3].clone(), true));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        loader.shutdown();
    }

    #[test]
    fn missing_file_resolves_to_none() {
        let dir = tempdir().unwrap();
        let loader = AssetLoader::spawn("test", RgbaDecoder, Duration::ZERO).unwrap();
        let (tx, rx) = mpsc::channel();
        loader.enqueue(AssetRequest::new(dir.path().join("gone.png"), move |image| {
            tx.send(image.is_none()).unwrap();
        }));
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
        loader.shutdown();
    }

    #[test]
    fn decodes_real_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bg.png");
        RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        let loader = AssetLoader::spawn("test", RgbaDecoder, Duration::from_millis(1)).unwrap();
        let (tx, rx) = mpsc::channel();
        loader.enqueue(AssetRequest::new(path, move |image| {
            tx.send(image.map(|image| image.dimensions())).unwrap();
        }));
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), Some((3, 2)));
        loader.shutdown();
    }
}
