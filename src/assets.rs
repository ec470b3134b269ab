use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use image::RgbaImage;
use log::{debug, warn};
use parking_lot::Mutex;

/// Handle to a texture decode running on a background thread.
///
/// Rendering never waits on this: the shell keeps its placeholder until the
/// decoded image shows up in the slot, and a failed load simply never fills
/// it. The render loop polls once per frame.
#[derive(Debug)]
pub struct PendingTexture {
    slot: Arc<Mutex<Option<RgbaImage>>>,
}

impl PendingTexture {
    /// Starts decoding the image at `path` without blocking the caller.
    pub fn load(path: PathBuf) -> Self {
        let slot = Arc::new(Mutex::new(None));
        let worker_slot = Arc::clone(&slot);
        thread::spawn(move || match image::open(&path) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                debug!(
                    "decoded texture {} ({}x{})",
                    path.display(),
                    rgba.width(),
                    rgba.height()
                );
                *worker_slot.lock() = Some(rgba);
            }
            Err(err) => {
                warn!("failed to load texture {}: {err}", path.display());
            }
        });
        Self { slot }
    }

    /// Takes the decoded image if the load has completed since the last
    /// poll. Returns `Some` at most once per load.
    pub fn poll(&self) -> Option<RgbaImage> {
        self.slot.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(pending: &PendingTexture) -> Option<RgbaImage> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(image) = pending.poll() {
                return Some(image);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn decodes_an_image_in_the_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture.png");
        RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let pending = PendingTexture::load(path);
        let loaded = wait_for(&pending).expect("texture should decode");
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(0, 0), &image::Rgba([10, 20, 30, 255]));
        // The slot hands the image out exactly once.
        assert!(pending.poll().is_none());
    }

    #[test]
    fn a_missing_file_leaves_the_slot_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pending = PendingTexture::load(dir.path().join("nope.png"));
        thread::sleep(Duration::from_millis(200));
        assert!(pending.poll().is_none());
    }
}
