//! Lazy full-size decodes for the single view.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// A finished decode. `image` is `None` when the file could not be read.
#[derive(Debug)]
pub struct FullImage {
    pub path: PathBuf,
    pub image: Option<RgbaImage>,
}

/// Decode and shrink to fit `max_w` x `max_h`, keeping the aspect ratio.
pub fn decode_fit(path: &Path, max_w: u32, max_h: u32) -> Option<RgbaImage> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            warn!(path = %path.display(), %err, "full-size decode failed");
            return None;
        }
    };
    let img = if img.width() > max_w || img.height() > max_h {
        img.resize(max_w, max_h, FilterType::Triangle)
    } else {
        img
    };
    Some(img.to_rgba8())
}

pub struct FullImageLoader {
    runtime: Handle,
    max_w: u32,
    max_h: u32,
    tx: UnboundedSender<FullImage>,
    rx: UnboundedReceiver<FullImage>,
    in_flight: HashSet<PathBuf>,
    /// In-flight decodes whose results are no longer wanted.
    discarded: HashSet<PathBuf>,
}

impl FullImageLoader {
    pub fn new(runtime: Handle, max_w: u32, max_h: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            max_w,
            max_h,
            tx,
            rx,
            in_flight: HashSet::new(),
            discarded: HashSet::new(),
        }
    }

    /// Queue a decode unless one for the same file is already running.
    pub fn request(&mut self, path: PathBuf) {
        self.discarded.remove(&path);
        if !self.in_flight.insert(path.clone()) {
            return;
        }
        let tx = self.tx.clone();
        let (max_w, max_h) = (self.max_w, self.max_h);
        debug!(path = %path.display(), "full-size decode queued");
        self.runtime.spawn_blocking(move || {
            let image = decode_fit(&path, max_w, max_h);
            let _ = tx.send(FullImage { path, image });
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Drop the result of a running decode for `path`, if any.
    pub fn discard(&mut self, path: &Path) {
        if self.in_flight.contains(path) {
            self.discarded.insert(path.to_path_buf());
        }
    }

    /// Everything that finished since the last call; never blocks.
    pub fn drain(&mut self) -> Vec<FullImage> {
        let mut done = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            self.in_flight.remove(&result.path);
            if self.discarded.remove(&result.path) {
                debug!(path = %result.path.display(), "discarded full-size decode dropped");
                continue;
            }
            done.push(result);
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn decodes_and_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big_TV.png");
        RgbaImage::new(400, 100).save(&big).unwrap();
        let missing = dir.path().join("gone_TV.png");

        let mut loader = FullImageLoader::new(Handle::current(), 200, 200);
        loader.request(big.clone());
        loader.request(big.clone());
        loader.request(missing.clone());
        assert_eq!(loader.in_flight(), 2);

        let mut done = Vec::new();
        for _ in 0..200 {
            done.extend(loader.drain());
            if done.len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(done.len(), 2);
        assert_eq!(loader.in_flight(), 0);
        let img = done.iter().find(|f| f.path == big).unwrap();
        let img = img.image.as_ref().unwrap();
        assert_eq!((img.width(), img.height()), (200, 50));
        assert!(done.iter().any(|f| f.path == missing && f.image.is_none()));
    }

    async fn drain_all(loader: &mut FullImageLoader) -> Vec<FullImage> {
        let mut done = Vec::new();
        for _ in 0..200 {
            done.extend(loader.drain());
            if loader.in_flight() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        done
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn discarded_results_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone_TV.png");
        let kept = dir.path().join("kept_TV.png");
        RgbaImage::new(8, 8).save(&gone).unwrap();
        RgbaImage::new(8, 8).save(&kept).unwrap();

        let mut loader = FullImageLoader::new(Handle::current(), 64, 64);
        loader.request(gone.clone());
        loader.request(kept.clone());
        loader.discard(&gone);
        // Not in flight: nothing to discard.
        loader.discard(&dir.path().join("never_TV.png"));

        let done = drain_all(&mut loader).await;
        assert_eq!(loader.in_flight(), 0);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].path, kept);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn request_after_discard_keeps_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("back_TV.png");
        RgbaImage::new(8, 8).save(&path).unwrap();

        let mut loader = FullImageLoader::new(Handle::current(), 64, 64);
        loader.request(path.clone());
        loader.discard(&path);
        loader.request(path.clone());

        let done = drain_all(&mut loader).await;
        assert_eq!(done.len(), 1);
        assert!(done[0].image.is_some());
    }
}
