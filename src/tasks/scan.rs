//! Startup scan with eager thumbnail decode, run off the UI thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::album::ImagePairEntry;
use crate::album::scan::scan_pairs;
use crate::config::PairingStrategy;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub entries: Vec<ImagePairEntry>,
    /// Decoded thumbnails; files that failed to decode are absent.
    pub thumbnails: Vec<(PathBuf, RgbaImage)>,
}

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub root: PathBuf,
    pub pairing: PairingStrategy,
    pub thumbnail_max_px: u32,
}

/// Decode `path` and shrink it to fit a `max_px` square.
pub fn decode_thumbnail(path: &Path, max_px: u32) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.thumbnail(max_px, max_px).to_rgba8()),
        Err(err) => {
            debug!(path = %path.display(), %err, "thumbnail decode failed");
            None
        }
    }
}

/// Blocking scan and decode.
pub fn run_scan(req: &ScanRequest, progress: Option<&AtomicUsize>) -> ScanOutcome {
    let entries = scan_pairs(&req.root, req.pairing, progress);
    let thumbnails: Vec<_> = entries
        .iter()
        .flat_map(|e| e.paths())
        .filter_map(|p| decode_thumbnail(p, req.thumbnail_max_px).map(|img| (p.to_path_buf(), img)))
        .collect();
    info!(
        entries = entries.len(),
        thumbnails = thumbnails.len(),
        "thumbnails decoded"
    );
    ScanOutcome {
        entries,
        thumbnails,
    }
}

/// A scan running on the blocking pool, polled once per frame.
pub struct ScanHandle {
    progress: Arc<AtomicUsize>,
    rx: Option<oneshot::Receiver<ScanOutcome>>,
}

impl ScanHandle {
    pub fn spawn(runtime: &Handle, req: ScanRequest) -> Self {
        let progress = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel();
        let counter = progress.clone();
        runtime.spawn_blocking(move || {
            let outcome = run_scan(&req, Some(&counter));
            if tx.send(outcome).is_err() {
                debug!("scan finished after the viewer went away");
            }
        });
        Self {
            progress,
            rx: Some(rx),
        }
    }

    /// Entries discovered so far.
    pub fn found(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.rx.is_none()
    }

    /// Non-blocking: `Some` exactly once, when the scan completes.
    pub fn try_finish(&mut self) -> Option<ScanOutcome> {
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                warn!("scan worker ended without a result");
                self.rx = None;
                Some(ScanOutcome::default())
            }
        }
    }

    /// Await the result; used where blocking the caller is fine.
    pub async fn finish(mut self) -> ScanOutcome {
        match self.rx.take() {
            Some(rx) => rx.await.unwrap_or_default(),
            None => ScanOutcome::default(),
        }
    }
}
