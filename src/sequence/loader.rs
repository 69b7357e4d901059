use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{ScrollframeError, ScrollframeResult};
use crate::sequence::config::{FrameSequenceConfig, LoadOpts};
use crate::sequence::frame_set::FrameSet;
use crate::sequence::source::FrameSource;

/// Revocable scope for an in-flight load.
///
/// Clones share one flag. Once cancelled, requests that have not started yet settle as failures
/// and the final result is discarded.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke the scope.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Return `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fetch and decode every candidate frame concurrently, then keep the successes in request order.
///
/// Individual fetch or decode failures never fail the load; they are dropped from the set. The
/// load resolves with an empty set when every frame fails. It fails only for an invalid config,
/// a thread pool that cannot be built, or a revoked `cancel` scope.
#[tracing::instrument(skip(source, config, cancel), fields(max_frames = config.max_frames))]
pub fn load_frames<S: FrameSource + ?Sized>(
    source: &S,
    config: &FrameSequenceConfig,
    opts: LoadOpts,
    cancel: &CancelToken,
) -> ScrollframeResult<FrameSet> {
    config.validate()?;
    let pool = build_thread_pool(opts.threads)?;

    let locators: Vec<String> = config.locators().collect();
    // Positional collection keeps request order regardless of completion order.
    let settled: Vec<Option<PreparedImage>> = pool.install(|| {
        locators
            .par_iter()
            .map(|locator| settle_frame(source, locator, cancel))
            .collect()
    });

    if cancel.is_cancelled() {
        tracing::debug!("frame load finished after cancellation; discarding result");
        return Err(ScrollframeError::Cancelled);
    }

    let set = FrameSet::from_settled(settled, config.max_frames)?;
    tracing::info!(
        loaded = set.len(),
        dropped = set.dropped(),
        "frame sequence loaded"
    );
    Ok(set)
}

fn settle_frame<S: FrameSource + ?Sized>(
    source: &S,
    locator: &str,
    cancel: &CancelToken,
) -> Option<PreparedImage> {
    if cancel.is_cancelled() {
        return None;
    }
    match source.fetch(locator).and_then(|bytes| decode_image(&bytes)) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::debug!(locator, error = %e, "dropping frame");
            None
        }
    }
}

/// Handle to a load running on a background thread.
#[derive(Debug)]
pub struct PendingLoad {
    rx: mpsc::Receiver<ScrollframeResult<FrameSet>>,
    cancel: CancelToken,
}

impl PendingLoad {
    /// Take the result if the load has settled, without blocking.
    pub fn try_take(&self) -> Option<ScrollframeResult<FrameSet>> {
        match self.rx.try_recv() {
            Ok(res) => Some(res),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(loader_vanished())),
        }
    }

    /// Block until the load settles.
    pub fn wait(self) -> ScrollframeResult<FrameSet> {
        self.rx.recv().map_err(|_| loader_vanished())?
    }

    /// Token bound to this load.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

fn loader_vanished() -> ScrollframeError {
    ScrollframeError::load("loader thread exited without a result")
}

/// Run [`load_frames`] on a dedicated thread.
pub fn spawn_load(
    source: Arc<dyn FrameSource>,
    config: FrameSequenceConfig,
    opts: LoadOpts,
    cancel: CancelToken,
) -> ScrollframeResult<PendingLoad> {
    let (tx, rx) = mpsc::channel();
    let worker_cancel = cancel.clone();
    std::thread::Builder::new()
        .name("scrollframe-load".to_string())
        .spawn(move || {
            let res = load_frames(source.as_ref(), &config, opts, &worker_cancel);
            // The receiver is gone when the owner was dropped; the result is simply discarded.
            let _ = tx.send(res);
        })
        .map_err(|e| ScrollframeError::load(format!("failed to spawn loader thread: {e}")))?;
    Ok(PendingLoad { rx, cancel })
}

fn build_thread_pool(threads: Option<usize>) -> ScrollframeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScrollframeError::validation(
            "loader 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScrollframeError::load(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/loader.rs"]
mod tests;
