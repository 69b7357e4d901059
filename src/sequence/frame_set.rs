use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::error::{ScrollframeError, ScrollframeResult};
use crate::sequence::select::frame_index;

/// Dense, ordered, immutable sequence of decoded frames.
///
/// Indices are contiguous `0..len()` even when some requested frames failed to load.
#[derive(Clone, Debug)]
pub struct FrameSet {
    frames: Vec<Arc<PreparedImage>>,
    requested: usize,
}

impl FrameSet {
    /// Build a set from settled load results in request order, dropping failures.
    ///
    /// `requested` is `results.len()`; it must not exceed `max_frames`.
    pub fn from_settled(
        results: Vec<Option<PreparedImage>>,
        max_frames: usize,
    ) -> ScrollframeResult<Self> {
        if results.len() > max_frames {
            return Err(ScrollframeError::validation(format!(
                "{} settled frames exceed max_frames {max_frames}",
                results.len()
            )));
        }
        let requested = results.len();
        let frames = results.into_iter().flatten().map(Arc::new).collect();
        Ok(Self { frames, requested })
    }

    /// A set with no frames, as left behind when every request failed.
    pub fn empty(requested: usize) -> Self {
        Self {
            frames: Vec::new(),
            requested,
        }
    }

    /// Number of drawable frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when no frame can be drawn.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of candidate frames that were requested.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of requested frames that were dropped.
    pub fn dropped(&self) -> usize {
        self.requested.saturating_sub(self.frames.len())
    }

    /// Frame at a dense index.
    pub fn get(&self, index: usize) -> Option<&PreparedImage> {
        self.frames.get(index).map(Arc::as_ref)
    }

    /// Frame selected by a scroll fraction, with its index.
    pub fn frame_at(&self, progress: f64) -> Option<(usize, &PreparedImage)> {
        let i = frame_index(progress, self.len())?;
        self.get(i).map(|f| (i, f))
    }

    /// Iterate frames in order.
    pub fn iter(&self) -> impl Iterator<Item = &PreparedImage> {
        self.frames.iter().map(Arc::as_ref)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frame_set.rs"]
mod tests;
