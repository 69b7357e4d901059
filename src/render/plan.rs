use std::sync::Arc;

use crate::foundation::core::{Affine, Rect, Size, SurfaceGeometry};
use crate::render::fit::aspect_fit;
use crate::sequence::frame_set::FrameSet;
use crate::sequence::select::frame_index;

/// Explicit renderer state: the last delivered scroll fraction and the loaded frames.
///
/// `frames` is `None` until the load settles and is installed at most once.
#[derive(Clone, Debug, Default)]
pub struct RenderState {
    scroll_progress: f64,
    frames: Option<Arc<FrameSet>>,
}

impl RenderState {
    /// State before any frame is loaded, at scroll position `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// State with an already loaded frame set.
    pub fn with_frames(frames: FrameSet) -> Self {
        Self {
            scroll_progress: 0.0,
            frames: Some(Arc::new(frames)),
        }
    }

    /// Last delivered scroll fraction, as delivered (unclamped).
    pub fn scroll_progress(&self) -> f64 {
        self.scroll_progress
    }

    /// Record a new scroll fraction. The latest value always wins.
    pub fn set_scroll_progress(&mut self, progress: f64) {
        self.scroll_progress = progress;
    }

    /// Return `true` once a frame set is installed, even an empty one.
    pub fn loaded(&self) -> bool {
        self.frames.is_some()
    }

    /// Installed frame set, if any.
    pub fn frames(&self) -> Option<&FrameSet> {
        self.frames.as_deref()
    }

    /// Install the loaded frame set. Returns `false` (leaving state untouched) if one is installed.
    pub(crate) fn install(&mut self, frames: FrameSet) -> bool {
        if self.frames.is_some() {
            return false;
        }
        self.frames = Some(Arc::new(frames));
        true
    }

    /// Index of the frame selected by the current scroll fraction.
    pub fn current_frame(&self) -> Option<usize> {
        frame_index(self.scroll_progress, self.frames()?.len())
    }
}

/// A fully resolved draw of one frame onto a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Geometry the command was planned for.
    pub geometry: SurfaceGeometry,
    /// Dense index of the frame to draw.
    pub frame: usize,
    /// Intrinsic size of that frame in pixels.
    pub image_size: Size,
    /// Destination of the frame in visible units, see [`crate::aspect_fit`].
    pub dest: Rect,
}

impl DrawCommand {
    /// Area cleared before drawing, in visible units. Always the whole surface.
    pub fn clear_rect(&self) -> Rect {
        self.geometry.visible_rect()
    }

    /// Map from image pixel space to backing-store pixels.
    pub fn image_transform(&self) -> Affine {
        let sx = self.dest.width() / self.image_size.width;
        let sy = self.dest.height() / self.image_size.height;
        self.geometry.device_transform()
            * Affine::translate((self.dest.x0, self.dest.y0))
            * Affine::scale_non_uniform(sx, sy)
    }
}

/// Plan the draw for `state` on a surface measured as `geometry`.
///
/// Returns `None` when nothing should be drawn: frames not loaded yet, or an empty set.
pub fn plan_draw(state: &RenderState, geometry: SurfaceGeometry) -> Option<DrawCommand> {
    let frames = state.frames()?;
    let (frame, image) = frames.frame_at(state.scroll_progress)?;
    let image_size = image.size();
    Some(DrawCommand {
        geometry,
        frame,
        image_size,
        dest: aspect_fit(image_size, geometry.visible),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
