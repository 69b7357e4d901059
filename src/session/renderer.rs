use std::sync::Arc;

use crate::foundation::error::{ScrollframeError, ScrollframeResult};
use crate::render::plan::{DrawCommand, RenderState, plan_draw};
use crate::render::surface::{Surface, measure};
use crate::sequence::config::{FrameSequenceConfig, LoadOpts};
use crate::sequence::frame_set::FrameSet;
use crate::sequence::loader::{CancelToken, PendingLoad, spawn_load};
use crate::sequence::source::FrameSource;

/// What a render attempt did. None of these is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame at this dense index was drawn.
    Drawn {
        /// Dense frame index.
        frame: usize,
    },
    /// Frames are still loading; the surface was left untouched.
    NotLoaded,
    /// Loading finished without any drawable frame; the surface was left untouched.
    Empty,
    /// The surface is detached or has no drawable area.
    Detached,
    /// The surface rejected the draw; the failure was logged.
    Failed,
}

/// Revokes the load scope when the renderer goes away, whether or not `unmount` was called.
#[derive(Debug)]
struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Scroll-driven frame-sequence renderer bound to one host surface.
///
/// Created on mount, which starts loading the frame set in the background. The host feeds scroll
/// fractions with [`FrameSequenceRenderer::set_scroll_progress`], reports layout changes with
/// [`FrameSequenceRenderer::on_surface_resize`], and polls [`FrameSequenceRenderer::poll_load`]
/// from its event loop until the load settles.
pub struct FrameSequenceRenderer<S: Surface> {
    surface: S,
    state: RenderState,
    pending: Option<PendingLoad>,
    requested: usize,
    last_draw: Option<DrawCommand>,
    cancel: CancelOnDrop,
}

impl<S: Surface> FrameSequenceRenderer<S> {
    /// Mount on `surface` and start loading the frames described by `config`.
    pub fn mount(
        surface: S,
        source: Arc<dyn FrameSource>,
        config: FrameSequenceConfig,
        opts: LoadOpts,
    ) -> ScrollframeResult<Self> {
        config.validate()?;
        let requested = config.max_frames;
        let cancel = CancelToken::new();
        let pending = spawn_load(source, config, opts, cancel.clone())?;
        Ok(Self {
            surface,
            state: RenderState::new(),
            pending: Some(pending),
            requested,
            last_draw: None,
            cancel: CancelOnDrop(cancel),
        })
    }

    /// Mount with an already loaded frame set. Nothing is drawn until the first render.
    pub fn with_frames(surface: S, frames: FrameSet) -> Self {
        Self {
            surface,
            requested: frames.requested(),
            state: RenderState::with_frames(frames),
            pending: None,
            last_draw: None,
            cancel: CancelOnDrop(CancelToken::new()),
        }
    }

    /// Install the load result if it has settled, then render once.
    ///
    /// Returns `None` while the load is still in flight or if it was already installed.
    pub fn poll_load(&mut self) -> Option<RenderOutcome> {
        let res = self.pending.as_ref()?.try_take()?;
        self.pending = None;
        Some(self.settle(res))
    }

    /// Block until the load settles, install it, and render once.
    pub fn wait_for_load(&mut self) -> RenderOutcome {
        match self.pending.take() {
            Some(pending) => {
                let res = pending.wait();
                self.settle(res)
            }
            None => self.render(),
        }
    }

    fn settle(&mut self, res: ScrollframeResult<FrameSet>) -> RenderOutcome {
        let frames = match res {
            Ok(frames) => frames,
            Err(ScrollframeError::Cancelled) => return RenderOutcome::NotLoaded,
            Err(e) => {
                tracing::warn!(error = %e, "frame load failed; no frames will be drawn");
                FrameSet::empty(self.requested)
            }
        };
        if !self.state.install(frames) {
            tracing::debug!("frame set already installed; ignoring late load result");
        }
        self.render()
    }

    /// Record the latest scroll fraction and redraw.
    pub fn set_scroll_progress(&mut self, progress: f64) -> RenderOutcome {
        self.state.set_scroll_progress(progress);
        self.render()
    }

    /// Draw the frame selected by the current scroll fraction at the surface's current geometry.
    pub fn render(&mut self) -> RenderOutcome {
        let Some(frames) = self.state.frames() else {
            return RenderOutcome::NotLoaded;
        };
        if frames.is_empty() {
            return RenderOutcome::Empty;
        }
        let Some(geometry) = measure(&self.surface) else {
            tracing::debug!("surface unavailable; skipping render");
            return RenderOutcome::Detached;
        };
        let Some(cmd) = plan_draw(&self.state, geometry) else {
            return RenderOutcome::Empty;
        };
        let Some(image) = frames.get(cmd.frame) else {
            return RenderOutcome::Empty;
        };

        match self.surface.draw(&cmd, image) {
            Ok(()) => {
                self.last_draw = Some(cmd);
                RenderOutcome::Drawn { frame: cmd.frame }
            }
            Err(e) => {
                tracing::warn!(frame = cmd.frame, error = %e, "frame draw failed");
                RenderOutcome::Failed
            }
        }
    }

    /// Redraw the current frame after the host reported a size change.
    ///
    /// The scroll fraction is unchanged, so the same frame is drawn at the new geometry.
    pub fn on_surface_resize(&mut self) -> RenderOutcome {
        if !self.state.loaded() {
            return RenderOutcome::NotLoaded;
        }
        let outcome = self.render();
        tracing::debug!(?outcome, "surface resized");
        outcome
    }

    /// Return `true` while the host should show its loading indicator.
    ///
    /// A load that finished with no frames keeps the indicator up, like one still in flight.
    pub fn shows_loading_indicator(&self) -> bool {
        self.state.frames().is_none_or(FrameSet::is_empty)
    }

    /// Return `true` while a background load is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Current renderer state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Last successfully executed draw.
    pub fn last_draw(&self) -> Option<&DrawCommand> {
        self.last_draw.as_ref()
    }

    /// Host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Host surface, mutably, e.g. to report a new visible size before
    /// [`FrameSequenceRenderer::on_surface_resize`].
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tear down: revoke any in-flight load and hand the surface back to the host.
    pub fn unmount(self) -> S {
        let Self {
            surface, cancel, ..
        } = self;
        drop(cancel);
        surface
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/renderer.rs"]
mod tests;
