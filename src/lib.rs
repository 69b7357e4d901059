//! Scrollframe renders a pre-rendered image sequence as a scroll-driven animation.
//!
//! The flow is:
//!
//! - Describe the sequence with a [`FrameSequenceConfig`] and a [`FrameSource`]
//! - Mount a [`FrameSequenceRenderer`] on a host [`Surface`], which loads the frames concurrently
//! - Feed scroll fractions in `[0, 1]`; each one selects a frame that is aspect-fitted and drawn
//!
//! Frame selection and placement are pure ([`frame_index`], [`aspect_fit`], [`plan_draw`]) so they
//! can be exercised without a real surface. [`PixmapSurface`] is the bundled CPU raster surface.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod render;
mod sequence;
mod session;

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::foundation::core::{
    Affine, Canvas, Point, Rect, Size, SurfaceGeometry, SurfaceSize, Vec2, resolve_pixel_ratio,
};
pub use crate::foundation::error::{ScrollframeError, ScrollframeResult};
pub use crate::render::cpu::{
    DEFAULT_PAINT_CACHE_CAPACITY, FrameRGBA, PixmapSurface, PixmapSurfaceOpts,
};
pub use crate::render::fit::aspect_fit;
pub use crate::render::plan::{DrawCommand, RenderState, plan_draw};
pub use crate::render::surface::{Surface, measure};
pub use crate::sequence::config::{
    DEFAULT_MAX_FRAMES, FrameSequenceConfig, LOAD_THREADS_ENV, LoadOpts,
};
pub use crate::sequence::frame_set::FrameSet;
pub use crate::sequence::loader::{CancelToken, PendingLoad, load_frames, spawn_load};
pub use crate::sequence::select::{clamp_progress, frame_index};
pub use crate::sequence::source::{DirFrameSource, FrameSource, MemoryFrameSource};
pub use crate::session::renderer::{FrameSequenceRenderer, RenderOutcome};
pub use crate::session::scroll::scroll_progress;
