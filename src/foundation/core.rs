use crate::foundation::error::{ScrollframeError, ScrollframeResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Visible (layout-space) size of a drawing surface.
///
/// Values are logical pixels, before device pixel ratio scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    /// Visible width in logical pixels.
    pub width: f64,
    /// Visible height in logical pixels.
    pub height: f64,
}

impl SurfaceSize {
    /// Create a size from logical width and height.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` when both sides are finite and strictly positive.
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        self.width / self.height
    }
}

/// Backing-store dimensions in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of bytes needed for a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Resolve a host-reported device pixel ratio, defaulting to `1.0` when unavailable or unusable.
pub fn resolve_pixel_ratio(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => 1.0,
    }
}

/// Measured drawing geometry of a surface.
///
/// Always derived from fresh measurements; never adjusted incrementally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    /// Visible size in logical pixels.
    pub visible: SurfaceSize,
    /// Device pixel ratio applied to the backing store.
    pub pixel_ratio: f64,
    /// Backing-store resolution, `floor(visible * pixel_ratio)`.
    pub backing: Canvas,
}

impl SurfaceGeometry {
    /// Derive geometry from a visible size and an optional device pixel ratio.
    ///
    /// Fails when the visible size has no drawable area, including sizes that floor to an empty
    /// backing store.
    pub fn measure(visible: SurfaceSize, pixel_ratio: Option<f64>) -> ScrollframeResult<Self> {
        if !visible.is_drawable() {
            return Err(ScrollframeError::validation(format!(
                "surface size must be finite and > 0, got {}x{}",
                visible.width, visible.height
            )));
        }
        let pixel_ratio = resolve_pixel_ratio(pixel_ratio);
        let backing = Canvas {
            width: backing_extent(visible.width, pixel_ratio),
            height: backing_extent(visible.height, pixel_ratio),
        };
        if backing.width == 0 || backing.height == 0 {
            return Err(ScrollframeError::validation(format!(
                "surface {}x{} at ratio {pixel_ratio} has an empty backing store",
                visible.width, visible.height
            )));
        }
        Ok(Self {
            visible,
            pixel_ratio,
            backing,
        })
    }

    /// Transform from visible units to backing-store pixels.
    pub fn device_transform(&self) -> Affine {
        Affine::scale(self.pixel_ratio)
    }

    /// The full visible area, in visible units.
    pub fn visible_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.visible.width, self.visible.height)
    }
}

fn backing_extent(visible: f64, ratio: f64) -> u32 {
    (visible * ratio).floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
