use crate::foundation::core::{Rect, Size, SurfaceSize};

/// Place an image on a surface, fitting exactly one axis and centering the overflow on the other.
///
/// When the image is relatively wider than the surface it is fitted to the surface height and its
/// width overflows, centered horizontally (negative `x0`). Otherwise it is fitted to the surface
/// width and its height overflows, centered vertically. Both axes are never letterboxed.
///
/// The returned rectangle is in visible surface units.
pub fn aspect_fit(image: Size, surface: SurfaceSize) -> Rect {
    let image_aspect = image.width / image.height;
    let surface_aspect = surface.aspect();

    if image_aspect > surface_aspect {
        let h = surface.height;
        let w = h * image_aspect;
        let x = (surface.width - w) / 2.0;
        Rect::new(x, 0.0, x + w, h)
    } else {
        let w = surface.width;
        let h = w / image_aspect;
        let y = (surface.height - h) / 2.0;
        Rect::new(0.0, y, w, y + h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
