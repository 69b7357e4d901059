use crate::assets::decode::PreparedImage;
use crate::foundation::core::{SurfaceGeometry, SurfaceSize};
use crate::foundation::error::ScrollframeResult;
use crate::render::plan::DrawCommand;

/// A 2-D drawable handed to the renderer by its host view.
///
/// The host owns layout; the renderer only measures the surface and draws into it.
pub trait Surface {
    /// Current visible size, or `None` when the surface is detached from its view.
    fn visible_size(&self) -> Option<SurfaceSize>;

    /// Device pixel ratio of the display showing the surface, if known.
    fn device_pixel_ratio(&self) -> Option<f64> {
        None
    }

    /// Resize the backing store to `cmd.geometry`, clear it, and draw `frame` as planned.
    fn draw(&mut self, cmd: &DrawCommand, frame: &PreparedImage) -> ScrollframeResult<()>;
}

/// Measure a surface, returning `None` when it is detached or has no drawable area.
pub fn measure<S: Surface + ?Sized>(surface: &S) -> Option<SurfaceGeometry> {
    let visible = surface.visible_size()?;
    SurfaceGeometry::measure(visible, surface.device_pixel_ratio()).ok()
}
