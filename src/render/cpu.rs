use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Rect, SurfaceSize};
use crate::foundation::error::{ScrollframeError, ScrollframeResult};
use crate::render::plan::DrawCommand;
use crate::render::surface::Surface;

/// Default number of converted frame paints retained by a [`PixmapSurface`].
pub const DEFAULT_PAINT_CACHE_CAPACITY: usize = 32;

/// A rendered surface as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Return straight-alpha RGBA8 bytes, suitable for encoding to PNG.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Options for [`PixmapSurface`].
#[derive(Debug, Clone, Copy)]
pub struct PixmapSurfaceOpts {
    /// If set, the visible area is filled with this straight-alpha RGBA8 color after clearing.
    pub clear_rgba: Option<[u8; 4]>,
    /// Maximum number of converted frame paints kept between draws.
    pub paint_cache_capacity: usize,
}

impl Default for PixmapSurfaceOpts {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            paint_cache_capacity: DEFAULT_PAINT_CACHE_CAPACITY,
        }
    }
}

impl PixmapSurfaceOpts {
    /// Return options with a configured clear color.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

#[derive(Clone)]
struct ImagePaint {
    // Held so the pixel buffer address used as the cache key stays unique while cached.
    _source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

struct PaintCache {
    entries: HashMap<usize, ImagePaint>,
    lru: VecDeque<usize>,
    capacity: usize,
}

impl PaintCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn get_or_insert(&mut self, frame: &PreparedImage) -> ScrollframeResult<ImagePaint> {
        let key = Arc::as_ptr(&frame.rgba8_premul) as usize;
        if let Some(p) = self.entries.get(&key).cloned() {
            self.touch(key);
            return Ok(p);
        }

        let pixmap = pixmap_from_premul_bytes(&frame.rgba8_premul, frame.width, frame.height)?;
        let paint = ImagePaint {
            _source: frame.rgba8_premul.clone(),
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: frame.width,
            h: frame.height,
        };
        self.entries.insert(key, paint.clone());
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
        Ok(paint)
    }

    fn touch(&mut self, key: usize) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-memory raster surface drawn with `vello_cpu`.
///
/// The host reports the visible size with [`PixmapSurface::resize`]; the backing pixmap is
/// reallocated on the next draw whenever the planned backing resolution changes, which discards
/// previous content the same way resizing a browser canvas does.
pub struct PixmapSurface {
    opts: PixmapSurfaceOpts,
    visible: Option<SurfaceSize>,
    pixel_ratio: Option<f64>,

    pixmap: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    paints: PaintCache,
    draws: u64,
}

impl PixmapSurface {
    /// Create an attached surface with a visible size and optional device pixel ratio.
    pub fn new(visible: SurfaceSize, pixel_ratio: Option<f64>) -> Self {
        Self::with_opts(visible, pixel_ratio, PixmapSurfaceOpts::default())
    }

    /// Like [`PixmapSurface::new`] with explicit options.
    pub fn with_opts(
        visible: SurfaceSize,
        pixel_ratio: Option<f64>,
        opts: PixmapSurfaceOpts,
    ) -> Self {
        Self {
            paints: PaintCache::new(opts.paint_cache_capacity),
            opts,
            visible: Some(visible),
            pixel_ratio,
            pixmap: None,
            ctx: None,
            draws: 0,
        }
    }

    /// Report a new visible size from the host layout.
    pub fn resize(&mut self, visible: SurfaceSize) {
        self.visible = Some(visible);
    }

    /// Report a new device pixel ratio (e.g. the window moved to another display).
    pub fn set_pixel_ratio(&mut self, pixel_ratio: Option<f64>) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Detach the surface from its view. Subsequent measurements report no size.
    pub fn detach(&mut self) {
        self.visible = None;
    }

    /// Current backing-store resolution, if anything was drawn yet.
    pub fn backing(&self) -> Option<Canvas> {
        self.pixmap.as_ref().map(|p| Canvas {
            width: u32::from(p.width()),
            height: u32::from(p.height()),
        })
    }

    /// Number of completed draws.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Number of converted frame paints currently cached.
    pub fn cached_paints(&self) -> usize {
        self.paints.len()
    }

    /// Copy the current backing store out as premultiplied RGBA8.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        let p = self.pixmap.as_ref()?;
        Some(FrameRGBA {
            width: u32::from(p.width()),
            height: u32::from(p.height()),
            data: p.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn backing_pixmap(&mut self, width: u16, height: u16) -> vello_cpu::Pixmap {
        match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        }
    }

    fn render_context(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx
    }
}

impl Surface for PixmapSurface {
    fn visible_size(&self) -> Option<SurfaceSize> {
        self.visible
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.pixel_ratio
    }

    fn draw(&mut self, cmd: &DrawCommand, frame: &PreparedImage) -> ScrollframeResult<()> {
        let Canvas { width, height } = cmd.geometry.backing;
        let w: u16 = width
            .try_into()
            .map_err(|_| ScrollframeError::render("backing width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ScrollframeError::render("backing height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ScrollframeError::render("backing store is empty"));
        }

        let paint = self.paints.get_or_insert(frame)?;
        let mut pixmap = self.backing_pixmap(w, h);
        let mut ctx = self.render_context(w, h);

        clear_pixmap_to_transparent(&mut pixmap);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if let Some(rgba) = self.opts.clear_rgba {
            ctx.set_transform(affine_to_cpu(cmd.geometry.device_transform()));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                rgba[0], rgba[1], rgba[2], rgba[3],
            ));
            ctx.fill_rect(&rect_to_cpu(cmd.clear_rect()));
        }

        ctx.set_transform(affine_to_cpu(cmd.image_transform()));
        ctx.set_paint(paint.paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(paint.w),
            f64::from(paint.h),
        ));
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        self.ctx = Some(ctx);
        self.pixmap = Some(pixmap);
        self.draws = self.draws.saturating_add(1);
        Ok(())
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ScrollframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrollframeError::render("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrollframeError::render("frame height exceeds u16"))?;
    if rgba8_premul.len() != (Canvas { width, height }).rgba8_len() {
        return Err(ScrollframeError::render("frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
