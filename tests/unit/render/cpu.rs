use super::*;
use crate::foundation::core::{Size, SurfaceGeometry};

fn solid(width: u32, height: u32, rgba_premul: [u8; 4]) -> PreparedImage {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..(width * height) {
        bytes.extend_from_slice(&rgba_premul);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    }
}

fn command_for(surface: &PixmapSurface, frame: &PreparedImage) -> DrawCommand {
    let geometry = crate::render::surface::measure(surface).unwrap();
    let image_size = Size::new(f64::from(frame.width), f64::from(frame.height));
    DrawCommand {
        geometry,
        frame: 0,
        image_size,
        dest: crate::render::fit::aspect_fit(image_size, geometry.visible),
    }
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn assert_near(px: [u8; 4], want: [u8; 4]) {
    for (a, b) in px.iter().zip(want.iter()) {
        assert!(a.abs_diff(*b) <= 3, "{px:?} != {want:?}");
    }
}

#[test]
fn nothing_to_snapshot_before_first_draw() {
    let s = PixmapSurface::new(SurfaceSize::new(4.0, 4.0), None);
    assert!(s.snapshot().is_none());
    assert!(s.backing().is_none());
    assert_eq!(s.draw_count(), 0);
}

#[test]
fn backing_store_follows_pixel_ratio() {
    let mut s = PixmapSurface::new(SurfaceSize::new(6.0, 4.0), Some(2.0));
    let img = solid(3, 2, [255, 0, 0, 255]);
    let cmd = command_for(&s, &img);
    s.draw(&cmd, &img).unwrap();
    assert_eq!(
        s.backing(),
        Some(Canvas {
            width: 12,
            height: 8
        })
    );
    let snap = s.snapshot().unwrap();
    assert_eq!(snap.data.len(), 12 * 8 * 4);
    assert!(snap.premultiplied);
}

#[test]
fn wide_frame_covers_surface() {
    let mut s = PixmapSurface::new(SurfaceSize::new(8.0, 8.0), None);
    let img = solid(16, 8, [0, 0, 255, 255]);
    let cmd = command_for(&s, &img);
    s.draw(&cmd, &img).unwrap();
    let snap = s.snapshot().unwrap();
    assert_near(pixel(&snap, 4, 4), [0, 0, 255, 255]);
    assert_near(pixel(&snap, 0, 4), [0, 0, 255, 255]);
}

#[test]
fn redraw_clears_previous_content() {
    let mut s = PixmapSurface::new(SurfaceSize::new(8.0, 8.0), None);
    let red = solid(8, 8, [255, 0, 0, 255]);
    let cmd = command_for(&s, &red);
    s.draw(&cmd, &red).unwrap();

    let clear = solid(8, 8, [0, 0, 0, 0]);
    let cmd = command_for(&s, &clear);
    s.draw(&cmd, &clear).unwrap();
    let snap = s.snapshot().unwrap();
    assert!(snap.data.iter().all(|&b| b == 0));
    assert_eq!(s.draw_count(), 2);
}

#[test]
fn clear_color_shows_through_transparent_frames() {
    let opts = PixmapSurfaceOpts::default().with_clear_rgba(Some([0, 255, 0, 255]));
    let mut s = PixmapSurface::with_opts(SurfaceSize::new(4.0, 4.0), None, opts);
    let img = solid(4, 4, [0, 0, 0, 0]);
    let cmd = command_for(&s, &img);
    s.draw(&cmd, &img).unwrap();
    let snap = s.snapshot().unwrap();
    assert_near(pixel(&snap, 2, 2), [0, 255, 0, 255]);
}

#[test]
fn resize_reallocates_backing_store() {
    let mut s = PixmapSurface::new(SurfaceSize::new(4.0, 4.0), None);
    let img = solid(2, 2, [255, 255, 255, 255]);
    let cmd = command_for(&s, &img);
    s.draw(&cmd, &img).unwrap();

    s.resize(SurfaceSize::new(10.0, 6.0));
    let cmd = command_for(&s, &img);
    s.draw(&cmd, &img).unwrap();
    assert_eq!(
        s.backing(),
        Some(Canvas {
            width: 10,
            height: 6
        })
    );
}

#[test]
fn oversized_backing_store_is_a_render_error() {
    let mut s = PixmapSurface::new(SurfaceSize::new(70_000.0, 10.0), None);
    let img = solid(1, 1, [0, 0, 0, 255]);
    let cmd = command_for(&s, &img);
    let err = s.draw(&cmd, &img).unwrap_err();
    assert!(err.to_string().contains("render error:"));
    assert!(s.snapshot().is_none());
}

#[test]
fn sub_pixel_surface_has_no_geometry() {
    let s = PixmapSurface::new(SurfaceSize::new(0.4, 0.4), None);
    assert!(crate::render::surface::measure(&s).is_none());
}

#[test]
fn empty_backing_store_is_a_render_error() {
    let mut s = PixmapSurface::new(SurfaceSize::new(0.4, 0.4), None);
    let img = solid(1, 1, [0, 0, 0, 255]);
    let geometry = SurfaceGeometry {
        visible: SurfaceSize::new(0.4, 0.4),
        pixel_ratio: 1.0,
        backing: Canvas {
            width: 0,
            height: 0,
        },
    };
    let cmd = DrawCommand {
        geometry,
        frame: 0,
        image_size: Size::new(1.0, 1.0),
        dest: Rect::new(0.0, 0.0, 0.4, 0.4),
    };
    assert!(s.draw(&cmd, &img).is_err());
    assert!(s.snapshot().is_none());
}

#[test]
fn paint_cache_is_bounded() {
    let opts = PixmapSurfaceOpts {
        clear_rgba: None,
        paint_cache_capacity: 2,
    };
    let mut s = PixmapSurface::with_opts(SurfaceSize::new(2.0, 2.0), None, opts);
    let frames: Vec<PreparedImage> = (0..4).map(|_| solid(2, 2, [1, 1, 1, 255])).collect();
    for f in &frames {
        let cmd = command_for(&s, f);
        s.draw(&cmd, f).unwrap();
    }
    assert_eq!(s.cached_paints(), 2);
}

#[test]
fn detached_surface_reports_no_size() {
    let mut s = PixmapSurface::new(SurfaceSize::new(2.0, 2.0), Some(3.0));
    assert_eq!(s.device_pixel_ratio(), Some(3.0));
    s.detach();
    assert!(s.visible_size().is_none());
    assert!(crate::render::surface::measure(&s).is_none());
}

#[test]
fn straight_alpha_conversion_unpremultiplies() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    assert_eq!(f.to_straight_rgba8(), vec![128, 0, 0, 128, 10, 20, 30, 255]);
}
