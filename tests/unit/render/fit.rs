use super::*;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 0.05, "{a} != {b}");
}

#[test]
fn wide_image_fits_height_and_centers_horizontally() {
    let r = aspect_fit(Size::new(1600.0, 900.0), SurfaceSize::new(400.0, 400.0));
    assert_close(r.height(), 400.0);
    assert_close(r.width(), 711.1);
    assert_close(r.x0, -155.6);
    assert_eq!(r.y0, 0.0);
}

#[test]
fn tall_image_fits_width_and_centers_vertically() {
    let r = aspect_fit(Size::new(900.0, 1600.0), SurfaceSize::new(400.0, 400.0));
    assert_close(r.width(), 400.0);
    assert_close(r.height(), 711.1);
    assert_eq!(r.x0, 0.0);
    assert_close(r.y0, -155.6);
}

#[test]
fn equal_aspect_fills_surface_exactly() {
    let r = aspect_fit(Size::new(50.0, 50.0), SurfaceSize::new(400.0, 400.0));
    assert_eq!(r, Rect::new(0.0, 0.0, 400.0, 400.0));
}

#[test]
fn overflow_is_symmetric() {
    let surface = SurfaceSize::new(300.0, 200.0);
    let r = aspect_fit(Size::new(1000.0, 250.0), surface);
    assert_close(r.x0 + r.x1, surface.width);
    assert_eq!(r.y0, 0.0);
    assert_close(r.y1, surface.height);
}

#[test]
fn small_image_is_scaled_up() {
    let r = aspect_fit(Size::new(10.0, 20.0), SurfaceSize::new(100.0, 100.0));
    assert_close(r.width(), 100.0);
    assert_close(r.height(), 200.0);
    assert_close(r.y0, -50.0);
}
