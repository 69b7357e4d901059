use super::*;

#[test]
fn pixel_ratio_defaults_to_one() {
    assert_eq!(resolve_pixel_ratio(None), 1.0);
    assert_eq!(resolve_pixel_ratio(Some(0.0)), 1.0);
    assert_eq!(resolve_pixel_ratio(Some(-2.0)), 1.0);
    assert_eq!(resolve_pixel_ratio(Some(f64::NAN)), 1.0);
    assert_eq!(resolve_pixel_ratio(Some(2.0)), 2.0);
}

#[test]
fn geometry_scales_backing_store_by_pixel_ratio() {
    let g = SurfaceGeometry::measure(SurfaceSize::new(400.0, 300.0), Some(2.0)).unwrap();
    assert_eq!(g.backing, Canvas { width: 800, height: 600 });
    assert_eq!(g.pixel_ratio, 2.0);
    assert_eq!(g.device_transform(), Affine::scale(2.0));
    assert_eq!(g.visible_rect(), Rect::new(0.0, 0.0, 400.0, 300.0));
}

#[test]
fn geometry_floors_fractional_backing_sizes() {
    let g = SurfaceGeometry::measure(SurfaceSize::new(100.5, 50.25), Some(1.5)).unwrap();
    assert_eq!(g.backing, Canvas { width: 150, height: 75 });
}

#[test]
fn geometry_without_ratio_matches_visible_size() {
    let g = SurfaceGeometry::measure(SurfaceSize::new(320.0, 320.0), None).unwrap();
    assert_eq!(g.backing, Canvas { width: 320, height: 320 });
}

#[test]
fn geometry_rejects_empty_surfaces() {
    assert!(SurfaceGeometry::measure(SurfaceSize::new(0.0, 10.0), None).is_err());
    assert!(SurfaceGeometry::measure(SurfaceSize::new(10.0, -1.0), None).is_err());
    assert!(SurfaceGeometry::measure(SurfaceSize::new(f64::INFINITY, 10.0), None).is_err());
}

#[test]
fn geometry_rejects_surfaces_that_floor_to_no_pixels() {
    assert!(SurfaceGeometry::measure(SurfaceSize::new(0.4, 0.4), None).is_err());
    assert!(SurfaceGeometry::measure(SurfaceSize::new(100.0, 0.4), Some(2.0)).is_err());
    let g = SurfaceGeometry::measure(SurfaceSize::new(0.4, 0.4), Some(3.0)).unwrap();
    assert_eq!(g.backing, Canvas { width: 1, height: 1 });
}

#[test]
fn canvas_rgba8_len() {
    assert_eq!(Canvas { width: 3, height: 2 }.rgba8_len(), 24);
}
