/// Scroll fraction of a page, as a host scroll tracker reports it.
///
/// `offset / (content_extent - viewport_extent)`, clamped to `[0, 1]`. A page that cannot scroll
/// (content no taller than the viewport) reports `0`.
pub fn scroll_progress(offset: f64, content_extent: f64, viewport_extent: f64) -> f64 {
    let range = content_extent - viewport_extent;
    if !range.is_finite() || range <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / range).clamp(0.0, 1.0)
}
