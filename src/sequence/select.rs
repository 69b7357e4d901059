/// Map a scroll fraction to a frame index in a sequence of `count` frames.
///
/// `clamp(floor(progress * count), 0, count - 1)`. Progress is clamped to `[0, 1]` first and NaN
/// counts as `0`, so drift past either end never produces an out-of-range index. Returns `None`
/// for an empty sequence.
pub fn frame_index(progress: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let p = clamp_progress(progress);
    let raw = (p * count as f64).floor() as usize;
    Some(raw.min(count - 1))
}

/// Clamp a delivered scroll fraction into `[0, 1]`, mapping NaN to `0`.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/select.rs"]
mod tests;
