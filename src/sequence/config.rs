use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{ScrollframeError, ScrollframeResult};
use crate::sequence::source::normalize_rel_path;

/// Upper bound on candidate frames in the reference configuration.
pub const DEFAULT_MAX_FRAMES: usize = 300;

/// Environment variable overriding the loader thread count.
pub const LOAD_THREADS_ENV: &str = "SCROLLFRAME_LOAD_THREADS";

const MAX_PAD_WIDTH: usize = 12;

/// Naming scheme and bounds of a frame sequence.
///
/// Candidate locators are `"{prefix}{index}.{extension}"` where `index` runs over
/// `first..first + max_frames` and is zero-padded to `pad_width` digits. The same `max_frames`
/// bounds the loaded [`crate::FrameSet`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSequenceConfig {
    /// Path prefix relative to the frame source root, including any file-name stem.
    pub prefix: String,
    /// Minimum number of digits in the frame number.
    pub pad_width: usize,
    /// Number of the first candidate frame.
    pub first: u32,
    /// Number of candidate frames requested.
    pub max_frames: usize,
    /// File extension without the leading dot.
    pub extension: String,
}

impl Default for FrameSequenceConfig {
    fn default() -> Self {
        Self {
            prefix: "character/male".to_string(),
            pad_width: 4,
            first: 1,
            max_frames: DEFAULT_MAX_FRAMES,
            extension: "png".to_string(),
        }
    }
}

impl FrameSequenceConfig {
    /// Parse a config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollframeResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ScrollframeError::validation(format!("parse sequence config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollframeError::validation(format!(
                "open sequence config JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check that the scheme can produce valid, bounded locators.
    pub fn validate(&self) -> ScrollframeResult<()> {
        if self.max_frames == 0 {
            return Err(ScrollframeError::validation("max_frames must be >= 1"));
        }
        if self.pad_width > MAX_PAD_WIDTH {
            return Err(ScrollframeError::validation(format!(
                "pad_width must be <= {MAX_PAD_WIDTH}"
            )));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(ScrollframeError::validation(
                "extension must be a bare, non-empty suffix",
            ));
        }
        if u64::from(self.first) + self.max_frames as u64 > u64::from(u32::MAX) + 1 {
            return Err(ScrollframeError::validation(
                "frame numbers overflow u32 for first + max_frames",
            ));
        }
        // A bare stem like "frame" is fine; anything path-like must stay relative.
        let probe = format!("{}0.{}", self.prefix, self.extension);
        normalize_rel_path(&probe)?;
        Ok(())
    }

    /// Locator of the candidate at position `slot` (0-based) in request order.
    pub fn locator(&self, slot: usize) -> String {
        let number = u64::from(self.first) + slot as u64;
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            number,
            self.extension,
            width = self.pad_width
        )
    }

    /// All candidate locators in request order.
    pub fn locators(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.max_frames).map(|slot| self.locator(slot))
    }
}

/// Options for the frame loader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOpts {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl LoadOpts {
    /// Read options from the environment (`SCROLLFRAME_LOAD_THREADS`).
    ///
    /// Unparseable or zero values are ignored.
    pub fn from_env() -> Self {
        let threads = std::env::var(LOAD_THREADS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self { threads }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/config.rs"]
mod tests;
