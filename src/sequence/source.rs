use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ScrollframeError, ScrollframeResult};

/// Where frame bytes come from.
///
/// Implementations are called concurrently from loader worker threads, one call per candidate
/// locator. A failed fetch only drops that frame.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes behind `locator`.
    fn fetch(&self, locator: &str) -> ScrollframeResult<Vec<u8>>;
}

/// Frames stored as files under a root directory.
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    root: PathBuf,
}

impl DirFrameSource {
    /// Create a source that resolves locators relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this source.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for DirFrameSource {
    fn fetch(&self, locator: &str) -> ScrollframeResult<Vec<u8>> {
        let norm = normalize_rel_path(locator)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p).map_err(|e| {
            ScrollframeError::load(format!("failed to read frame '{}': {e}", p.display()))
        })
    }
}

/// Frames held in memory, keyed by locator.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFrameSource {
    /// Create an empty source; every fetch fails until entries are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `locator`, replacing any previous entry.
    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(locator.into(), bytes);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fetch(&self, locator: &str) -> ScrollframeResult<Vec<u8>> {
        self.entries
            .get(locator)
            .cloned()
            .ok_or_else(|| ScrollframeError::load(format!("no frame stored at '{locator}'")))
    }
}

/// Normalize and validate source-relative locators.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> ScrollframeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ScrollframeError::validation("frame paths must be relative"));
    }
    if s.is_empty() {
        return Err(ScrollframeError::validation("frame path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrollframeError::validation(
                "frame paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrollframeError::validation(
            "frame path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/source.rs"]
mod tests;
