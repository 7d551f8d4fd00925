//! Image set loading.
//!
//! Expands a sprite pattern such as `icons/*.png` against every root of a
//! search path and loads the matches as `Image` entries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

use crate::error::{Result, SpriteError};
use crate::types::Image;

use super::resolver::{relative_to, SearchPath};

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A validated sprite pattern: a folder plus one wildcard file segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpritePattern {
    pattern: String,
    path: String,
}

impl SpritePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let invalid = |message: &str| SpriteError::Pattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        };

        if pattern.starts_with('/') {
            return Err(invalid("pattern must be relative to the sprite load path"));
        }

        let (dir, file) = pattern
            .rsplit_once('/')
            .ok_or_else(|| invalid("pattern needs a folder, e.g. icons/*.png"))?;

        if dir.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
            return Err(invalid("folder segments must be plain names"));
        }
        if dir.contains(GLOB_META) {
            return Err(invalid("only the file segment may contain a wildcard"));
        }
        if !file.contains('*') {
            return Err(invalid("the file segment needs a wildcard"));
        }
        Pattern::new(file).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            path: dir.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Folder part of the pattern, e.g. `nested/squares`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last folder segment, e.g. `squares`.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Files matching `pattern`, in root priority order.
///
/// Within a root, matches are sorted by relative path. A logical name found
/// in an earlier root shadows the same name in later roots.
pub fn matching_files(
    pattern: &SpritePattern,
    search_path: &SearchPath,
) -> Result<Vec<(String, PathBuf)>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut files = Vec::new();

    for root in search_path.roots() {
        let mut matches = matches_in_root(pattern, root)?;
        matches.sort_by(|a, b| a.0.cmp(&b.0));

        for (relative, path) in matches {
            if seen.insert(logical_name(&relative)) {
                files.push((relative, path));
            }
        }
    }

    Ok(files)
}

/// Load every image matching `pattern`.
pub fn load_images(pattern: &SpritePattern, search_path: &SearchPath) -> Result<Vec<Image>> {
    matching_files(pattern, search_path)?
        .into_iter()
        .map(|(relative, path)| Image::load(&path, relative))
        .collect()
}

fn matches_in_root(pattern: &SpritePattern, root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern.as_str()
    );
    let entries = glob(&full).map_err(|e| SpriteError::Pattern {
        pattern: pattern.as_str().to_string(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                if let Some(relative) = relative_to(root, &path) {
                    matches.push((relative, path));
                }
            }
            Err(e) => {
                log::warn!("skipping unreadable path {}: {}", e.path().display(), e.error());
            }
        }
    }

    Ok(matches)
}

fn logical_name(relative: &str) -> String {
    Path::new(relative)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
