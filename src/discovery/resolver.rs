//! Search path resolution.
//!
//! Maps absolute image paths back to their root-relative logical names.
//! Matching is done on whole path components, so a root `assets/other`
//! never claims files under `assets/other2`.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SpriteError};

/// Ordered list of directories searched for sprite images.
///
/// Earlier roots take priority over later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            roots: roots.into_iter().map(|r| normalize(r.as_ref())).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Logical name of `file`: its path below the deepest root containing it.
    ///
    /// Roots of equal depth are tried in declaration order.
    pub fn relative_name(&self, file: &Path) -> Result<String> {
        let file = normalize(file);
        let mut best: Option<(usize, String)> = None;

        for root in &self.roots {
            let Some(name) = relative_to(root, &file) else {
                continue;
            };
            let depth = root.components().count();
            if best.as_ref().map_or(true, |(d, _)| depth > *d) {
                best = Some((depth, name));
            }
        }

        best.map(|(_, name)| name)
            .ok_or(SpriteError::Resolution { path: file })
    }

    /// First root containing `relative`, joined with it.
    pub fn find(&self, relative: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
    }
}

/// Path of `file` below `root` as a `/`-separated name.
///
/// Returns `None` unless `root` is a proper ancestor of `file`.
pub fn relative_to(root: &Path, file: &Path) -> Option<String> {
    let rest = file.strip_prefix(root).ok()?;
    let segments: Vec<String> = rest
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Lexically normalize a path, dropping `.` and folding `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
