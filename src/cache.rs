//! Uniqueness hashing and generated-file bookkeeping.
//!
//! A sprite sheet is written to `<dir>/<path>-s<hash>.png`, where the hash
//! covers every input that changes the rendered bytes. A changed input
//! therefore yields a new filename, and the presence of the file is the
//! whole cache check.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::types::{Image, Layout, SpriteOptions};

/// Hex characters kept from the digest.
pub const HASH_LENGTH: usize = 10;

/// Extension of generated sheets.
pub const SHEET_EXTENSION: &str = "png";

/// Bumped whenever the hash inputs or the renderer output change.
const FORMAT_VERSION: &str = "sprites-1";

/// Digest over the layout, every image and the map-wide rendering options.
///
/// Per-image overrides enter through each image's resolved position and
/// spacing, so options aimed at other maps never change the digest.
/// Each field is terminated by a NUL byte so adjacent fields cannot run
/// together.
pub fn uniqueness_hash(layout: Layout, images: &[Image], options: &SpriteOptions) -> String {
    let mut hasher = Sha256::new();
    let mut feed = |field: &str| {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    };

    feed(FORMAT_VERSION);
    feed(layout.keyword());

    for image in images {
        feed(&image.relative_file);
        feed(&image.width.to_string());
        feed(&image.height.to_string());
        feed(&image.spacing.map(|s| s.to_string()).unwrap_or_default());
        feed(&image.position.map(|p| p.to_string()).unwrap_or_default());
        feed(&image.digest);
    }

    for (key, value) in options.iter() {
        if SpriteOptions::affects_output(key) {
            feed(key);
            feed(&value.to_string());
        }
    }

    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_LENGTH].to_string()
}

/// Generated filename for the sprite map at `path` with the given hash.
pub fn sheet_filename(dir: &Path, path: &str, hash: &str) -> PathBuf {
    dir.join(format!("{}-s{}.{}", path, hash, SHEET_EXTENSION))
}

/// Whether `file_name` looks like a sheet generated for the map `name`.
pub fn is_generated_name(file_name: &str, name: &str) -> bool {
    let hash = file_name
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix("-s"))
        .and_then(|rest| rest.strip_suffix(&format!(".{}", SHEET_EXTENSION)));

    match hash {
        Some(hash) => {
            hash.len() == HASH_LENGTH
                && hash.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}

/// True when `output` is missing or older than any existing source file.
pub fn is_outdated(output: &Path, images: &[Image]) -> bool {
    let Ok(generated) = fs::metadata(output).and_then(|m| m.modified()) else {
        return true;
    };

    images
        .iter()
        .filter_map(Image::modified)
        .any(|modified| modified > generated)
}

/// Delete sheets generated for `name` next to `output`, except `output`.
///
/// Best effort: a file that is already gone counts as removed, and other
/// failures are logged and skipped. Returns the number of files removed.
pub fn remove_stale(output: &Path, name: &str) -> usize {
    let Some(dir) = output.parent() else {
        return 0;
    };

    let mut removed = 0;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path == output || !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_generated_name(file_name, name) {
            continue;
        }

        if remove_sheet(path) {
            removed += 1;
        }
    }

    removed
}

/// Delete one stale sheet. A sheet that is already gone counts as removed.
fn remove_sheet(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed stale sprite sheet {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            log::warn!("could not remove stale sprite sheet {}: {}", path.display(), e);
            false
        }
    }
}
