//! Sheet compositing and PNG output.
//!
//! Decodes every positioned image, overlays it onto a transparent canvas
//! and writes the result so readers never observe a partial file.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};
use tempfile::NamedTempFile;

use crate::error::{Result, SpriteError};
use crate::types::Image;

use super::layout::Arrangement;

/// Composite `images` onto one canvas at their placements.
///
/// A sheet without area becomes a single transparent pixel, since PNG
/// cannot encode zero dimensions.
pub fn composite(images: &[Image], arrangement: &Arrangement) -> Result<RgbaImage> {
    let width = arrangement.width.max(1);
    let height = arrangement.height.max(1);
    let mut canvas = RgbaImage::new(width, height);

    for (source, placement) in images.iter().zip(&arrangement.placements) {
        if source.is_empty() {
            continue;
        }

        let decoded = image::open(&source.file)
            .map_err(|e| SpriteError::Decode {
                path: source.file.clone(),
                message: e.to_string(),
            })?
            .to_rgba8();

        imageops::overlay(
            &mut canvas,
            &decoded,
            i64::from(placement.x),
            i64::from(placement.y),
        );
    }

    Ok(canvas)
}

/// Encode `sheet` as PNG and write it to `path`.
pub fn write_png(sheet: &RgbaImage, path: &Path) -> Result<()> {
    let mut bytes = Cursor::new(Vec::new());
    sheet
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| SpriteError::Write {
            path: path.to_path_buf(),
            message: format!("Failed to encode PNG: {}", e),
        })?;

    write_atomic(path, bytes.get_ref())
}

/// Write `contents` to a temporary file beside `path`, then rename it into place.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |message: String| SpriteError::Write {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_err(format!("Failed to create directory: {}", e)))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| write_err(e.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| write_err(e.to_string()))?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}
