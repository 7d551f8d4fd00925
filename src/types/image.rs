//! Source image entries of a sprite map.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::ImageReader;
use sha2::{Digest, Sha256};

use crate::discovery::SearchPath;
use crate::error::{Result, SpriteError};

use super::options::SpriteOptions;
use super::state::State;

/// Explicit placement requested for an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Absolute offset in the sheet.
    Pixels { x: u32, y: u32 },
    /// Alignment along the cross axis of the layout, resolved against the
    /// finished sheet bounds.
    Percent(f64),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Pixels { x, y } => write!(f, "{}px {}px", x, y),
            Position::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// A single source image.
///
/// Empty or missing files are valid placeholders with a size of 0 and
/// zero dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Logical name (file stem).
    pub name: String,
    /// Path relative to the search root it was found in, `/`-separated.
    pub relative_file: String,
    /// Absolute path on disk.
    pub file: PathBuf,
    /// File length in bytes.
    pub size: u64,
    /// SHA-256 of the file contents, lowercase hex.
    pub digest: String,
    pub width: u32,
    pub height: u32,
    /// Requested position, if any.
    pub position: Option<Position>,
    /// Spacing override for this image.
    pub spacing: Option<u32>,
    /// State keyword to the name of the variant image.
    pub states: BTreeMap<State, String>,
}

impl Image {
    /// Read metadata for the image at `file`.
    pub fn load(file: &Path, relative_file: impl Into<String>) -> Result<Self> {
        let relative_file = relative_file.into();
        let bytes = match fs::read(file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(SpriteError::Io {
                    path: file.to_path_buf(),
                    message: format!("Failed to read image: {}", e),
                })
            }
        };

        let (width, height) = if bytes.is_empty() {
            (0, 0)
        } else {
            read_dimensions(file, &bytes)?
        };

        Ok(Self {
            name: stem(&relative_file),
            relative_file,
            file: file.to_path_buf(),
            size: bytes.len() as u64,
            digest: format!("{:x}", Sha256::digest(&bytes)),
            width,
            height,
            position: None,
            spacing: None,
            states: BTreeMap::new(),
        })
    }

    /// Locate `relative_file` on the search path and load it.
    ///
    /// The first root containing the file wins. When no root has it, the
    /// image is a placeholder rooted at the first search root.
    pub fn find(search_path: &SearchPath, relative_file: &str) -> Result<Self> {
        let file = search_path.find(relative_file).unwrap_or_else(|| {
            search_path
                .roots()
                .first()
                .map(|root| root.join(relative_file))
                .unwrap_or_else(|| PathBuf::from(relative_file))
        });
        Self::load(&file, relative_file)
    }

    /// Apply the per-image options of the named map.
    pub fn with_options(mut self, map: &str, options: &SpriteOptions) -> Self {
        self.position = options.image_position(map, &self.name);
        self.spacing = options.image_spacing(map, &self.name);
        self
    }

    /// Requested position, as given in the options.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Name of the variant image for a state, if one was composed.
    pub fn state(&self, state: State) -> Option<&str> {
        self.states.get(&state).map(String::as_str)
    }

    /// True when the image has no pixels to draw.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Modification time of the source file, if it exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.file).and_then(|m| m.modified()).ok()
    }
}

fn read_dimensions(file: &Path, bytes: &[u8]) -> Result<(u32, u32)> {
    let decode_err = |message: String| SpriteError::Decode {
        path: file.to_path_buf(),
        message,
    };

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .into_dimensions()
        .map_err(|e| decode_err(e.to_string()))
}

fn stem(relative_file: &str) -> String {
    Path::new(relative_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
