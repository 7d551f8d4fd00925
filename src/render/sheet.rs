//! Sprite sheet position metadata.
//!
//! Writes the placement of every image as a TexturePacker-compatible JSON
//! Hash document, the form the stylesheet layer consumes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SpriteError};

use super::layout::Arrangement;
use super::png::write_atomic;

/// Serialize `arrangement` for the sheet stored as `image`.
pub fn positions_json(arrangement: &Arrangement, image: &str) -> Result<String> {
    let output = SheetJson::new(arrangement, image);
    serde_json::to_string_pretty(&output).map_err(|e| SpriteError::Write {
        path: image.into(),
        message: format!("Failed to serialize sheet positions: {}", e),
    })
}

/// Write the positions of `arrangement` to `path`.
pub fn write_positions_json(arrangement: &Arrangement, image: &str, path: &Path) -> Result<()> {
    let json = positions_json(arrangement, image)?;
    write_atomic(path, json.as_bytes())
}

#[derive(Serialize)]
struct SheetJson<'a> {
    frames: BTreeMap<&'a str, FrameJson>,
    meta: MetaJson<'a>,
}

#[derive(Serialize)]
struct FrameJson {
    frame: RectJson,
    rotated: bool,
    trimmed: bool,
    #[serde(rename = "sourceSize")]
    source_size: SizeJson,
}

#[derive(Serialize)]
struct RectJson {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct SizeJson {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct MetaJson<'a> {
    app: &'static str,
    version: &'static str,
    image: &'a str,
    size: SizeJson,
}

impl<'a> SheetJson<'a> {
    fn new(arrangement: &'a Arrangement, image: &'a str) -> Self {
        let frames = arrangement
            .placements
            .iter()
            .map(|p| {
                (
                    p.name.as_str(),
                    FrameJson {
                        frame: RectJson {
                            x: p.x,
                            y: p.y,
                            w: p.width,
                            h: p.height,
                        },
                        rotated: false,
                        trimmed: false,
                        source_size: SizeJson {
                            w: p.width,
                            h: p.height,
                        },
                    },
                )
            })
            .collect();

        SheetJson {
            frames,
            meta: MetaJson {
                app: "sprites",
                version: env!("CARGO_PKG_VERSION"),
                image,
                size: SizeJson {
                    w: arrangement.width,
                    h: arrangement.height,
                },
            },
        }
    }
}
