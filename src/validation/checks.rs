//! Individual sprite map checks.

use std::collections::HashSet;

use crate::sprite_map::SpriteMap;
use crate::types::{image_key, Layout, Position};

use super::diagnostic::{Diagnostic, ValidationResult};

pub const PLACEHOLDER: &str = "sprites::validate::placeholder";
pub const UNKNOWN_OVERRIDE: &str = "sprites::validate::unknown-override";
pub const UNPLACED: &str = "sprites::validate::unplaced";
pub const OVERLAP: &str = "sprites::validate::overlap";

/// Images without pixels contribute nothing to the sheet.
pub fn check_placeholders(map: &SpriteMap) -> ValidationResult {
    let mut result = ValidationResult::new();

    for image in map.images().iter().filter(|i| i.is_empty()) {
        result.push(
            Diagnostic::warning(
                PLACEHOLDER,
                format!("'{}' in {} has no pixels", image.name, map.path()),
            )
            .with_help(format!("Check {}", image.file.display())),
        );
    }

    result
}

/// Per-image position and spacing options that name no image of the map.
pub fn check_unknown_overrides(map: &SpriteMap) -> ValidationResult {
    let mut result = ValidationResult::new();

    let prefix = map.name().replace('-', "_");
    let known: HashSet<String> = map
        .images()
        .iter()
        .map(|i| i.name.replace('-', "_"))
        .collect();

    for (key, _) in map.options().iter() {
        let Some(rest) = key.strip_prefix(prefix.as_str()).and_then(|r| r.strip_prefix('_')) else {
            continue;
        };
        let target = rest
            .strip_suffix("_position")
            .or_else(|| rest.strip_suffix("_spacing"));
        let Some(target) = target else {
            continue;
        };
        if !target.is_empty() && !known.contains(target) {
            result.push(
                Diagnostic::warning(
                    UNKNOWN_OVERRIDE,
                    format!("Option '{}' names no image in {}", key, map.path()),
                )
                .with_help("Per-image options use <map>_<image>_position or <map>_<image>_spacing"),
            );
        }
    }

    result
}

/// The custom layout only honours pixel positions.
pub fn check_unplaced(map: &SpriteMap) -> ValidationResult {
    let mut result = ValidationResult::new();
    if map.layout() != Layout::Custom {
        return result;
    }

    for image in map.images() {
        if !matches!(image.position(), Some(Position::Pixels { .. })) {
            result.push(
                Diagnostic::warning(
                    UNPLACED,
                    format!("'{}' has no pixel position and is drawn at 0,0", image.name),
                )
                .with_help(format!(
                    "Set {} to a value such as \"10px 20px\"",
                    image_key(map.name(), &image.name, "position")
                )),
            );
        }
    }

    result
}

/// Drawn images must not cover each other.
pub fn check_overlaps(map: &SpriteMap) -> ValidationResult {
    let mut result = ValidationResult::new();
    let drawn: Vec<_> = map
        .placements()
        .iter()
        .filter(|p| p.width > 0 && p.height > 0)
        .collect();

    for (i, first) in drawn.iter().enumerate() {
        for second in &drawn[i + 1..] {
            if first.intersects(second) {
                result.push(
                    Diagnostic::error(
                        OVERLAP,
                        format!(
                            "'{}' at {},{} overlaps '{}' at {},{}",
                            first.name, first.x, first.y, second.name, second.x, second.y
                        ),
                    )
                    .with_help("Adjust the pixel positions of the overlapping images"),
                );
            }
        }
    }

    result
}
