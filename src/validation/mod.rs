//! Sprite map validation.
//!
//! Checks a built sprite map for configurations that produce a surprising
//! sheet. Warnings flag likely mistakes; errors flag sheets whose images
//! cannot be told apart.

mod checks;
mod diagnostic;

pub use checks::{OVERLAP, PLACEHOLDER, UNKNOWN_OVERRIDE, UNPLACED};
pub use diagnostic::{Diagnostic, Severity, ValidationResult};

use crate::sprite_map::SpriteMap;

/// Run every check against `map`.
pub fn validate_sprite_map(map: &SpriteMap) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_placeholders(map));
    result.merge(checks::check_unknown_overrides(map));
    result.merge(checks::check_unplaced(map));
    result.merge(checks::check_overlaps(map));

    result
}

/// Log every diagnostic at the level matching its severity.
pub fn log_diagnostics(result: &ValidationResult) {
    for d in result.iter() {
        match d.severity {
            Severity::Error => log::error!("{}", d),
            Severity::Warning => log::warn!("{}", d),
        }
    }
}
