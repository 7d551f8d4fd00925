//! sprites - Sprite sheet generation
//!
//! Composes a folder of images into a single sheet, records where each
//! image landed, and names the sheet after a digest of its inputs so
//! unchanged maps are never regenerated.

pub mod cache;
pub mod discovery;
pub mod error;
pub mod render;
pub mod sprite_map;
pub mod types;
pub mod validation;

pub use discovery::{discover, SearchPath, SpriteConfig, SpritePattern};
pub use error::{Result, SpriteError};
pub use render::{Arrangement, LayoutEngine, Placement};
pub use sprite_map::{generate_all, SpriteMap};
pub use types::{Image, Layout, OptionValue, Position, SpriteOptions, State, StateSet};
pub use validation::{validate_sprite_map, Diagnostic, Severity, ValidationResult};
