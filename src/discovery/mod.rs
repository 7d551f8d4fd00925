//! Source image discovery.
//!
//! This module turns a sprite pattern plus a search path into the ordered
//! list of images a sprite map is built from, and reads the project
//! configuration that supplies those search roots.
//!
//! # Example
//!
//! ```ignore
//! use sprites::discovery::{discover, load_images, SpritePattern};
//!
//! let config = discover("./site")?;
//! let pattern = SpritePattern::parse("icons/*.png")?;
//! let images = load_images(&pattern, &config.search_path())?;
//! ```

mod loader;
mod manifest;
mod resolver;

use std::path::Path;

use crate::error::Result;

pub use loader::{load_images, matching_files, SpritePattern};
pub use manifest::SpriteConfig;
pub use resolver::{normalize, relative_to, SearchPath};

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "sprites.yaml";

/// Load the configuration for a project directory.
///
/// Reads `sprites.yaml` from `root` when present. Otherwise images are
/// expected under `root/images`.
pub fn discover(root: impl AsRef<Path>) -> Result<SpriteConfig> {
    let root = root.as_ref();
    let config_path = root.join(CONFIG_FILENAME);

    if config_path.exists() {
        SpriteConfig::load(&config_path)
    } else {
        Ok(SpriteConfig::default().relative_to(root))
    }
}
