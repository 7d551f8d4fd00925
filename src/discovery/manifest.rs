//! Project configuration (sprites.yaml) parsing.
//!
//! The configuration names where source images live, where generated sheets
//! are written, and the default options applied to every sprite map.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteError};
use crate::types::SpriteOptions;

use super::resolver::SearchPath;

/// Sprite configuration loaded from sprites.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Directory holding the source image folders.
    #[serde(default = "default_images_path")]
    pub images_path: PathBuf,

    /// Directory generated sheets are written to. Defaults to `images_path`.
    #[serde(default)]
    pub generated_images_path: Option<PathBuf>,

    /// Ordered search roots. Defaults to `[images_path]`.
    #[serde(default)]
    pub sprite_load_path: Vec<PathBuf>,

    /// Options applied to every sprite map before per-map options.
    #[serde(default)]
    pub options: SpriteOptions,
}

fn default_images_path() -> PathBuf {
    PathBuf::from("images")
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            images_path: default_images_path(),
            generated_images_path: None,
            sprite_load_path: vec![],
            options: SpriteOptions::default(),
        }
    }
}

impl SpriteConfig {
    pub fn new(images_path: impl Into<PathBuf>) -> Self {
        Self {
            images_path: images_path.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a sprites.yaml file.
    ///
    /// Relative paths in the file are resolved against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read configuration: {}", e),
        })?;

        let config = Self::parse(&content)?;
        Ok(match path.parent() {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SpriteError::Config {
            message: format!("Invalid configuration: {}", e),
            help: Some("Check sprites.yaml syntax".to_string()),
        })
    }

    /// Resolve every relative path against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.images_path = base.join(&self.images_path);
        self.generated_images_path = self.generated_images_path.map(|p| base.join(p));
        self.sprite_load_path = self
            .sprite_load_path
            .into_iter()
            .map(|p| base.join(p))
            .collect();
        self
    }

    pub fn with_generated_images_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.generated_images_path = Some(path.into());
        self
    }

    pub fn with_load_path<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sprite_load_path = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: SpriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Search roots in priority order.
    pub fn search_path(&self) -> SearchPath {
        if self.sprite_load_path.is_empty() {
            SearchPath::new([&self.images_path])
        } else {
            SearchPath::new(&self.sprite_load_path)
        }
    }

    /// Directory generated sheets are written to.
    pub fn generated_images_dir(&self) -> &Path {
        self.generated_images_path
            .as_deref()
            .unwrap_or(self.images_path.as_path())
    }
}
