//! Sprite maps: one pattern of source images composed into one sheet.
//!
//! A `SpriteMap` is built fresh for every generation request. Its identity
//! (name, path, images, options) is fixed at construction; the layout and
//! the uniqueness hash are computed on first use and cached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rayon::prelude::*;

use crate::cache;
use crate::discovery::{load_images, SpriteConfig, SpritePattern};
use crate::error::{Result, SpriteError};
use crate::render::{
    composite, write_png, write_positions_json, Arrangement, LayoutEngine, Placement,
};
use crate::types::{compose_states, Image, Layout, SpriteOptions, State, StateSet};
use crate::validation::{log_diagnostics, validate_sprite_map, ValidationResult};

#[derive(Debug)]
pub struct SpriteMap {
    name: String,
    path: String,
    layout: Layout,
    spacing: u32,
    images: Vec<Image>,
    options: SpriteOptions,
    generated_images_dir: PathBuf,
    arrangement: OnceLock<Arrangement>,
    uniqueness_hash: OnceLock<String>,
}

impl SpriteMap {
    /// Build the map for `pattern` (e.g. `icons/*.png`).
    ///
    /// `options` are applied on top of the configuration's default options.
    pub fn from_pattern(
        pattern: &str,
        config: &SpriteConfig,
        options: &SpriteOptions,
    ) -> Result<Self> {
        let pattern = SpritePattern::parse(pattern)?;
        let options = config.options.merged(options);
        let images = load_images(&pattern, &config.search_path())?;

        Self::new(
            pattern.name(),
            pattern.path(),
            images,
            options,
            config.generated_images_dir(),
        )
    }

    /// Build a map from already loaded images.
    ///
    /// Image names must be unique within the map.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        images: Vec<Image>,
        options: SpriteOptions,
        generated_images_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let name = name.into();
        let layout = options.layout()?;
        let spacing = options.spacing()?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = images.iter().find(|i| !seen.insert(i.name.as_str())) {
            return Err(SpriteError::Config {
                message: format!("Sprite map '{}' contains '{}' twice", name, duplicate.name),
                help: Some("Rename one of the source images".to_string()),
            });
        }

        let mut images: Vec<Image> = images
            .into_iter()
            .map(|image| image.with_options(&name, &options))
            .collect();
        compose_states(&mut images, options.separator(), &StateSet::from_options(&options));

        Ok(Self {
            name,
            path: path.into(),
            layout,
            spacing,
            images,
            options,
            generated_images_dir: generated_images_dir.into(),
            arrangement: OnceLock::new(),
            uniqueness_hash: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder path of the map, e.g. `nested/squares`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    pub fn options(&self) -> &SpriteOptions {
        &self.options
    }

    /// Images in packing order, state variants included.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn image_for(&self, name: &str) -> Option<&Image> {
        self.images.iter().find(|i| i.name == name)
    }

    pub fn sprite_names(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn image_filenames(&self) -> Vec<&Path> {
        self.images.iter().map(|i| i.file.as_path()).collect()
    }

    pub fn has_state(&self, name: &str, state: State) -> bool {
        self.state_image(name, state).is_some()
    }

    /// The variant image of `name` for `state`.
    pub fn state_image(&self, name: &str, state: State) -> Option<&Image> {
        let variant = self.image_for(name)?.state(state)?;
        self.image_for(variant)
    }

    /// Sheet layout, computed once.
    pub fn arrangement(&self) -> &Arrangement {
        self.arrangement
            .get_or_init(|| LayoutEngine::new(self.layout, self.spacing).arrange(&self.images))
    }

    /// Sheet size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.arrangement().size()
    }

    /// Where each image sits in the sheet, in image order.
    pub fn placements(&self) -> &[Placement] {
        &self.arrangement().placements
    }

    pub fn placement_for(&self, name: &str) -> Option<&Placement> {
        self.arrangement().get(name)
    }

    /// Digest of every input that affects the sheet, computed once.
    pub fn uniqueness_hash(&self) -> &str {
        self.uniqueness_hash
            .get_or_init(|| cache::uniqueness_hash(self.layout, &self.images, &self.options))
    }

    /// Path of the generated sheet for the current inputs.
    pub fn filename(&self) -> PathBuf {
        cache::sheet_filename(&self.generated_images_dir, &self.path, self.uniqueness_hash())
    }

    /// True when no sheet exists for the current inputs.
    pub fn generation_required(&self) -> bool {
        !self.filename().exists()
    }

    /// True when the sheet is missing or older than any source image.
    pub fn outdated(&self) -> bool {
        self.generation_required() || cache::is_outdated(&self.filename(), &self.images)
    }

    /// Composite and write the sheet, then remove stale sheets when cleanup is on.
    pub fn generate(&self) -> Result<PathBuf> {
        let output = self.filename();
        let sheet = composite(&self.images, self.arrangement())?;
        write_png(&sheet, &output)?;

        let (width, height) = self.size();
        log::debug!(
            "generated sprite map {} ({}x{}, {} images) at {}",
            self.path,
            width,
            height,
            self.images.len(),
            output.display()
        );

        if self.options.cleanup() {
            cache::remove_stale(&output, &self.name);
        }

        Ok(output)
    }

    /// Generate only when the sheet is outdated. Returns the sheet path either way.
    pub fn generate_if_required(&self) -> Result<PathBuf> {
        if self.outdated() {
            self.generate()
        } else {
            log::debug!("sprite map {} is up to date", self.path);
            Ok(self.filename())
        }
    }

    /// Check the map and log every finding.
    pub fn validate(&self) -> ValidationResult {
        let result = validate_sprite_map(self);
        log_diagnostics(&result);
        result
    }

    /// Write the placements as JSON next to the sheet, as `<path>.json`.
    pub fn write_positions(&self) -> Result<PathBuf> {
        let sheet = self.filename();
        let image = sheet
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = self
            .generated_images_dir
            .join(format!("{}.json", self.path));

        write_positions_json(self.arrangement(), &image, &output)?;
        Ok(output)
    }
}

/// Generate independent sprite maps in parallel.
///
/// Returns one result per map, in input order.
pub fn generate_all(maps: &[SpriteMap]) -> Vec<Result<PathBuf>> {
    maps.par_iter().map(SpriteMap::generate_if_required).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn project(names: &[&str]) -> (TempDir, SpriteConfig) {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(images.join("selectors")).unwrap();
        for name in names {
            RgbaImage::from_pixel(10, 10, Rgba([200, 10, 10, 255]))
                .save(images.join(format!("selectors/{}.png", name)))
                .unwrap();
        }
        (dir, SpriteConfig::new(images))
    }

    fn selectors(config: &SpriteConfig, options: SpriteOptions) -> SpriteMap {
        SpriteMap::from_pattern("selectors/*.png", config, &options).unwrap()
    }

    #[test]
    fn test_from_pattern_identity() {
        let (_dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new());

        assert_eq!(map.name(), "selectors");
        assert_eq!(map.path(), "selectors");
        assert_eq!(map.sprite_names(), vec!["a", "b"]);
        assert_eq!(map.layout(), Layout::Vertical);
    }

    #[test]
    fn test_nested_pattern() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(images.join("nested/squares")).unwrap();
        fs::write(images.join("nested/squares/ten.png"), b"").unwrap();

        let config = SpriteConfig::new(&images);
        let map = SpriteMap::from_pattern("nested/squares/*.png", &config, &SpriteOptions::new())
            .unwrap();

        assert_eq!(map.name(), "squares");
        assert_eq!(map.path(), "nested/squares");
        assert!(map
            .filename()
            .starts_with(images.join("nested")));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let dir = tempdir().unwrap();
        let first = Image::load(&dir.path().join("a.png"), "x/a.png").unwrap();
        let second = Image::load(&dir.path().join("b/a.png"), "x/b/a.png").unwrap();

        let err = SpriteMap::new("x", "x", vec![first, second], SpriteOptions::new(), dir.path())
            .unwrap_err();
        assert!(matches!(err, SpriteError::Config { .. }));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let (_dir, config) = project(&["a"]);
        let options = SpriteOptions::new().with("layout", "spiral");
        assert!(SpriteMap::from_pattern("selectors/*.png", &config, &options).is_err());
    }

    #[test]
    fn test_config_options_are_defaults() {
        let (_dir, config) = project(&["a", "b"]);
        let config = config.with_options(SpriteOptions::new().with("layout", "horizontal"));

        let map = selectors(&config, SpriteOptions::new());
        assert_eq!(map.size(), (20, 10));

        let map = selectors(&config, SpriteOptions::new().with("layout", "vertical"));
        assert_eq!(map.size(), (10, 20));
    }

    #[test]
    fn test_states_linked() {
        let (_dir, config) = project(&["arrow", "arrow_hover", "arrow_active"]);
        let map = selectors(&config, SpriteOptions::new());

        assert!(map.has_state("arrow", State::Hover));
        assert!(map.has_state("arrow", State::Active));
        assert!(!map.has_state("arrow", State::Target));
        assert_eq!(
            map.state_image("arrow", State::Hover).map(|i| i.name.as_str()),
            Some("arrow_hover")
        );
    }

    #[test]
    fn test_percent_position_kept_verbatim() {
        let (_dir, config) = project(&["a"]);
        let map = selectors(
            &config,
            SpriteOptions::new().with("selectors_a_position", "50%"),
        );
        assert_eq!(
            map.image_for("a").unwrap().position(),
            Some(Position::Percent(50.0))
        );
    }

    #[test]
    fn test_hash_and_filename() {
        let (dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new());
        let again = selectors(&config, SpriteOptions::new());

        assert_eq!(map.uniqueness_hash().len(), cache::HASH_LENGTH);
        assert_eq!(map.uniqueness_hash(), again.uniqueness_hash());
        assert_eq!(
            map.filename(),
            dir.path()
                .join("images")
                .join(format!("selectors-s{}.png", map.uniqueness_hash()))
        );

        let spaced = selectors(&config, SpriteOptions::new().with("spacing", 4u32));
        assert_ne!(map.filename(), spaced.filename());
    }

    #[test]
    fn test_generate_cycle() {
        let (_dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new());

        assert!(map.generation_required());
        assert!(map.outdated());

        let output = map.generate().unwrap();

        assert_eq!(output, map.filename());
        assert!(!map.generation_required());
        assert!(!map.outdated());

        let sheet = image::open(&output).unwrap().to_rgba8();
        assert_eq!(sheet.dimensions(), (10, 20));
        assert_eq!(sheet.get_pixel(5, 15).0, [200, 10, 10, 255]);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let (_dir, config) = project(&["a"]);
        let map = selectors(&config, SpriteOptions::new());

        let first = fs::read(map.generate().unwrap()).unwrap();
        let second = fs::read(map.generate().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_if_required_skips_fresh_sheet() {
        let (_dir, config) = project(&["a"]);
        let map = selectors(&config, SpriteOptions::new());
        let output = map.generate().unwrap();

        fs::write(&output, b"sentinel").unwrap();
        assert_eq!(map.generate_if_required().unwrap(), output);
        assert_eq!(fs::read(&output).unwrap(), b"sentinel");
    }

    #[test]
    fn test_generate_empty_map() {
        let (_dir, config) = project(&[]);
        let map = selectors(&config, SpriteOptions::new());

        assert!(map.images().is_empty());
        assert_eq!(map.size(), (0, 0));

        let output = map.generate().unwrap();
        assert!(image::open(output).is_ok());
    }

    #[test]
    fn test_cleanup_disabled_keeps_old_sheet() {
        let (dir, config) = project(&["a", "b"]);
        let options = SpriteOptions::new().with("cleanup", false);
        let old = selectors(&config, options.clone()).generate().unwrap();

        fs::remove_file(dir.path().join("images/selectors/b.png")).unwrap();
        let new = selectors(&config, options).generate().unwrap();

        assert_ne!(old, new);
        assert!(old.exists());
        assert!(new.exists());
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let (dir, config) = project(&["a"]);
        let map = selectors(&config, SpriteOptions::new());
        fs::write(dir.path().join("images/selectors/a.png"), b"garbage").unwrap();

        assert!(matches!(map.generate(), Err(SpriteError::Decode { .. })));
        assert!(!map.filename().exists());
    }

    #[test]
    fn test_write_failure_keeps_previous_sheet() {
        let (dir, config) = project(&["a"]);
        let map = selectors(&config, SpriteOptions::new());
        let previous = dir.path().join("images/selectors-s0000000000.png");
        fs::write(&previous, b"previous").unwrap();
        fs::create_dir_all(map.filename()).unwrap();

        let err = map.generate().unwrap_err();

        assert!(matches!(err, SpriteError::Write { .. }));
        assert_eq!(fs::read(&previous).unwrap(), b"previous");
    }

    #[test]
    fn test_options_for_other_maps_keep_filename() {
        let (_dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new());

        let other = selectors(
            &config,
            SpriteOptions::new().with("buttons_ok_position", "5px 5px"),
        );
        assert_eq!(map.placements(), other.placements());
        assert_eq!(map.filename(), other.filename());

        let moved = selectors(
            &config,
            SpriteOptions::new().with("selectors_b_position", "5px 5px"),
        );
        assert_ne!(map.filename(), moved.filename());
    }

    #[test]
    fn test_invalid_spacing_rejected() {
        let (_dir, config) = project(&["a"]);
        let options = SpriteOptions::new().with("spacing", "wide");
        assert!(matches!(
            SpriteMap::from_pattern("selectors/*.png", &config, &options),
            Err(SpriteError::Config { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let (_dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new().with("layout", "custom"));

        let result = map.validate();

        assert!(result.has_errors());
        assert_eq!(result.warning_count(), 2);
    }

    #[test]
    fn test_write_positions() {
        let (dir, config) = project(&["a", "b"]);
        let map = selectors(&config, SpriteOptions::new());

        let path = map.write_positions().unwrap();

        assert_eq!(path, dir.path().join("images/selectors.json"));
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["frames"]["b"]["frame"]["y"], 10);
    }

    #[test]
    fn test_generate_all() {
        let (dir, config) = project(&["a"]);
        fs::create_dir_all(dir.path().join("images/other")).unwrap();
        fs::write(dir.path().join("images/other/blank.png"), b"").unwrap();

        let maps = vec![
            selectors(&config, SpriteOptions::new()),
            SpriteMap::from_pattern("other/*.png", &config, &SpriteOptions::new()).unwrap(),
        ];

        let results = generate_all(&maps);

        assert_eq!(results.len(), 2);
        for (map, result) in maps.iter().zip(results) {
            assert_eq!(result.unwrap(), map.filename());
            assert!(!map.generation_required());
        }
    }
}
