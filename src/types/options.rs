//! Sprite map generation options.
//!
//! Options arrive as a flat key/value map (from `sprites.yaml` or from the
//! caller building a map). `SpriteOptions` wraps that map and exposes the
//! keys the loader, layout engine and cache controller understand.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteError};

use super::image::Position;
use super::state::State;

/// Map-wide option keys that can change the rendered sheet.
///
/// Per-image keys are left out; their resolved values are carried by each
/// image.
const RENDERING_KEYS: &[&str] = &["layout", "spacing", "separator", "seperator"];

/// Packing strategy for a sprite map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Vertical,
    Horizontal,
    Diagonal,
    /// Images are placed only by explicit pixel positions.
    Custom,
}

impl Layout {
    /// The keyword used in options and in the uniqueness hash.
    pub fn keyword(&self) -> &'static str {
        match self {
            Layout::Vertical => "vertical",
            Layout::Horizontal => "horizontal",
            Layout::Diagonal => "diagonal",
            Layout::Custom => "custom",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Layout {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Layout::Vertical),
            "horizontal" => Ok(Layout::Horizontal),
            "diagonal" => Ok(Layout::Diagonal),
            "custom" | "custom-positions" => Ok(Layout::Custom),
            other => Err(SpriteError::Config {
                message: format!("Unknown layout '{}'", other),
                help: Some("Expected one of: vertical, horizontal, diagonal, custom".to_string()),
            }),
        }
    }
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOption", into = "RawOption")]
pub enum OptionValue {
    Bool(bool),
    Number(u32),
    Text(String),
    /// A percentage such as `50%`.
    Percent(f64),
    /// A pixel pair such as `10px 20px`.
    Pixels { x: u32, y: u32 },
}

impl OptionValue {
    /// Parse a textual value, recognizing percentages and pixel pairs.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Some(number) = trimmed.strip_suffix('%') {
            if let Ok(pct) = number.trim().parse::<f64>() {
                if pct.is_finite() {
                    return OptionValue::Percent(pct);
                }
            }
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        match parts.as_slice() {
            [single] => {
                if let Some(n) = parse_pixels(single) {
                    return OptionValue::Number(n);
                }
            }
            [x, y] => {
                if let (Some(x), Some(y)) = (parse_pixels(x), parse_pixels(y)) {
                    return OptionValue::Pixels { x, y };
                }
            }
            _ => {}
        }

        OptionValue::Text(text.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Text(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<Position> {
        match self {
            OptionValue::Percent(pct) => Some(Position::Percent(*pct)),
            OptionValue::Pixels { x, y } => Some(Position::Pixels { x: *x, y: *y }),
            _ => None,
        }
    }
}

fn parse_pixels(token: &str) -> Option<u32> {
    token.strip_suffix("px").unwrap_or(token).parse().ok()
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Percent(pct) => write!(f, "{}%", pct),
            OptionValue::Pixels { x, y } => write!(f, "{}px {}px", x, y),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::parse(value)
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::parse(&value)
    }
}

impl From<Position> for OptionValue {
    fn from(value: Position) -> Self {
        match value {
            Position::Pixels { x, y } => OptionValue::Pixels { x, y },
            Position::Percent(pct) => OptionValue::Percent(pct),
        }
    }
}

/// YAML scalar form of an option value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl TryFrom<RawOption> for OptionValue {
    type Error = String;

    fn try_from(raw: RawOption) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawOption::Bool(b) => Ok(OptionValue::Bool(b)),
            RawOption::Number(n) => u32::try_from(n)
                .map(OptionValue::Number)
                .map_err(|_| format!("option value {} is too large", n)),
            RawOption::Text(s) => Ok(OptionValue::parse(&s)),
        }
    }
}

impl From<OptionValue> for RawOption {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Bool(b) => RawOption::Bool(b),
            OptionValue::Number(n) => RawOption::Number(n.into()),
            other => RawOption::Text(other.to_string()),
        }
    }
}

/// Options recognized while building and generating a sprite map.
///
/// Keys are kept sorted so iteration order is canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteOptions {
    values: BTreeMap<String, OptionValue>,
}

impl SpriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return a copy of these options with `overrides` applied on top.
    pub fn merged(&self, overrides: &SpriteOptions) -> SpriteOptions {
        let mut values = self.values.clone();
        values.extend(overrides.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        SpriteOptions { values }
    }

    /// The packing strategy; vertical when unset.
    pub fn layout(&self) -> Result<Layout> {
        match self.get("layout") {
            None => Ok(Layout::default()),
            Some(OptionValue::Text(s)) => s.parse(),
            Some(other) => Err(SpriteError::Config {
                message: format!("layout must be a keyword, got '{}'", other),
                help: None,
            }),
        }
    }

    /// Spacing between adjacent images, 0 when unset.
    pub fn spacing(&self) -> Result<u32> {
        match self.get("spacing") {
            None => Ok(0),
            Some(OptionValue::Number(n)) => Ok(*n),
            Some(other) => Err(SpriteError::Config {
                message: format!("spacing must be a whole number of pixels, got '{}'", other),
                help: Some("Use a value such as 4 or \"4px\"".to_string()),
            }),
        }
    }

    /// Separator between a base image name and its state keyword.
    ///
    /// Accepts both `separator` and the historical `seperator` spelling;
    /// `separator` wins when both hold text.
    pub fn separator(&self) -> &str {
        ["separator", "seperator"]
            .into_iter()
            .find_map(|key| self.get(key).and_then(OptionValue::as_text))
            .unwrap_or("_")
    }

    /// Whether stale sheets are removed after generation; on by default.
    pub fn cleanup(&self) -> bool {
        self.get("cleanup")
            .and_then(OptionValue::as_bool)
            .unwrap_or(true)
    }

    /// Whether a state keyword is materialized; on by default.
    pub fn state_enabled(&self, state: State) -> bool {
        self.get(&format!("{}_state", state.keyword()))
            .and_then(OptionValue::as_bool)
            .unwrap_or(true)
    }

    /// Explicit position requested for an image of the named map.
    pub fn image_position(&self, map: &str, image: &str) -> Option<Position> {
        self.get(&image_key(map, image, "position"))
            .and_then(OptionValue::as_position)
    }

    /// Spacing override for an image of the named map.
    pub fn image_spacing(&self, map: &str, image: &str) -> Option<u32> {
        self.get(&image_key(map, image, "spacing"))
            .and_then(OptionValue::as_number)
    }

    /// Whether the option is a map-wide key that can change the rendered output.
    pub fn affects_output(key: &str) -> bool {
        RENDERING_KEYS.contains(&key)
    }
}

/// Per-image option key: `<map>_<image>_<attribute>` with dashes folded to underscores.
pub fn image_key(map: &str, image: &str, attribute: &str) -> String {
    format!(
        "{}_{}_{}",
        map.replace('-', "_"),
        image.replace('-', "_"),
        attribute
    )
}
