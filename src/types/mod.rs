//! Core domain types for sprite maps.
//!
//! - `Image` - a source image with its metadata and requested position
//! - `SpriteOptions` - the option map recognized by the pipeline
//! - `State` - interaction states composed from sibling images

mod image;
mod options;
mod state;

pub use image::{Image, Position};
pub use options::{image_key, Layout, OptionValue, SpriteOptions};
pub use state::{compose_states, variant_name, State, StateSet};
