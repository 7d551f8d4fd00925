//! Rendering module for sprite maps.
//!
//! This module lays images out on a sheet, composites them into a single
//! PNG and records where each image landed.

mod layout;
mod png;
mod sheet;

pub use layout::{Arrangement, LayoutEngine, Placement};
pub use png::{composite, write_png};
pub use sheet::{positions_json, write_positions_json};
