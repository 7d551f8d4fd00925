//! Sprite sheet layout.
//!
//! Assigns every image an offset in the sheet and computes the sheet size.
//! Automatic placement walks the images in order along the layout's main
//! axis. Pixel positions from the options bypass that walk; percentage
//! positions keep their slot and are aligned on the cross axis once the
//! sheet bounds are known.

use serde::Serialize;

use crate::types::{Image, Layout, Position};

/// Where an image landed in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// True when both placements cover at least one common pixel.
    pub fn intersects(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Result of laying out a sequence of images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrangement {
    pub width: u32,
    pub height: u32,
    /// One placement per image, in image order.
    pub placements: Vec<Placement>,
}

impl Arrangement {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.name == name)
    }
}

/// Places images according to a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEngine {
    pub layout: Layout,
    pub spacing: u32,
}

impl LayoutEngine {
    pub fn new(layout: Layout, spacing: u32) -> Self {
        Self { layout, spacing }
    }

    pub fn arrange(&self, images: &[Image]) -> Arrangement {
        let mut cursor_x: u32 = 0;
        let mut cursor_y: u32 = 0;
        let mut placements = Vec::with_capacity(images.len());

        for image in images {
            let spacing = image.spacing.unwrap_or(self.spacing);
            let (w, h) = image.size();

            let (x, y) = match (image.position, self.layout) {
                (Some(Position::Pixels { x, y }), _) => (x, y),
                (_, Layout::Vertical) => {
                    let at = (0, cursor_y);
                    cursor_y = cursor_y.saturating_add(h).saturating_add(spacing);
                    at
                }
                (_, Layout::Horizontal) => {
                    let at = (cursor_x, 0);
                    cursor_x = cursor_x.saturating_add(w).saturating_add(spacing);
                    at
                }
                (_, Layout::Diagonal) => {
                    let at = (cursor_x, cursor_y);
                    cursor_x = cursor_x.saturating_add(w).saturating_add(spacing);
                    cursor_y = cursor_y.saturating_add(h).saturating_add(spacing);
                    at
                }
                (_, Layout::Custom) => (0, 0),
            };

            placements.push(Placement {
                name: image.name.clone(),
                x,
                y,
                width: w,
                height: h,
            });
        }

        let width = placements.iter().map(Placement::right).max().unwrap_or(0);
        let height = placements.iter().map(Placement::bottom).max().unwrap_or(0);

        // Percentages align within the bounds of the finished placement.
        for (placement, image) in placements.iter_mut().zip(images) {
            let Some(Position::Percent(pct)) = image.position else {
                continue;
            };
            match self.layout {
                Layout::Vertical => placement.x = align(width - placement.width, pct),
                Layout::Horizontal => placement.y = align(height - placement.height, pct),
                Layout::Diagonal | Layout::Custom => {}
            }
        }

        Arrangement {
            width,
            height,
            placements,
        }
    }
}

fn align(free: u32, pct: f64) -> u32 {
    let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    (f64::from(free) * pct / 100.0).round() as u32
}
