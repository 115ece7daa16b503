//! Layout data types
//!
//! Plain value records passed between the grid calculator, the fitter and
//! the pagination engine.

/// A rectangular area in points (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Move by an offset, keeping the size
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// One slot of the page grid, in page coordinates
pub type Cell = Rect;

/// Where a picture is drawn, relative to its cell's origin
pub type PictureBox = Rect;

/// How a picture is sized within its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Shrink pictures larger than the cell, keep smaller ones at native size
    #[default]
    Fit,
    /// Scale every picture to the largest size that fits, preserving aspect ratio
    StretchSmall,
    /// Cover the whole cell, ignoring aspect ratio
    FillCell,
}

impl ScalingMode {
    /// Combine the two user flags; `fill_cell` wins over `stretch_small`.
    pub fn from_flags(stretch_small: bool, fill_cell: bool) -> Self {
        if fill_cell {
            ScalingMode::FillCell
        } else if stretch_small {
            ScalingMode::StretchSmall
        } else {
            ScalingMode::Fit
        }
    }
}
