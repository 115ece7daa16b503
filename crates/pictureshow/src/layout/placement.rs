//! Picture placement within cells
//!
//! Computes where a picture is drawn inside its cell. Pictures are centered;
//! the scaling mode decides their size.

use super::{PictureBox, ScalingMode};

/// Calculate the box a picture occupies within a cell.
///
/// The returned box is relative to the cell's origin; add the cell position
/// to get page coordinates.
///
/// # Arguments
/// * `picture_size` - Intrinsic (width, height) of the picture
/// * `cell_size` - (width, height) of the target cell
/// * `mode` - How to scale the picture
pub fn fit(picture_size: (f32, f32), cell_size: (f32, f32), mode: ScalingMode) -> PictureBox {
    let (cell_width, cell_height) = cell_size;
    if mode == ScalingMode::FillCell {
        return PictureBox::new(0.0, 0.0, cell_width, cell_height);
    }

    let (mut width, mut height) = picture_size;
    if width <= 0.0 || height <= 0.0 {
        return PictureBox::new(cell_width / 2.0, cell_height / 2.0, 0.0, 0.0);
    }

    let oversized = width > cell_width || height > cell_height;
    if oversized || mode == ScalingMode::StretchSmall {
        // The limiting dimension is set exactly so rounding never pushes the
        // box past the cell edge.
        if width / height > cell_width / cell_height {
            height *= cell_width / width;
            width = cell_width;
        } else {
            width *= cell_height / height;
            height = cell_height;
        }
    }

    PictureBox::new(
        (cell_width - width) / 2.0,
        (cell_height - height) / 2.0,
        width,
        height,
    )
}
