//! Grid layout calculation
//!
//! Splits a page into `columns x rows` equally sized cells separated by a
//! uniform margin.

use crate::constants::MIN_CELL_SIZE;
use crate::types::{GridLayout, PageSize, PictureShowError, Result};

use super::Cell;

/// Size (width, height) of one cell, without validation.
pub fn cell_size(layout: GridLayout, page_size: PageSize, margin: f32) -> (f32, f32) {
    let columns = layout.columns as f32;
    let rows = layout.rows as f32;
    (
        (page_size.width - (columns + 1.0) * margin) / columns,
        (page_size.height - (rows + 1.0) * margin) / rows,
    )
}

/// Compute the cells of one page.
///
/// Cells are ordered row by row from the top of the page, left to right
/// within a row. The first cell starts at `(margin, page_height - margin -
/// cell_height)`.
///
/// Fails with [`PictureShowError::Margin`] when the margin is negative or so
/// large that a cell would be smaller than [`MIN_CELL_SIZE`].
pub fn compute_cells(layout: GridLayout, page_size: PageSize, margin: f32) -> Result<Vec<Cell>> {
    if !margin.is_finite() || margin < 0.0 {
        return Err(PictureShowError::Margin(format!(
            "margin must be a non-negative number, got {margin}"
        )));
    }

    let (cell_width, cell_height) = cell_size(layout, page_size, margin);
    if !(cell_width >= MIN_CELL_SIZE && cell_height >= MIN_CELL_SIZE) {
        return Err(PictureShowError::Margin(format!(
            "margin value too high: {margin}"
        )));
    }

    let step_x = cell_width + margin;
    let step_y = cell_height + margin;
    let top = page_size.height - margin - cell_height;

    Ok((0..layout.rows)
        .flat_map(|row| {
            (0..layout.columns).map(move |col| {
                Cell::new(
                    margin + col as f32 * step_x,
                    top - row as f32 * step_y,
                    cell_width,
                    cell_height,
                )
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_single_cell() {
        let cells = compute_cells(GridLayout::new(1, 1), A4, 72.0).unwrap();
        assert_eq!(cells.len(), 1);
        assert!(approx(cells[0].x, 72.0));
        assert!(approx(cells[0].y, 72.0));
        assert!(approx(cells[0].width, A4.width - 144.0));
        assert!(approx(cells[0].height, A4.height - 144.0));
    }

    #[test]
    fn test_single_column() {
        let cells = compute_cells(GridLayout::new(1, 3), A4, 72.0).unwrap();
        let expected_height = (A4.height - 4.0 * 72.0) / 3.0;

        assert_eq!(cells.len(), 3);
        for (i, cell) in cells.iter().enumerate() {
            assert!(approx(cell.x, 72.0));
            assert!(approx(cell.height, expected_height));
            let row = (i + 1) as f32;
            assert!(approx(cell.y, A4.height - row * (expected_height + 72.0)));
        }
        // Bottom-most cell sits on the margin
        assert!(approx(cells[2].y, 72.0));
    }

    #[test]
    fn test_single_row() {
        let cells = compute_cells(GridLayout::new(3, 1), A4, 72.0).unwrap();
        let expected_width = (A4.width - 4.0 * 72.0) / 3.0;

        assert_eq!(cells.len(), 3);
        for (i, cell) in cells.iter().enumerate() {
            assert!(approx(cell.x, 72.0 + i as f32 * (expected_width + 72.0)));
            assert!(approx(cell.y, 72.0));
            assert!(approx(cell.width, expected_width));
        }
    }

    #[test]
    fn test_row_major_order() {
        let cells = compute_cells(GridLayout::new(2, 2), A4, 0.0).unwrap();
        let (w, h) = (A4.width / 2.0, A4.height / 2.0);

        // top-left, top-right, bottom-left, bottom-right
        let expected = [(0.0, h), (w, h), (0.0, 0.0), (w, 0.0)];
        for (cell, (x, y)) in cells.iter().zip(expected) {
            assert!(approx(cell.x, x) && approx(cell.y, y), "{cell:?}");
        }
    }

    #[test]
    fn test_margin_too_high() {
        let half = A4.width / 2.0;
        let err = compute_cells(GridLayout::new(1, 1), A4, half).unwrap_err();
        assert!(matches!(err, PictureShowError::Margin(_)));
        assert!(err.to_string().starts_with("margin value too high"));

        assert!(compute_cells(GridLayout::new(1, 1), A4, half + 10.0).is_err());
        assert!(compute_cells(GridLayout::new(1, 1), A4, half - 1.0).is_ok());
    }

    #[test]
    fn test_negative_margin() {
        assert!(matches!(
            compute_cells(GridLayout::new(1, 1), A4, -1.0),
            Err(PictureShowError::Margin(_))
        ));
        assert!(compute_cells(GridLayout::new(1, 1), A4, f32::NAN).is_err());
    }
}
