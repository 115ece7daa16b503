//! Shared constants for picture layout
//!
//! Units, defaults and the registry of named page sizes.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = POINTS_PER_INCH / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub const fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert inches to points
#[inline]
pub const fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Defaults
// =============================================================================

/// Default page size name
pub const DEFAULT_PAGE_SIZE: &str = "A4";

/// Default grid layout, as accepted on the command line
pub const DEFAULT_LAYOUT: &str = "1x1";

/// Default margin around and between cells (points, 1 inch)
pub const DEFAULT_MARGIN: f32 = 72.0;

/// Cells narrower or lower than this (points) are rejected
pub const MIN_CELL_SIZE: f32 = 1.0;

// =============================================================================
// Page Sizes
// =============================================================================

const fn mm(width: f32, height: f32) -> (f32, f32) {
    (mm_to_pt(width), mm_to_pt(height))
}

const fn inch(width: f32, height: f32) -> (f32, f32) {
    (in_to_pt(width), in_to_pt(height))
}

/// Named page sizes in points, portrait first (except LEDGER).
///
/// Lookup is case-insensitive; names are stored upper-case.
pub const PAGE_SIZES: &[(&str, (f32, f32))] = &[
    ("A0", mm(841.0, 1189.0)),
    ("A1", mm(594.0, 841.0)),
    ("A2", mm(420.0, 594.0)),
    ("A3", mm(297.0, 420.0)),
    ("A4", mm(210.0, 297.0)),
    ("A5", mm(148.0, 210.0)),
    ("A6", mm(105.0, 148.0)),
    ("A7", mm(74.0, 105.0)),
    ("A8", mm(52.0, 74.0)),
    ("A9", mm(37.0, 52.0)),
    ("A10", mm(26.0, 37.0)),
    ("B0", mm(1000.0, 1414.0)),
    ("B1", mm(707.0, 1000.0)),
    ("B2", mm(500.0, 707.0)),
    ("B3", mm(353.0, 500.0)),
    ("B4", mm(250.0, 353.0)),
    ("B5", mm(176.0, 250.0)),
    ("B6", mm(125.0, 176.0)),
    ("B7", mm(88.0, 125.0)),
    ("B8", mm(62.0, 88.0)),
    ("B9", mm(44.0, 62.0)),
    ("B10", mm(31.0, 44.0)),
    ("C0", mm(917.0, 1297.0)),
    ("C1", mm(648.0, 917.0)),
    ("C2", mm(458.0, 648.0)),
    ("C3", mm(324.0, 458.0)),
    ("C4", mm(229.0, 324.0)),
    ("C5", mm(162.0, 229.0)),
    ("C6", mm(114.0, 162.0)),
    ("C7", mm(81.0, 114.0)),
    ("C8", mm(57.0, 81.0)),
    ("C9", mm(40.0, 57.0)),
    ("C10", mm(28.0, 40.0)),
    ("LETTER", inch(8.5, 11.0)),
    ("LEGAL", inch(8.5, 14.0)),
    ("ELEVENSEVENTEEN", inch(11.0, 17.0)),
    ("JUNIOR_LEGAL", inch(5.0, 8.0)),
    ("HALF_LETTER", inch(5.5, 8.5)),
    ("GOV_LETTER", inch(8.0, 10.5)),
    ("GOV_LEGAL", inch(8.5, 13.0)),
    ("TABLOID", inch(11.0, 17.0)),
    ("LEDGER", inch(17.0, 11.0)),
];

/// Comma separated list of page size names, for error messages and help text
pub fn page_size_names() -> String {
    PAGE_SIZES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
