//! Validation of user supplied geometry and output options
//!
//! Every check here runs before the backend is touched, so a rejected
//! option never leaves a partially written output file behind.

use crate::constants::{PAGE_SIZES, page_size_names};
use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page size as given by the caller: a preset name or explicit dimensions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum PageSizeSpec {
    Named(String),
    Dimensions(f32, f32),
}

impl Default for PageSizeSpec {
    fn default() -> Self {
        PageSizeSpec::Named(crate::constants::DEFAULT_PAGE_SIZE.to_string())
    }
}

impl From<&str> for PageSizeSpec {
    fn from(name: &str) -> Self {
        PageSizeSpec::Named(name.to_string())
    }
}

impl From<String> for PageSizeSpec {
    fn from(name: String) -> Self {
        PageSizeSpec::Named(name)
    }
}

impl From<(f32, f32)> for PageSizeSpec {
    fn from((width, height): (f32, f32)) -> Self {
        PageSizeSpec::Dimensions(width, height)
    }
}

impl From<PageSize> for PageSizeSpec {
    fn from(size: PageSize) -> Self {
        PageSizeSpec::Dimensions(size.width, size.height)
    }
}

/// Grid layout as given by the caller: `"2x3"`, `"2,3"` or a pair of integers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum LayoutSpec {
    Text(String),
    Grid(i64, i64),
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec::Text(crate::constants::DEFAULT_LAYOUT.to_string())
    }
}

impl From<&str> for LayoutSpec {
    fn from(text: &str) -> Self {
        LayoutSpec::Text(text.to_string())
    }
}

impl From<String> for LayoutSpec {
    fn from(text: String) -> Self {
        LayoutSpec::Text(text)
    }
}

impl From<(i64, i64)> for LayoutSpec {
    fn from((columns, rows): (i64, i64)) -> Self {
        LayoutSpec::Grid(columns, rows)
    }
}

impl From<GridLayout> for LayoutSpec {
    fn from(layout: GridLayout) -> Self {
        LayoutSpec::Grid(i64::from(layout.columns), i64::from(layout.rows))
    }
}

impl fmt::Display for LayoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutSpec::Text(text) => write!(f, "{text:?}"),
            LayoutSpec::Grid(columns, rows) => write!(f, "({columns}, {rows})"),
        }
    }
}

/// Fail if `path` exists and overwriting was not requested.
pub fn validate_target_path(path: impl AsRef<Path>, force_overwrite: bool) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.exists() && !force_overwrite {
        return Err(PictureShowError::FileExists(path.to_owned()));
    }
    Ok(path.to_owned())
}

/// Resolve a page size, applying landscape orientation.
///
/// Names are looked up case-insensitively in [`PAGE_SIZES`]. Landscape only
/// swaps portrait sizes; a size that is already landscape is returned as is,
/// so validating an already validated size is a no-op.
pub fn validate_page_size(page_size: impl Into<PageSizeSpec>, landscape: bool) -> Result<PageSize> {
    let (width, height) = match page_size.into() {
        PageSizeSpec::Named(name) => lookup_page_size(&name)?,
        PageSizeSpec::Dimensions(width, height) => (width, height),
    };

    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !positive(width) || !positive(height) {
        return Err(PictureShowError::PageSize(
            "two positive numbers expected".to_string(),
        ));
    }

    let size = PageSize::new(width, height);
    Ok(if landscape { size.landscape() } else { size })
}

fn lookup_page_size(name: &str) -> Result<(f32, f32)> {
    let key = name.to_ascii_uppercase();
    PAGE_SIZES
        .iter()
        .find(|(preset, _)| *preset == key)
        .map(|(_, size)| *size)
        .ok_or_else(|| {
            PictureShowError::PageSize(format!(
                "unknown page size '{name}', please use one of: {}",
                page_size_names()
            ))
        })
}

/// Parse and check a grid layout.
///
/// Strings are split on `x` or `,` (either case, surrounding whitespace
/// ignored). Exactly two integers, both at least 1, are required.
pub fn validate_layout(layout: impl Into<LayoutSpec>) -> Result<GridLayout> {
    let layout = layout.into();
    let error = || PictureShowError::Layout(layout.to_string());

    let (columns, rows) = match &layout {
        LayoutSpec::Grid(columns, rows) => (*columns, *rows),
        LayoutSpec::Text(text) => {
            let values = text
                .split(['x', 'X', ','])
                .map(|part| part.trim().parse::<i64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| error())?;
            match values.as_slice() {
                [columns, rows] => (*columns, *rows),
                _ => return Err(error()),
            }
        }
    };

    match (u32::try_from(columns), u32::try_from(rows)) {
        (Ok(columns), Ok(rows)) if columns >= 1 && rows >= 1 => Ok(GridLayout::new(columns, rows)),
        _ => Err(error()),
    }
}

/// Parse an optional `rrggbb` background color.
pub fn validate_color(color: Option<&str>) -> Result<Option<Rgb>> {
    color.map(parse_hex_color).transpose()
}

pub(crate) fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let error = || PictureShowError::RgbColor(hex.to_string());
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(error());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| error());
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}
