use crate::constants::DEFAULT_MARGIN;
use crate::layout::{Cell, ScalingMode, compute_cells};
use crate::types::*;
use crate::validate::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for saving pictures to a document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SaveOptions {
    // Output file
    pub force_overwrite: bool,

    // Page properties
    pub page_size: PageSizeSpec,
    pub landscape: bool,
    /// Background color as 6-digit hex RGB, e.g. `ff8c00`
    pub bg_color: Option<String>,

    // Picture layout
    pub layout: LayoutSpec,
    /// Empty space around and between cells, in points
    pub margin: f32,
    pub stretch_small: bool,
    pub fill_cell: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            force_overwrite: false,
            page_size: PageSizeSpec::default(),
            landscape: false,
            bg_color: None,
            layout: LayoutSpec::default(),
            margin: DEFAULT_MARGIN,
            stretch_small: false,
            fill_cell: false,
        }
    }
}

/// Options after validation, ready for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    pub output: PathBuf,
    pub page_size: PageSize,
    pub layout: GridLayout,
    pub margin: f32,
    pub bg_color: Option<Rgb>,
    pub scaling: ScalingMode,
    /// Cells of one page, shared by every page
    pub cells: Vec<Cell>,
}

impl SaveOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PictureShowError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PictureShowError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options for writing to `output`.
    ///
    /// Checks run in this order: target path, page size, layout, margin,
    /// background color. The first failure is returned.
    pub fn validate(&self, output: impl AsRef<Path>) -> Result<ValidatedOptions> {
        let output = validate_target_path(output, self.force_overwrite)?;
        let page_size = validate_page_size(self.page_size.clone(), self.landscape)?;
        let layout = validate_layout(self.layout.clone())?;
        let cells = compute_cells(layout, page_size, self.margin)?;
        let bg_color = validate_color(self.bg_color.as_deref())?;

        Ok(ValidatedOptions {
            output,
            page_size,
            layout,
            margin: self.margin,
            bg_color,
            scaling: ScalingMode::from_flags(self.stretch_small, self.fill_cell),
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let dir = tempfile::tempdir().unwrap();
        let validated = SaveOptions::default()
            .validate(dir.path().join("out.pdf"))
            .unwrap();

        assert_eq!(validated.layout, GridLayout::new(1, 1));
        assert_eq!(validated.cells.len(), 1);
        assert_eq!(validated.margin, 72.0);
        assert_eq!(validated.bg_color, None);
        assert_eq!(validated.scaling, ScalingMode::Fit);
        assert!(!validated.page_size.is_landscape());
    }

    #[test]
    fn test_target_checked_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exists.pdf");
        std::fs::write(&path, b"x").unwrap();

        let options = SaveOptions {
            page_size: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(&path),
            Err(PictureShowError::FileExists(_))
        ));
    }

    #[test]
    fn test_layout_checked_before_margin() {
        let dir = tempfile::tempdir().unwrap();
        let options = SaveOptions {
            layout: "0x1".into(),
            margin: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(dir.path().join("out.pdf")),
            Err(PictureShowError::Layout(_))
        ));
    }

    #[test]
    fn test_cells_follow_layout() {
        let dir = tempfile::tempdir().unwrap();
        let options = SaveOptions {
            layout: (3, 2).into(),
            margin: 10.0,
            landscape: true,
            bg_color: Some("102030".to_string()),
            fill_cell: true,
            ..Default::default()
        };
        let validated = options.validate(dir.path().join("out.pdf")).unwrap();

        assert_eq!(validated.cells.len(), 6);
        assert!(validated.page_size.is_landscape());
        assert_eq!(validated.bg_color, Some(Rgb::new(0x10, 0x20, 0x30)));
        assert_eq!(validated.scaling, ScalingMode::FillCell);
    }
}
