use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PictureShowError {
    #[error("{0}")]
    PageSize(String),
    #[error("expected two positive integers, got {0}")]
    Layout(String),
    #[error("{0}")]
    Margin(String),
    #[error("6-digit hex value expected, got {0:?}")]
    RgbColor(String),
    #[error("file '{}' exists", .0.display())]
    FileExists(PathBuf),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("cannot read picture '{}': {source}", path.display())]
    Read { path: PathBuf, source: ReadError },
}

impl PictureShowError {
    /// Short name of the error class, used when reporting to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            PictureShowError::PageSize(_) => "PageSizeError",
            PictureShowError::Layout(_) => "LayoutError",
            PictureShowError::Margin(_) => "MarginError",
            PictureShowError::RgbColor(_) => "RGBColorError",
            PictureShowError::FileExists(_) => "FileExistsError",
            PictureShowError::Pdf(_) => "PdfError",
            PictureShowError::Io(_) => "IoError",
            PictureShowError::Config(_) => "ConfigError",
            PictureShowError::TaskJoin(_) => "TaskJoinError",
            PictureShowError::Read { .. } => "ReadError",
        }
    }

    /// True for errors raised while checking options, before any output is produced.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PictureShowError::PageSize(_)
                | PictureShowError::Layout(_)
                | PictureShowError::Margin(_)
                | PictureShowError::RgbColor(_)
                | PictureShowError::FileExists(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PictureShowError>;

/// Failure to open or decode a single input picture.
///
/// Only the recoverable kinds end up in [`BatchResult::errors`]; the rest
/// abort the batch as [`PictureShowError::Read`].
#[derive(Error, Debug)]
pub enum ReadError {
    /// The file was read but is not a picture in a supported format
    #[error("{0}")]
    Unidentified(String),
    /// Missing file, directory, permission problem
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Anything else the decoder reports (limits exceeded, bad parameters)
    #[error("{0}")]
    Other(String),
}

impl ReadError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReadError::Unidentified(_) | ReadError::Io(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReadError::Unidentified(_) => "UnreadablePicture",
            ReadError::Io(_) => "IoError",
            ReadError::Other(_) => "ReadError",
        }
    }
}

impl From<image::ImageError> for ReadError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(err) => ReadError::Io(err),
            err @ (image::ImageError::Decoding(_) | image::ImageError::Unsupported(_)) => {
                ReadError::Unidentified(err.to_string())
            }
            other => ReadError::Other(other.to_string()),
        }
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }

    /// Swap to landscape, leaving pages that are already landscape untouched
    pub fn landscape(self) -> Self {
        if self.width < self.height {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

impl From<(f32, f32)> for PageSize {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

/// Grid of cells on each page (columns x rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
}

impl GridLayout {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of pictures that fit on one page
    pub fn cell_count(self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl FromStr for GridLayout {
    type Err = PictureShowError;

    fn from_str(s: &str) -> Result<Self> {
        crate::validate::validate_layout(s)
    }
}

/// Page background color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to the 0.0..=1.0 range used by PDF color operators
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

impl FromStr for Rgb {
    type Err = PictureShowError;

    fn from_str(s: &str) -> Result<Self> {
        crate::validate::parse_hex_color(s)
    }
}

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of pictures placed on pages
    pub num_ok: usize,
    /// Inputs skipped because they could not be read, in input order
    pub errors: Vec<(PathBuf, ReadError)>,
    /// Number of pages of the saved document (0 when nothing was saved)
    pub num_pages: usize,
}

impl BatchResult {
    /// Skipped inputs with duplicates removed, keeping the first occurrence
    pub fn unique_errors(&self) -> Vec<(&Path, &ReadError)> {
        let mut seen = std::collections::HashSet::new();
        self.errors
            .iter()
            .filter(|(path, _)| seen.insert(path.as_path()))
            .map(|(path, err)| (path.as_path(), err))
            .collect()
    }

    /// Total number of inputs consumed
    pub fn num_inputs(&self) -> usize {
        self.num_ok + self.errors.len()
    }
}
