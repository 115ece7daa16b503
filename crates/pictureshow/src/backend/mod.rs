//! Rendering backends
//!
//! The pagination engine only talks to a [`Backend`]; the PDF writer is one
//! implementation and tests substitute their own.

mod pdf;
mod xobject;

pub use pdf::{PdfBackend, PdfPicture};
pub use xobject::{create_image_xobject, create_jpeg_xobject};

use crate::types::{PageSize, ReadError, Result, Rgb};
use std::path::Path;

/// Output renderer driven by the pagination engine.
///
/// Call order within one run: `init`, then any number of `read_picture`,
/// `picture_size`, `add_picture` and `add_page`, then at most one `save`.
pub trait Backend {
    /// Decoded picture, ready to be drawn
    type Picture;

    /// Prepare a new output document; resets the page counter to 0.
    fn init(&mut self, output: &Path, page_size: PageSize, bg_color: Option<Rgb>) -> Result<()>;

    /// Finish the current page and start a new blank one.
    fn add_page(&mut self) -> Result<()>;

    /// Open and decode one input.
    ///
    /// Return a recoverable [`ReadError`] for inputs that are missing, are
    /// directories or are not pictures; the batch skips those and continues.
    fn read_picture(&mut self, picture: &Path) -> std::result::Result<Self::Picture, ReadError>;

    /// Intrinsic (width, height) of a decoded picture.
    fn picture_size(&self, picture: &Self::Picture) -> (f32, f32);

    /// Draw a picture at an absolute page position with the given size.
    ///
    /// The background color, if any, is painted before the first picture of
    /// each page.
    fn add_picture(
        &mut self,
        picture: Self::Picture,
        position: (f32, f32),
        size: (f32, f32),
    ) -> Result<()>;

    /// Write the document and return the number of pages that received content.
    fn save(&mut self) -> Result<usize>;
}
