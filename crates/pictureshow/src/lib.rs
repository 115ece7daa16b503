pub mod backend;
pub mod constants;
pub mod layout;
mod options;
pub mod show;
pub mod source;
mod types;
mod validate;

pub use backend::{Backend, PdfBackend, PdfPicture};
pub use layout::{Cell, PictureBox, Rect, ScalingMode, cell_size, compute_cells, fit};
pub use options::*;
pub use show::{Pagination, PictureShow, Step, pictures_to_pdf};
pub use source::{PictureItem, PictureSource, ValidPictures, iter_valid};
pub use types::*;
pub use validate::*;
