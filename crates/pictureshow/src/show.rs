//! Pagination of a picture sequence into grids of cells
//!
//! [`Pagination`] is a small state machine driven by [`Pagination::step`].
//! Each step pulls one input: a picture is placed into the next free cell,
//! an unreadable input is recorded and skipped, and exhaustion saves the
//! document. Callers that want to cancel simply stop stepping.

use crate::backend::{Backend, PdfBackend};
use crate::layout::fit;
use crate::options::{SaveOptions, ValidatedOptions};
use crate::source::{PictureItem, PictureSource};
use crate::types::*;
use std::path::{Path, PathBuf};

/// A set of pictures to be saved as one document
#[derive(Debug, Clone, Default)]
pub struct PictureShow {
    pictures: Vec<PathBuf>,
}

impl PictureShow {
    pub fn new<P: Into<PathBuf>>(pictures: impl IntoIterator<Item = P>) -> Self {
        Self {
            pictures: pictures.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pictures(&self) -> &[PathBuf] {
        &self.pictures
    }

    /// Save the pictures to a PDF file.
    pub fn save_pdf(&self, output: impl AsRef<Path>, options: &SaveOptions) -> Result<BatchResult> {
        self.save_with(PdfBackend::new(), output, options)
    }

    /// Save the pictures through any backend.
    pub fn save_with<B: Backend>(
        &self,
        backend: B,
        output: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<BatchResult> {
        self.paginate(backend, output, options)?.run()
    }

    /// Validate `options` and prepare `backend` for a stepwise run.
    ///
    /// Nothing is written by the backend before every option is valid.
    pub fn paginate<B: Backend>(
        &self,
        mut backend: B,
        output: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<Pagination<B>> {
        let options = options.validate(output)?;
        backend.init(&options.output, options.page_size, options.bg_color)?;

        log::info!(
            "Saving {} picture(s) to '{}', layout {}, page size {}x{}",
            self.pictures.len(),
            options.output.display(),
            options.layout,
            options.page_size.width,
            options.page_size.height,
        );

        Ok(Pagination {
            backend,
            source: PictureSource::new(self.pictures.clone()),
            options,
            state: PageState::FillingPage { next_cell: 0 },
            page: 1,
            num_ok: 0,
            num_pages: 0,
        })
    }
}

/// Save `pictures` to a PDF file on the blocking thread pool.
pub async fn pictures_to_pdf(
    pictures: Vec<PathBuf>,
    output: PathBuf,
    options: SaveOptions,
) -> Result<BatchResult> {
    tokio::task::spawn_blocking(move || PictureShow::new(pictures).save_pdf(&output, &options))
        .await?
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    /// The current page has free cells, starting at `next_cell`
    FillingPage { next_cell: usize },
    /// Every cell of the current page is taken
    PageFull,
    Done,
}

/// Outcome of one [`Pagination::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A picture was drawn into `cell` (0-based, row-major) of `page` (1-based)
    Placed { page: usize, cell: usize },
    /// An input could not be read and was recorded
    Skipped,
    /// All inputs are consumed and the result is final
    Done,
}

/// One run of the pagination engine.
pub struct Pagination<B: Backend> {
    backend: B,
    source: PictureSource<std::vec::IntoIter<PathBuf>>,
    options: ValidatedOptions,
    state: PageState,
    page: usize,
    num_ok: usize,
    num_pages: usize,
}

impl<B: Backend> Pagination<B> {
    /// Process one input.
    ///
    /// Errors other than unreadable inputs end the run: the document is not
    /// saved and later steps return [`Step::Done`].
    pub fn step(&mut self) -> Result<Step> {
        if self.state == PageState::Done {
            return Ok(Step::Done);
        }
        let result = self.advance();
        if result.is_err() {
            self.state = PageState::Done;
        }
        result
    }

    /// Step until all inputs are consumed.
    pub fn run(mut self) -> Result<BatchResult> {
        while self.step()? != Step::Done {}
        Ok(self.into_result())
    }

    fn advance(&mut self) -> Result<Step> {
        let picture = match self.source.pull(&mut self.backend) {
            None => {
                self.finish()?;
                return Ok(Step::Done);
            }
            Some(item) => match item? {
                PictureItem::Picture(picture) => picture,
                PictureItem::Skipped => return Ok(Step::Skipped),
            },
        };

        let cell_index = match self.state {
            PageState::FillingPage { next_cell } => next_cell,
            PageState::PageFull => {
                self.backend.add_page()?;
                self.page += 1;
                log::debug!("Started page {}", self.page);
                0
            }
            PageState::Done => return Ok(Step::Done),
        };

        let cell = self.options.cells[cell_index];
        let picture_size = self.backend.picture_size(&picture);
        let placed = fit(picture_size, cell.size(), self.options.scaling).translate(cell.x, cell.y);
        self.backend
            .add_picture(picture, placed.origin(), placed.size())?;
        self.num_ok += 1;

        log::debug!(
            "Placed picture {} on page {}, cell {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            self.num_ok,
            self.page,
            cell_index,
            placed.x,
            placed.y,
            placed.width,
            placed.height,
        );

        self.state = if cell_index + 1 < self.options.cells.len() {
            PageState::FillingPage {
                next_cell: cell_index + 1,
            }
        } else {
            PageState::PageFull
        };

        Ok(Step::Placed {
            page: self.page,
            cell: cell_index,
        })
    }

    fn finish(&mut self) -> Result<()> {
        self.state = PageState::Done;
        if self.num_ok > 0 {
            self.num_pages = self.backend.save()?;
        } else {
            log::info!("No pictures placed, '{}' not written", self.options.output.display());
        }
        log::info!(
            "Done: {} picture(s) on {} page(s), {} skipped",
            self.num_ok,
            self.num_pages,
            self.source.errors().len(),
        );
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.state == PageState::Done
    }

    /// Pictures placed so far
    pub fn num_ok(&self) -> usize {
        self.num_ok
    }

    /// Inputs skipped so far
    pub fn errors(&self) -> &[(PathBuf, ReadError)] {
        self.source.errors()
    }

    pub fn options(&self) -> &ValidatedOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Tally of the run.
    ///
    /// A run stopped before [`Step::Done`] was never saved, so its
    /// `num_pages` is 0.
    pub fn into_result(self) -> BatchResult {
        BatchResult {
            num_ok: self.num_ok,
            errors: self.source.into_errors(),
            num_pages: self.num_pages,
        }
    }
}
