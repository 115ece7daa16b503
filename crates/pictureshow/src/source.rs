//! Failure tolerant picture source
//!
//! Inputs are decoded one at a time, on demand. Inputs that cannot be read
//! are recorded and reported as [`PictureItem::Skipped`] instead of
//! stopping the batch.

use crate::backend::Backend;
use crate::types::*;
use std::path::PathBuf;

/// One pulled input
#[derive(Debug)]
pub enum PictureItem<P> {
    /// A decoded picture
    Picture(P),
    /// The input could not be read; it is recorded in the source's errors
    Skipped,
}

/// Cursor over input references that records read failures.
///
/// The source does not own the backend: every pull borrows it, so the
/// caller can keep drawing between pulls.
pub struct PictureSource<I> {
    inputs: I,
    errors: Vec<(PathBuf, ReadError)>,
}

impl<I> PictureSource<I>
where
    I: Iterator<Item = PathBuf>,
{
    pub fn new(inputs: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inputs: inputs.into_iter(),
            errors: Vec::new(),
        }
    }

    /// Read the next input.
    ///
    /// Returns `None` once all inputs are consumed. Recoverable read errors
    /// are recorded and yield [`PictureItem::Skipped`]; any other read error
    /// is returned as [`PictureShowError::Read`].
    pub fn pull<B: Backend>(&mut self, backend: &mut B) -> Option<Result<PictureItem<B::Picture>>> {
        let path = self.inputs.next()?;
        Some(match backend.read_picture(&path) {
            Ok(picture) => Ok(PictureItem::Picture(picture)),
            Err(err) if err.is_recoverable() => {
                log::debug!("Skipping '{}': {}", path.display(), err);
                self.errors.push((path, err));
                Ok(PictureItem::Skipped)
            }
            Err(source) => Err(PictureShowError::Read { path, source }),
        })
    }

    /// Failures recorded so far, in input order
    pub fn errors(&self) -> &[(PathBuf, ReadError)] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<(PathBuf, ReadError)> {
        self.errors
    }
}

/// Iterator adapter pairing a [`PictureSource`] with a backend.
pub struct ValidPictures<'a, B, I> {
    source: PictureSource<I>,
    backend: &'a mut B,
}

impl<B, I> ValidPictures<'_, B, I> {
    /// Stop iterating and hand back the recorded failures
    pub fn into_errors(self) -> Vec<(PathBuf, ReadError)> {
        self.source.errors
    }
}

impl<B, I> Iterator for ValidPictures<'_, B, I>
where
    B: Backend,
    I: Iterator<Item = PathBuf>,
{
    type Item = Result<PictureItem<B::Picture>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.pull(&mut *self.backend)
    }
}

/// Lazily decode `inputs` through `backend`, skipping unreadable ones.
pub fn iter_valid<B, P>(
    inputs: impl IntoIterator<Item = P>,
    backend: &mut B,
) -> ValidPictures<'_, B, std::vec::IntoIter<PathBuf>>
where
    B: Backend,
    P: Into<PathBuf>,
{
    let inputs: Vec<PathBuf> = inputs.into_iter().map(Into::into).collect();
    ValidPictures {
        source: PictureSource::new(inputs),
        backend,
    }
}
