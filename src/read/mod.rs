//! Archive reading API.
//!
//! An [`Archive`] is a handle over an archive opened through the codec
//! library. It is created empty, opened exactly once, and then supports:
//!
//! - [`info`](Archive::info): archive-level properties
//! - [`count`](Archive::count): number of items
//! - [`list`](Archive::list): filtered listing, optionally with properties
//! - [`extract`](Archive::extract): one item into a file or handle
//!
//! Closing (or dropping) the handle releases the codec archive and the input
//! stream it owns.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcbridge::{Destination, ExtractOptions, Library, ListOptions, OpenOptions};
//!
//! let mut library = Library::default();
//! let mut archive = library.open_path("bundle.zip", &OpenOptions::default())?;
//!
//! for entry in archive.list(&ListOptions::new().pattern("*.txt"))? {
//!     let out = format!("out/{}", entry.path);
//!     archive.extract(&entry.path, Destination::path(out), &ExtractOptions::default())?;
//! }
//! # Ok::<(), arcbridge::Error>(())
//! ```

mod archive_open;
mod archive_query;
mod destination;
mod extraction;
mod metadata;
mod options;
mod select;

pub use archive_query::ListEntry;
pub use destination::{Destination, Source};
pub use options::{ExtractOptions, ListOptions, OpenOptions};
pub use select::{Matcher, TypeFilter};

use crate::codec::CodecArchive;
use crate::{Error, Result};

/// An archive handle.
///
/// The lifetime ties the handle to the source it was opened from when that
/// source is a borrowed handle; archives opened from a path are `'static`.
#[derive(Default)]
pub struct Archive<'a> {
    inner: Option<Box<dyn CodecArchive + 'a>>,
}

impl<'a> Archive<'a> {
    /// Creates a handle that is not yet open.
    pub fn new() -> Self {
        Self { inner: None }
    }

    /// Returns true if the handle is open.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Closes the handle, releasing the codec archive and its input stream.
    ///
    /// Fails with [`Error::NotOpen`] if the handle is not open.
    pub fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(_) => {
                log::debug!("archive closed");
                Ok(())
            }
            None => Err(Error::NotOpen),
        }
    }

    fn codec(&self) -> Result<&(dyn CodecArchive + 'a)> {
        self.inner.as_deref().ok_or(Error::NotOpen)
    }

    fn codec_mut(&mut self) -> Result<&mut (dyn CodecArchive + 'a)> {
        self.inner.as_deref_mut().ok_or(Error::NotOpen)
    }
}

impl std::fmt::Debug for Archive<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("open", &self.is_open())
            .finish()
    }
}
