//! Codec library lifecycle and format registry.
//!
//! A [`Library`] owns a [`CodecLoader`] and, once initialized, the loaded
//! [`Codec`]. Initialization happens at most once: either explicitly through
//! [`Library::initialize`] or lazily, with the loader's default location, the
//! first time an operation needs the codec.
//!
//! # Example
//!
//! ```rust
//! use arcbridge::Library;
//!
//! let mut library = Library::default();
//! assert!(!library.is_initialized());
//!
//! let extensions = library.extensions().unwrap();
//! assert!(extensions.iter().any(|e| e == "zip"));
//! assert!(library.is_initialized());
//! ```

use std::path::Path;

use crate::codec::{Codec, CodecLoader, FormatId, FormatInfo};
use crate::read::{Archive, Destination, OpenOptions, Source};
use crate::stream::ReadSeek;
use crate::write::CreateOptions;
use crate::{Error, Result};

/// Entry point for opening and creating archives.
pub struct Library {
    loader: Box<dyn CodecLoader>,
    codec: Option<Box<dyn Codec>>,
}

impl Library {
    /// Creates an uninitialized library that loads its codec through `loader`.
    pub fn new(loader: impl CodecLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            codec: None,
        }
    }

    /// Creates a library that is already initialized with `codec`.
    pub fn with_codec(codec: impl Codec + 'static) -> Self {
        Self {
            loader: Box::new(no_codec_loader),
            codec: Some(Box::new(codec)),
        }
    }

    /// Loads the codec library, optionally from an explicit path.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if the codec is already
    /// loaded, whether explicitly or lazily.
    pub fn initialize(&mut self, path: Option<&Path>) -> Result<()> {
        if self.codec.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        match path {
            Some(p) => log::debug!("loading codec library from '{}'", p.display()),
            None => log::debug!("loading codec library from default location"),
        }
        self.codec = Some(self.loader.load(path)?);
        Ok(())
    }

    /// Returns true once the codec has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.codec.is_some()
    }

    /// Returns the codec, loading it from the default location if needed.
    pub fn codec(&mut self) -> Result<&dyn Codec> {
        let codec = match self.codec.take() {
            Some(codec) => codec,
            None => {
                log::debug!("lazily initializing codec library");
                self.loader.load(None)?
            }
        };
        Ok(&**self.codec.insert(codec))
    }

    /// Returns the codec's format table.
    pub fn formats(&mut self) -> Result<Vec<FormatInfo>> {
        Ok(self.codec()?.formats())
    }

    /// Returns every file extension of every supported format.
    pub fn extensions(&mut self) -> Result<Vec<String>> {
        Ok(self
            .formats()?
            .iter()
            .flat_map(|f| f.extensions().map(str::to_owned).collect::<Vec<_>>())
            .collect())
    }

    /// Looks up the format for a file extension.
    ///
    /// Fails with [`Error::UnsupportedFormat`] if no format claims it.
    pub fn format_for_extension(&mut self, ext: &str) -> Result<FormatId> {
        resolve_format(self.codec()?, ext)
    }

    /// Opens an archive file.
    pub fn open_path(
        &mut self,
        path: impl AsRef<Path>,
        options: &OpenOptions,
    ) -> Result<Archive<'static>> {
        let mut archive = Archive::new();
        archive.open(self, Source::Path(path.as_ref().to_path_buf()), options)?;
        Ok(archive)
    }

    /// Opens an archive from an already-open handle.
    ///
    /// The handle is never closed by the archive; pass `&mut File` to keep
    /// using it afterwards.
    pub fn open_handle<'a>(
        &mut self,
        handle: impl ReadSeek + 'a,
        options: &OpenOptions,
    ) -> Result<Archive<'a>> {
        let mut archive = Archive::new();
        archive.open(self, Source::Handle(Box::new(handle)), options)?;
        Ok(archive)
    }

    /// Creates an archive at `destination` from the files at `items`.
    ///
    /// See [`crate::write`] for the full sequence.
    pub fn create<S: AsRef<str>>(
        &mut self,
        destination: Destination<'_>,
        items: &[S],
        options: &CreateOptions,
    ) -> Result<()> {
        crate::write::create(self.codec()?, destination, None, items, options)
    }

    /// Creates an archive whose item data is read from a single open
    /// `source` handle instead of the filesystem.
    pub fn create_from<'a, S: AsRef<str>>(
        &mut self,
        source: impl ReadSeek + 'a,
        destination: Destination<'a>,
        items: &[S],
        options: &CreateOptions,
    ) -> Result<()> {
        crate::write::create(
            self.codec()?,
            destination,
            Some(Box::new(source)),
            items,
            options,
        )
    }
}

impl Default for Library {
    /// A library backed by the bundled codec.
    fn default() -> Self {
        Self::new(default_loader)
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

pub(crate) fn resolve_format(codec: &dyn Codec, ext: &str) -> Result<FormatId> {
    codec
        .format_for_extension(ext)
        .ok_or_else(|| Error::UnsupportedFormat {
            format: ext.to_string(),
        })
}

#[cfg(feature = "zip")]
fn default_loader(path: Option<&Path>) -> Result<Box<dyn Codec>> {
    if let Some(p) = path {
        log::debug!("bundled codec ignores library path '{}'", p.display());
    }
    Ok(Box::new(crate::backend::zip::ZipCodec::new()))
}

#[cfg(not(feature = "zip"))]
fn default_loader(path: Option<&Path>) -> Result<Box<dyn Codec>> {
    no_codec_loader(path)
}

fn no_codec_loader(_path: Option<&Path>) -> Result<Box<dyn Codec>> {
    Err(Error::codec("no codec library available"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[cfg(feature = "zip")]
    #[test]
    fn test_initialize_twice_fails() {
        let mut library = Library::default();
        library.initialize(None).unwrap();
        assert!(library.is_initialized());
        assert!(matches!(
            library.initialize(None),
            Err(Error::AlreadyInitialized)
        ));
    }

    #[cfg(feature = "zip")]
    #[test]
    fn test_lazy_initialization_loads_once() {
        let loads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&loads);
        let mut library = Library::new(move |path: Option<&Path>| {
            counter.set(counter.get() + 1);
            default_loader(path)
        });

        library.formats().unwrap();
        library.formats().unwrap();
        assert_eq!(loads.get(), 1);
        assert!(matches!(
            library.initialize(None),
            Err(Error::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_loader_failure_leaves_uninitialized() {
        let mut library = Library::new(no_codec_loader);
        let err = library.formats().unwrap_err();
        assert!(err.is_codec_error());
        assert!(!library.is_initialized());
    }

    #[cfg(feature = "zip")]
    #[test]
    fn test_unknown_extension() {
        let mut library = Library::default();
        let err = library.format_for_extension("nope").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref format } if format == "nope"));
    }
}
