//! Opening archives.

use super::{Archive, OpenOptions, Source};
use crate::codec::{FormatSelection, OpenRequest};
use crate::library::{Library, resolve_format};
use crate::stream::InStream;
use crate::{Error, Result};

impl<'a> Archive<'a> {
    /// Opens the handle on `source`.
    ///
    /// A handle is opened exactly once. A second call fails with
    /// [`Error::AlreadyOpen`] before anything else happens, leaving the open
    /// archive untouched.
    ///
    /// Format selection:
    /// - `options.format` set: that format is forced
    ///   ([`Error::UnsupportedFormat`] if the codec does not know it)
    /// - `options.detect_type` set, or handle source: detected by the codec
    ///   from the data
    /// - path source: detected from the filename
    ///
    /// Forcing a format and asking for detection at once is a
    /// [`Error::Validation`]. Multi-volume archives can only be opened from
    /// a path.
    pub fn open(
        &mut self,
        library: &mut Library,
        source: Source<'a>,
        options: &OpenOptions,
    ) -> Result<()> {
        if self.inner.is_some() {
            return Err(Error::AlreadyOpen);
        }
        if options.format.is_some() && options.detect_type {
            return Err(Error::Validation(
                "a forced format cannot be combined with type detection".into(),
            ));
        }
        if options.multivolume && source.is_handle() {
            return Err(Error::Validation(
                "multi-volume archives cannot be opened from a handle".into(),
            ));
        }

        let codec = library.codec()?;
        let format = match &options.format {
            Some(ext) => FormatSelection::Forced(resolve_format(codec, ext)?),
            None if options.detect_type || source.is_handle() => {
                FormatSelection::DeferToCodecSniffing
            }
            None => FormatSelection::AutoDetect,
        };

        let (stream, filename) = match source {
            Source::Path(path) => (InStream::new(), Some(path)),
            Source::Handle(handle) => (InStream::attached_boxed(handle), None),
        };

        match &filename {
            Some(p) => log::debug!("opening archive '{}' ({:?})", p.display(), format),
            None => log::debug!("opening archive from handle ({:?})", format),
        }

        let inner = codec.open_archive(OpenRequest {
            stream,
            filename,
            password: options.password.clone(),
            format,
            multivolume: options.multivolume,
        })?;
        self.inner = Some(inner);
        Ok(())
    }
}
