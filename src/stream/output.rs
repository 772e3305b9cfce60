//! Output side of the byte stream adapters.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::meta;
use super::{StreamMode, WriteSeek, not_connected};
use crate::{Error, Result};

enum Sink<'a> {
    Detached,
    Owning { file: File, path: PathBuf },
    Attached(Box<dyn WriteSeek + 'a>),
}

/// A writable byte stream handed to the codec.
///
/// Extraction writes decompressed item data into it; creation writes the
/// archive itself. Besides raw writes it offers the filesystem operations a
/// codec may request (directory creation, mode and time updates). Those act on
/// real paths and do nothing when the stream is attached to a handle.
pub struct OutStream<'a> {
    sink: Sink<'a>,
}

impl<'a> OutStream<'a> {
    /// Creates a detached stream.
    pub fn new() -> Self {
        Self {
            sink: Sink::Detached,
        }
    }

    /// Creates a stream attached to an open handle.
    pub fn attached(handle: impl WriteSeek + 'a) -> Self {
        Self {
            sink: Sink::Attached(Box::new(handle)),
        }
    }

    /// Returns the current mode.
    pub fn mode(&self) -> StreamMode {
        match self.sink {
            Sink::Detached => StreamMode::Detached,
            Sink::Owning { .. } => StreamMode::Owning,
            Sink::Attached(_) => StreamMode::Attached,
        }
    }

    /// Returns the path of the file an owning stream has open.
    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::Owning { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Attaches an already-open handle.
    ///
    /// Fails with [`Error::AlreadyAttached`] if the stream already has a sink;
    /// the existing sink is kept.
    pub fn attach_handle(&mut self, handle: impl WriteSeek + 'a) -> Result<()> {
        self.attach_boxed(Box::new(handle))
    }

    pub(crate) fn attach_boxed(&mut self, handle: Box<dyn WriteSeek + 'a>) -> Result<()> {
        if !matches!(self.sink, Sink::Detached) {
            return Err(Error::AlreadyAttached);
        }
        self.sink = Sink::Attached(handle);
        Ok(())
    }

    /// Creates (or truncates) a file and takes ownership of it.
    ///
    /// Fails with [`Error::AlreadyAttached`] if the stream already has a sink.
    pub fn attach_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if !matches!(self.sink, Sink::Detached) {
            return Err(Error::AlreadyAttached);
        }
        self.create_owning(path.as_ref())
    }

    /// Releases the sink.
    ///
    /// An owned file is flushed and closed. An attached handle is flushed and
    /// returned to the caller.
    pub fn detach(&mut self) -> Result<Option<Box<dyn WriteSeek + 'a>>> {
        match std::mem::replace(&mut self.sink, Sink::Detached) {
            Sink::Attached(mut handle) => {
                handle.flush()?;
                Ok(Some(handle))
            }
            Sink::Owning { mut file, path } => {
                file.flush()?;
                log::debug!("closed output '{}'", path.display());
                Ok(None)
            }
            Sink::Detached => Ok(None),
        }
    }

    /// Points the stream at a new file on behalf of the codec.
    ///
    /// An attached stream ignores the request and keeps writing to its
    /// handle. Otherwise any previously owned file is closed first.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        match self.sink {
            Sink::Attached(_) => Ok(()),
            _ => {
                self.close();
                self.create_owning(path.as_ref())
            }
        }
    }

    /// Closes an owned file. Attached handles are left alone.
    pub fn close(&mut self) {
        if let Sink::Owning { file, path } = &mut self.sink {
            if let Err(e) = file.flush() {
                log::warn!("Failed to flush '{}': {}", path.display(), e);
            }
            self.sink = Sink::Detached;
        }
    }

    /// Creates a directory and its parents. No-op when attached.
    pub fn mkdir(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.mode().is_path_based() {
            fs::create_dir_all(path.as_ref())?;
        }
        Ok(())
    }

    /// Applies a POSIX mode to a path. No-op when attached.
    pub fn set_file_mode(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        if self.mode().is_path_based() {
            meta::set_mode(path.as_ref(), mode)?;
        }
        Ok(())
    }

    /// Applies Windows-style attribute bits to a path. No-op when attached.
    pub fn set_attributes(&self, path: impl AsRef<Path>, attributes: u32) -> Result<()> {
        if self.mode().is_path_based() {
            meta::set_attributes(path.as_ref(), attributes)?;
        }
        Ok(())
    }

    /// Sets the modification time of a path. No-op when attached.
    pub fn set_mtime(&self, path: impl AsRef<Path>, secs: u32) -> Result<()> {
        if self.mode().is_path_based() {
            meta::set_mtime(path.as_ref(), secs)?;
        }
        Ok(())
    }

    fn create_owning(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("couldn't create file \"{}\": {}", path.display(), e),
            ))
        })?;
        log::debug!("opened output '{}'", path.display());
        self.sink = Sink::Owning {
            file,
            path: path.to_path_buf(),
        };
        Ok(())
    }
}

impl Default for OutStream<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutStream")
            .field("mode", &self.mode())
            .field("path", &self.path())
            .finish()
    }
}

impl Write for OutStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Owning { file, .. } => file.write(buf),
            Sink::Attached(handle) => handle.write(buf),
            Sink::Detached => Err(not_connected()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Owning { file, .. } => file.flush(),
            Sink::Attached(handle) => handle.flush(),
            Sink::Detached => Ok(()),
        }
    }
}

impl Seek for OutStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.sink {
            Sink::Owning { file, .. } => file.seek(pos),
            Sink::Attached(handle) => handle.seek(pos),
            Sink::Detached => Err(not_connected()),
        }
    }
}
