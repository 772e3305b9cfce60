//! Input side of the byte stream adapters.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::meta::{self, FileStat};
use super::{ReadSeek, StreamMode, not_connected};
use crate::{Error, Result};

enum Sink<'a> {
    Detached,
    Owning { file: File, path: PathBuf },
    Attached(Box<dyn ReadSeek + 'a>),
}

/// A readable byte stream handed to the codec.
///
/// The codec reads archive data from it when opening an archive, and item
/// data from it when building one. In path-based mode the codec retargets the
/// stream with [`open`](Self::open) for every file it needs; when attached to
/// a handle, `open` is a no-op and all data comes from that handle.
pub struct InStream<'a> {
    sink: Sink<'a>,
    base_dir: Option<PathBuf>,
}

impl<'a> InStream<'a> {
    /// Creates a detached stream.
    pub fn new() -> Self {
        Self {
            sink: Sink::Detached,
            base_dir: None,
        }
    }

    /// Creates a stream attached to an open handle.
    pub fn attached(handle: impl ReadSeek + 'a) -> Self {
        Self::attached_boxed(Box::new(handle))
    }

    pub(crate) fn attached_boxed(handle: Box<dyn ReadSeek + 'a>) -> Self {
        Self {
            sink: Sink::Attached(handle),
            base_dir: None,
        }
    }

    /// Sets the directory relative paths are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
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
    pub fn attach_handle(&mut self, handle: impl ReadSeek + 'a) -> Result<()> {
        if !matches!(self.sink, Sink::Detached) {
            return Err(Error::AlreadyAttached);
        }
        self.sink = Sink::Attached(Box::new(handle));
        Ok(())
    }

    /// Opens a file for reading and takes ownership of it.
    ///
    /// Fails with [`Error::AlreadyAttached`] if the stream already has a sink.
    pub fn attach_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if !matches!(self.sink, Sink::Detached) {
            return Err(Error::AlreadyAttached);
        }
        self.open_owning(path.as_ref())
    }

    /// Releases the sink.
    ///
    /// An owned file is closed. An attached handle is returned to the caller
    /// untouched.
    pub fn detach(&mut self) -> Option<Box<dyn ReadSeek + 'a>> {
        match std::mem::replace(&mut self.sink, Sink::Detached) {
            Sink::Attached(handle) => Some(handle),
            Sink::Owning { path, .. } => {
                log::debug!("closed input '{}'", path.display());
                None
            }
            Sink::Detached => None,
        }
    }

    /// Points the stream at a file on behalf of the codec.
    ///
    /// An attached stream ignores the request and keeps reading from its
    /// handle. Otherwise any previously owned file is closed first.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        match self.sink {
            Sink::Attached(_) => Ok(()),
            _ => {
                self.close();
                self.open_owning(path.as_ref())
            }
        }
    }

    /// Closes an owned file. Attached handles are left alone.
    pub fn close(&mut self) {
        if matches!(self.sink, Sink::Owning { .. }) {
            self.sink = Sink::Detached;
        }
    }

    /// Returns true if `path` is a directory. Always false when attached.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.stat(path.as_ref()).is_dir
    }

    /// Returns the size of `path`. Always 0 when attached.
    pub fn size(&self, path: impl AsRef<Path>) -> u64 {
        self.stat(path.as_ref()).size
    }

    /// Returns the POSIX mode of `path`. Always 0 when attached.
    pub fn file_mode(&self, path: impl AsRef<Path>) -> u32 {
        self.stat(path.as_ref()).mode
    }

    /// Returns the attribute word of `path`. Always 0 when attached.
    pub fn attributes(&self, path: impl AsRef<Path>) -> u32 {
        self.stat(path.as_ref()).attributes
    }

    /// Returns the modification time of `path` in epoch seconds. Always 0
    /// when attached.
    pub fn mtime(&self, path: impl AsRef<Path>) -> u32 {
        self.stat(path.as_ref()).mtime
    }

    fn stat(&self, path: &Path) -> FileStat {
        if !self.mode().is_path_based() {
            return FileStat::default();
        }
        let resolved = self.resolve(path);
        match meta::stat(&resolved) {
            Ok(st) => st,
            Err(e) => {
                log::debug!("stat '{}' failed: {}", resolved.display(), e);
                FileStat::default()
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn open_owning(&mut self, path: &Path) -> Result<()> {
        let resolved = self.resolve(path);
        let file = File::open(&resolved).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("couldn't open file \"{}\": {}", resolved.display(), e),
            ))
        })?;
        log::debug!("opened input '{}'", resolved.display());
        self.sink = Sink::Owning {
            file,
            path: resolved,
        };
        Ok(())
    }
}

impl Default for InStream<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InStream")
            .field("mode", &self.mode())
            .field("path", &self.path())
            .finish()
    }
}

impl Read for InStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Owning { file, .. } => file.read(buf),
            Sink::Attached(handle) => handle.read(buf),
            Sink::Detached => Err(not_connected()),
        }
    }
}

impl Seek for InStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.sink {
            Sink::Owning { file, .. } => file.seek(pos),
            Sink::Attached(handle) => handle.seek(pos),
            Sink::Detached => Err(not_connected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_double_attach_keeps_first() {
        let mut stream = InStream::new();
        stream.attach_handle(Cursor::new(b"first".to_vec())).unwrap();

        let err = stream
            .attach_handle(Cursor::new(b"second".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyAttached));

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"first");
    }

    #[test]
    fn test_attach_path_after_handle_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let mut stream = InStream::attached(Cursor::new(b"handle".to_vec()));
        assert!(matches!(
            stream.attach_path(&file),
            Err(Error::AlreadyAttached)
        ));
        assert_eq!(stream.mode(), StreamMode::Attached);
    }

    #[test]
    fn test_attached_metadata_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"abc").unwrap();

        let stream = InStream::attached(Cursor::new(Vec::new()));
        assert!(!stream.is_dir(dir.path()));
        assert_eq!(stream.size(&file), 0);
        assert_eq!(stream.file_mode(&file), 0);
        assert_eq!(stream.mtime(&file), 0);
        assert_eq!(stream.attributes(&file), 0);
    }

    #[test]
    fn test_path_mode_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();

        let stream = InStream::new().with_base_dir(dir.path());
        assert_eq!(stream.size("a.txt"), 3);
        assert!(!stream.is_dir("a.txt"));
        assert!(stream.is_dir("."));
        assert_eq!(stream.size("missing.txt"), 0);
    }

    #[test]
    fn test_open_retargets_owned_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one"), b"1").unwrap();
        std::fs::write(dir.path().join("two"), b"2").unwrap();

        let mut stream = InStream::new().with_base_dir(dir.path());
        stream.open("one").unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "1");

        stream.open("two").unwrap();
        buf.clear();
        stream.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "2");
        assert_eq!(stream.mode(), StreamMode::Owning);
    }

    #[test]
    fn test_open_is_noop_when_attached() {
        let mut stream = InStream::attached(Cursor::new(b"data".to_vec()));
        stream.open("/nonexistent/path").unwrap();
        assert_eq!(stream.mode(), StreamMode::Attached);
    }

    #[test]
    fn test_detach_returns_handle() {
        let mut stream = InStream::attached(Cursor::new(b"xyz".to_vec()));
        let mut handle = stream.detach().unwrap();
        assert_eq!(stream.mode(), StreamMode::Detached);

        let mut buf = Vec::new();
        handle.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"xyz");
    }

    #[test]
    fn test_detached_read_fails() {
        let mut stream = InStream::new();
        let mut buf = [0u8; 4];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn test_open_missing_file_reports_path() {
        let mut stream = InStream::new();
        let err = stream.open("/definitely/not/here.bin").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.bin"));
    }
}
