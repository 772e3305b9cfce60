//! Archive sources and output destinations.
//!
//! Both come in two flavors: a filesystem path the engine opens (and closes)
//! itself, or a caller-provided handle that is written to or read from but
//! never closed. Pass a mutable reference (`&mut File`, `&mut Vec<u8>` in a
//! cursor, ...) to keep using the handle after the operation.

use std::fmt;
use std::path::PathBuf;

use crate::stream::{ReadSeek, WriteSeek};

/// Where an archive is read from.
pub enum Source<'a> {
    /// An archive file, opened by the engine.
    Path(PathBuf),
    /// An already-open, seekable handle.
    Handle(Box<dyn ReadSeek + 'a>),
}

impl<'a> Source<'a> {
    /// Creates a path source.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a handle source.
    pub fn handle(handle: impl ReadSeek + 'a) -> Self {
        Self::Handle(Box::new(handle))
    }

    /// Returns true for handle sources.
    pub fn is_handle(&self) -> bool {
        matches!(self, Self::Handle(_))
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

/// Where extracted data or a new archive is written.
pub enum Destination<'a> {
    /// A file, created (or truncated) by the engine. Missing parent
    /// directories are created on extraction.
    Path(PathBuf),
    /// An already-open, seekable handle.
    Handle(Box<dyn WriteSeek + 'a>),
}

impl<'a> Destination<'a> {
    /// Creates a path destination.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a handle destination.
    pub fn handle(handle: impl WriteSeek + 'a) -> Self {
        Self::Handle(Box::new(handle))
    }

    /// Returns true for handle destinations.
    pub fn is_handle(&self) -> bool {
        matches!(self, Self::Handle(_))
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}
