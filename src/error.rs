//! Error types for archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of the engine, along with a convenient [`Result<T>`] type
//! alias.
//!
//! # Error Handling
//!
//! Every engine operation returns `Result<T, Error>`. Primary operations
//! (open, extract, commit) are strict: any failure there is terminal and
//! reported verbatim. Secondary effects (metadata propagation after
//! extraction, cosmetic property assignment during creation) never surface
//! here; they are logged through the `log` facade instead.
//!
//! ```rust,no_run
//! use arcbridge::{Error, Library, OpenOptions, Destination, ExtractOptions};
//!
//! fn extract_one(path: &str, item: &str) -> arcbridge::Result<()> {
//!     let mut library = Library::default();
//!     let mut archive = library.open_path(path, &OpenOptions::default())?;
//!     match archive.extract(item, Destination::path("out.bin"), &ExtractOptions::default()) {
//!         Err(Error::EntryNotFound { path }) => {
//!             eprintln!("no such item: {}", path);
//!             Ok(())
//!         }
//!         other => other,
//!     }
//! }
//! ```

use std::io;

/// The main error type for archive operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Lookup | [`EntryNotFound`][Self::EntryNotFound] | Requested item path absent |
/// | State | [`AlreadyOpen`][Self::AlreadyOpen], [`NotOpen`][Self::NotOpen], [`AlreadyAttached`][Self::AlreadyAttached], [`NotAttached`][Self::NotAttached], [`AlreadyInitialized`][Self::AlreadyInitialized] | Lifecycle misuse |
/// | I/O | [`Io`][Self::Io] | Sink open/read/write/seek/stat failure |
/// | Codec | [`Codec`][Self::Codec], [`UnsupportedFormat`][Self::UnsupportedFormat] | Failure reported by the codec library |
/// | Input | [`Validation`][Self::Validation] | Malformed caller input |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested item was not found after a full scan of the archive.
    ///
    /// The path is reported exactly as it was requested.
    #[error("no such item \"{path}\" in the archive")]
    EntryNotFound {
        /// The requested path.
        path: String,
    },

    /// The archive handle has already been opened.
    ///
    /// A handle is opened exactly once; the existing codec object and stream
    /// are left untouched by the failed attempt.
    #[error("archive is already open")]
    AlreadyOpen,

    /// The archive handle is not open (never opened, or already closed).
    #[error("archive is not open")]
    NotOpen,

    /// A byte stream is already attached to a sink.
    ///
    /// The stream keeps referring to its first attachment.
    #[error("stream is already attached")]
    AlreadyAttached,

    /// A byte stream has no sink attached.
    #[error("stream is not attached")]
    NotAttached,

    /// The codec library has already been initialized.
    #[error("already initialized")]
    AlreadyInitialized,

    /// An I/O error occurred on a sink or the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The codec library reported a failure.
    ///
    /// The message is the codec's own, passed through verbatim.
    #[error("{message}")]
    Codec {
        /// Message from the codec.
        message: String,
    },

    /// The requested format is not recognized by the codec's format table.
    #[error("unsupported archive format: {format}")]
    UnsupportedFormat {
        /// The format name, extension or id that was requested.
        format: String,
    },

    /// Caller input was malformed.
    #[error("{0}")]
    Validation(String),
}

impl Error {
    /// Creates a codec error from any displayable message.
    pub fn codec(message: impl std::fmt::Display) -> Self {
        Error::Codec {
            message: message.to_string(),
        }
    }

    /// Returns `true` if this error reports a missing archive item.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntryNotFound { .. })
    }

    /// Returns `true` if this error originated in the codec layer.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec { .. } | Error::UnsupportedFormat { .. })
    }

    /// Returns `true` if this error reports misuse of a handle or stream
    /// lifecycle rather than a data problem.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Error::AlreadyOpen
                | Error::NotOpen
                | Error::AlreadyAttached
                | Error::NotAttached
                | Error::AlreadyInitialized
        )
    }
}

/// A specialized Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
