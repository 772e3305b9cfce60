//! Byte stream adapters between the engine, the codec and real sinks.
//!
//! A byte stream wraps at most one underlying sink at a time, in one of two
//! modes:
//!
//! - **Owning**: the stream opened a file from a path and closes it on
//!   [`detach`](InStream::detach), [`close`](InStream::close) or drop.
//! - **Attached**: the stream wraps a caller-provided, already-open handle.
//!   The handle is never closed by the stream; [`detach`](InStream::detach)
//!   hands it back to the caller.
//!
//! Filesystem metadata queries (size, directory flag, mode, attributes,
//! modification time) are only meaningful in path-based mode. A stream that is
//! attached to a handle answers zero or `false` for all of them, since there
//! is no path to stat.
//!
//! Attaching a second sink to a stream that already has one fails with
//! [`Error::AlreadyAttached`](crate::Error::AlreadyAttached) and leaves the
//! first attachment in place.
//!
//! # Example
//!
//! ```rust
//! use arcbridge::stream::{InStream, StreamMode};
//! use std::io::{Cursor, Read};
//!
//! let mut stream = InStream::new();
//! stream.attach_handle(Cursor::new(b"payload".to_vec())).unwrap();
//! assert_eq!(stream.mode(), StreamMode::Attached);
//!
//! // A second attachment is refused.
//! assert!(stream.attach_handle(Cursor::new(Vec::new())).is_err());
//!
//! let mut buf = String::new();
//! stream.read_to_string(&mut buf).unwrap();
//! assert_eq!(buf, "payload");
//! ```

mod input;
pub mod meta;
mod output;

pub use input::InStream;
pub use output::OutStream;

use std::io::{Read, Seek, Write};

/// A readable and seekable handle.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// A writable and seekable handle.
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek + ?Sized> WriteSeek for T {}

/// The sink a stream currently refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// No sink.
    Detached,
    /// A file the stream opened itself and will close.
    Owning,
    /// A caller-provided handle the stream never closes.
    Attached,
}

impl StreamMode {
    /// Returns true if filesystem metadata queries are meaningful.
    pub fn is_path_based(&self) -> bool {
        !matches!(self, Self::Attached)
    }
}

fn not_connected() -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::NotConnected,
        "stream has no attached sink",
    )
}
