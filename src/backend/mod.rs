//! Bundled codec implementations.
//!
//! [`Library::default`](crate::Library::default) loads the ZIP codec from
//! here (feature `zip`, on by default). Other codec libraries plug in through
//! [`Library::new`](crate::Library::new) with their own
//! [`CodecLoader`](crate::codec::CodecLoader).

#[cfg(feature = "zip")]
pub mod zip;
