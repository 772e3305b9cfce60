//! Filesystem metadata helpers for path-based streams.
//!
//! Attribute words follow the Windows layout used by archive formats, with the
//! POSIX mode carried in the high 16 bits when the Unix extension bit is set.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Read-only attribute bit.
pub const FILE_ATTRIBUTE_READONLY: u32 = 0x01;
/// Hidden attribute bit.
pub const FILE_ATTRIBUTE_HIDDEN: u32 = 0x02;
/// System attribute bit.
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x04;
/// Directory attribute bit.
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;
/// Archive attribute bit.
pub const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x20;
/// Marks the high 16 bits of an attribute word as a POSIX mode.
pub const FILE_ATTRIBUTE_UNIX_EXTENSION: u32 = 0x8000;

/// Stat result of a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// POSIX mode including file type bits.
    pub mode: u32,
    /// Modification time as Unix epoch seconds, truncated to 32 bits.
    pub mtime: u32,
    /// Windows-style attribute word.
    pub attributes: u32,
}

/// Stats a path.
pub fn stat(path: &Path) -> io::Result<FileStat> {
    let metadata = fs::metadata(path)?;
    let is_dir = metadata.is_dir();
    let mode = mode_of(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata).unix_seconds();

    Ok(FileStat {
        size: if is_dir { 0 } else { metadata.len() },
        is_dir,
        mode,
        mtime: legacy_seconds(mtime),
        attributes: attributes_of(&metadata, mode),
    })
}

/// Clamps epoch seconds into the 32-bit range used for timestamps.
pub fn legacy_seconds(secs: i64) -> u32 {
    secs.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    let base = if metadata.is_dir() { 0o040755 } else { 0o100644 };
    if metadata.permissions().readonly() {
        base & !0o222
    } else {
        base
    }
}

fn attributes_of(metadata: &Metadata, mode: u32) -> u32 {
    let mut attributes = if metadata.is_dir() {
        FILE_ATTRIBUTE_DIRECTORY
    } else {
        FILE_ATTRIBUTE_ARCHIVE
    };
    if metadata.permissions().readonly() {
        attributes |= FILE_ATTRIBUTE_READONLY;
    }
    attributes | FILE_ATTRIBUTE_UNIX_EXTENSION | ((mode & 0xFFFF) << 16)
}

/// Extracts a POSIX mode from an attribute word carrying the Unix extension.
pub fn mode_from_attributes(attributes: u32) -> Option<u32> {
    if attributes & FILE_ATTRIBUTE_UNIX_EXTENSION != 0 && attributes >> 16 != 0 {
        Some(attributes >> 16)
    } else {
        None
    }
}

/// Sets the modification time of a path from epoch seconds.
pub fn set_mtime(path: &Path, secs: u32) -> io::Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(i64::from(secs), 0))
}

/// Applies the permission bits of a POSIX mode to a path.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

/// Applies the permission bits of a POSIX mode to a path.
///
/// Only the write bits are meaningful here; they map to the read-only flag.
#[cfg(not(unix))]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    set_readonly(path, mode & 0o222 == 0)
}

/// Sets or clears the read-only flag of a path.
pub fn set_readonly(path: &Path, readonly: bool) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(readonly);
    fs::set_permissions(path, permissions)
}

/// Applies the Windows-style attribute bits of an attribute word.
///
/// Only the read-only bit has a portable equivalent.
pub fn set_attributes(path: &Path, attributes: u32) -> io::Result<()> {
    if attributes & FILE_ATTRIBUTE_READONLY != 0 {
        set_readonly(path, true)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_attributes() {
        let attrib = FILE_ATTRIBUTE_ARCHIVE | FILE_ATTRIBUTE_UNIX_EXTENSION | (0o100644 << 16);
        assert_eq!(mode_from_attributes(attrib), Some(0o100644));
        assert_eq!(mode_from_attributes(FILE_ATTRIBUTE_ARCHIVE), None);
        assert_eq!(mode_from_attributes(0o644 << 16), None);
    }

    #[test]
    fn test_legacy_seconds_clamps() {
        assert_eq!(legacy_seconds(-5), 0);
        assert_eq!(legacy_seconds(1_700_000_000), 1_700_000_000);
        assert_eq!(legacy_seconds(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_stat_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.bin");
        fs::write(&file, b"12345").unwrap();

        let st = stat(&file).unwrap();
        assert_eq!(st.size, 5);
        assert!(!st.is_dir);
        assert!(st.mtime > 0);
        assert_eq!(st.attributes & FILE_ATTRIBUTE_DIRECTORY, 0);

        let st = stat(dir.path()).unwrap();
        assert!(st.is_dir);
        assert_eq!(st.size, 0);
        assert_ne!(st.attributes & FILE_ATTRIBUTE_DIRECTORY, 0);
    }

    #[test]
    fn test_set_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("t.txt");
        fs::write(&file, b"x").unwrap();

        set_mtime(&file, 1_000_000_000).unwrap();
        assert_eq!(stat(&file).unwrap().mtime, 1_000_000_000);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_mode() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("run.sh");
        fs::write(&file, b"#!/bin/sh").unwrap();

        set_mode(&file, 0o100750).unwrap();
        assert_eq!(stat(&file).unwrap().mode & 0o7777, 0o750);
    }
}
