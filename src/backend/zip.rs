//! ZIP codec backed by the `zip` crate.
//!
//! Reading exposes these properties:
//!
//! | Level | Property | Type |
//! |-------|----------|------|
//! | archive | `comment` | string |
//! | archive | `offset` | u64 |
//! | archive | `physize` | u64 (undeclared, 64-bit accessor only) |
//! | item | `path`, `method`, `comment` | string |
//! | item | `isdir`, `encrypted` | bool |
//! | item | `size`, `packsize` | u64 |
//! | item | `attrib`, `posixattrib`, `crc` | u32 |
//! | item | `mtime` | filetime |
//!
//! Writing accepts these archive properties:
//!
//! | Name | Value |
//! |------|-------|
//! | `x`, `level` | compression level 0-9 |
//! | `m`, `method` | `copy`/`store` or `deflate` |
//! | `tm` | store modification times (default on) |
//! | `comment` | archive comment |
//!
//! Item names are stored as given, with `/` separators. Directory entries
//! carry a trailing `/` in the archive but are listed without it. Encryption uses
//! ZipCrypto. Archives are always written from scratch; in-place update of an
//! existing archive is not supported.

use std::io::{self, Seek, SeekFrom};

use chrono::{Datelike, NaiveDate, Timelike};
use zip::result::ZipError;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::codec::{
    Codec, CodecArchive, CodecWriter, CreateRequest, FormatId, FormatInfo, FormatSelection,
    OpenRequest,
};
use crate::property::{PropertyId, PropertyType};
use crate::stream::meta::{
    FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_READONLY,
    FILE_ATTRIBUTE_UNIX_EXTENSION,
};
use crate::stream::{InStream, OutStream, StreamMode};
use crate::timestamp;
use crate::{Error, Result};

/// Format id of ZIP in this codec's table.
pub const ZIP_FORMAT: FormatId = FormatId(0);

const ZIP_EXTENSIONS: &str = "zip jar war ear apk xpi odt ods odp docx xlsx pptx epub";

const ARCHIVE_PROPERTIES: &[(PropertyId, PropertyType)] = &[
    (PropertyId::COMMENT, PropertyType::String),
    (PropertyId::OFFSET, PropertyType::U64),
];

const ITEM_PROPERTIES: &[(PropertyId, PropertyType)] = &[
    (PropertyId::PATH, PropertyType::String),
    (PropertyId::IS_DIR, PropertyType::Bool),
    (PropertyId::SIZE, PropertyType::U64),
    (PropertyId::PACK_SIZE, PropertyType::U64),
    (PropertyId::MTIME, PropertyType::FileTime),
    (PropertyId::ATTRIB, PropertyType::U32),
    (PropertyId::POSIX_ATTRIB, PropertyType::U32),
    (PropertyId::ENCRYPTED, PropertyType::Bool),
    (PropertyId::CRC, PropertyType::U32),
    (PropertyId::METHOD, PropertyType::String),
    (PropertyId::COMMENT, PropertyType::String),
];

/// The bundled ZIP codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCodec;

impl ZipCodec {
    /// Creates the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for ZipCodec {
    fn formats(&self) -> Vec<FormatInfo> {
        vec![FormatInfo {
            id: ZIP_FORMAT,
            name: "zip".into(),
            extensions: ZIP_EXTENSIONS.into(),
            updatable: true,
        }]
    }

    fn open_archive<'a>(&self, request: OpenRequest<'a>) -> Result<Box<dyn CodecArchive + 'a>> {
        check_format(request.format)?;
        if request.multivolume {
            return Err(Error::codec("multi-volume ZIP archives are not supported"));
        }

        let mut stream = request.stream;
        if let Some(filename) = &request.filename {
            stream.open(filename)?;
        }
        let phy_size = stream.seek(SeekFrom::End(0))?;
        stream.rewind()?;

        let archive = ZipArchive::new(stream).map_err(zip_error)?;
        Ok(Box::new(ZipHandle::load(archive, phy_size, request.password)?))
    }

    fn create_archive<'a>(
        &self,
        request: CreateRequest<'a>,
    ) -> Result<Box<dyn CodecWriter + 'a>> {
        check_format(request.format)?;
        Ok(Box::new(ZipCreator {
            writer: Some(ZipWriter::new(request.output)),
            source: request.source,
            password: request.password,
            method: CompressionMethod::Deflated,
            level: None,
            store_mtime: true,
            comment: None,
            items: Vec::new(),
        }))
    }
}

fn check_format(format: FormatSelection) -> Result<()> {
    match format {
        FormatSelection::Forced(id) if id != ZIP_FORMAT => Err(Error::UnsupportedFormat {
            format: format!("format #{}", id.0),
        }),
        _ => Ok(()),
    }
}

fn zip_error(e: ZipError) -> Error {
    match e {
        ZipError::Io(io) => Error::Io(io),
        other => Error::codec(other),
    }
}

struct ZipItem {
    path: String,
    is_dir: bool,
    size: u64,
    packed_size: u64,
    crc: u32,
    mode: Option<u32>,
    mtime: Option<u32>,
    encrypted: bool,
    method: String,
    comment: String,
}

impl ZipItem {
    fn attributes(&self) -> u32 {
        let mut attributes = if self.is_dir {
            FILE_ATTRIBUTE_DIRECTORY
        } else {
            FILE_ATTRIBUTE_ARCHIVE
        };
        if let Some(mode) = self.mode {
            if mode & 0o222 == 0 {
                attributes |= FILE_ATTRIBUTE_READONLY;
            }
            attributes |= FILE_ATTRIBUTE_UNIX_EXTENSION | ((mode & 0xFFFF) << 16);
        }
        attributes
    }
}

/// An open ZIP archive.
struct ZipHandle<'a> {
    archive: ZipArchive<InStream<'a>>,
    items: Vec<ZipItem>,
    comment: String,
    phy_size: u64,
    password: Option<String>,
}

impl<'a> ZipHandle<'a> {
    fn load(
        mut archive: ZipArchive<InStream<'a>>,
        phy_size: u64,
        password: Option<String>,
    ) -> Result<Self> {
        let mut items = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index_raw(index).map_err(zip_error)?;
            items.push(ZipItem {
                path: file.name().trim_end_matches('/').to_string(),
                is_dir: file.is_dir(),
                size: file.size(),
                packed_size: file.compressed_size(),
                crc: file.crc32(),
                mode: file.unix_mode(),
                mtime: file.last_modified().and_then(secs_from_datetime),
                encrypted: file.encrypted(),
                method: format!("{:?}", file.compression()),
                comment: file.comment().to_string(),
            });
        }
        let comment = String::from_utf8_lossy(archive.comment()).into_owned();
        log::debug!("zip archive with {} items", items.len());

        Ok(Self {
            archive,
            items,
            comment,
            phy_size,
            password,
        })
    }

    fn item(&self, item: u32) -> Option<&ZipItem> {
        self.items.get(item as usize)
    }
}

impl CodecArchive for ZipHandle<'_> {
    fn item_count(&self) -> Result<u32> {
        u32::try_from(self.items.len()).map_err(|_| Error::codec("too many items"))
    }

    fn property_count(&self) -> u32 {
        ARCHIVE_PROPERTIES.len() as u32
    }

    fn property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)> {
        ARCHIVE_PROPERTIES.get(index as usize).copied()
    }

    fn item_property_count(&self) -> u32 {
        ITEM_PROPERTIES.len() as u32
    }

    fn item_property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)> {
        ITEM_PROPERTIES.get(index as usize).copied()
    }

    fn string_property(&self, id: PropertyId) -> Option<String> {
        match id {
            PropertyId::COMMENT if !self.comment.is_empty() => Some(self.comment.clone()),
            _ => None,
        }
    }

    fn bool_property(&self, _id: PropertyId) -> Option<bool> {
        None
    }

    fn u32_property(&self, _id: PropertyId) -> Option<u32> {
        None
    }

    fn u64_property(&self, id: PropertyId) -> Option<u64> {
        match id {
            PropertyId::OFFSET => Some(self.archive.offset()),
            PropertyId::PHY_SIZE => Some(self.phy_size),
            _ => None,
        }
    }

    fn time_property(&self, _id: PropertyId) -> Option<u32> {
        None
    }

    fn string_item_property(&self, item: u32, id: PropertyId) -> Option<String> {
        let entry = self.item(item)?;
        match id {
            PropertyId::PATH => Some(entry.path.clone()),
            PropertyId::METHOD => Some(entry.method.clone()),
            PropertyId::COMMENT if !entry.comment.is_empty() => Some(entry.comment.clone()),
            _ => None,
        }
    }

    fn bool_item_property(&self, item: u32, id: PropertyId) -> Option<bool> {
        let entry = self.item(item)?;
        match id {
            PropertyId::IS_DIR => Some(entry.is_dir),
            PropertyId::ENCRYPTED => Some(entry.encrypted),
            _ => None,
        }
    }

    fn u32_item_property(&self, item: u32, id: PropertyId) -> Option<u32> {
        let entry = self.item(item)?;
        match id {
            PropertyId::ATTRIB => Some(entry.attributes()),
            PropertyId::POSIX_ATTRIB => entry.mode,
            PropertyId::CRC => Some(entry.crc),
            _ => None,
        }
    }

    fn u64_item_property(&self, item: u32, id: PropertyId) -> Option<u64> {
        let entry = self.item(item)?;
        match id {
            PropertyId::SIZE => Some(entry.size),
            PropertyId::PACK_SIZE => Some(entry.packed_size),
            _ => None,
        }
    }

    fn time_item_property(&self, item: u32, id: PropertyId) -> Option<u32> {
        match id {
            PropertyId::MTIME => self.item(item)?.mtime,
            _ => None,
        }
    }

    fn extract(
        &mut self,
        output: &mut OutStream<'_>,
        password: Option<&str>,
        item: u32,
    ) -> Result<()> {
        let encrypted = self
            .item(item)
            .map(|e| e.encrypted)
            .ok_or_else(|| Error::codec(format!("item index {} out of range", item)))?;
        let index = item as usize;
        let password = password.or(self.password.as_deref());

        let mut file = match (encrypted, password) {
            (false, _) => self.archive.by_index(index),
            (true, Some(pw)) => self.archive.by_index_decrypt(index, pw.as_bytes()),
            (true, None) => return Err(Error::codec("item is encrypted and no password was given")),
        }
        .map_err(zip_error)?;

        io::copy(&mut file, output)?;
        Ok(())
    }
}

/// A ZIP archive being written.
struct ZipCreator<'a> {
    writer: Option<ZipWriter<OutStream<'a>>>,
    source: InStream<'a>,
    password: Option<String>,
    method: CompressionMethod,
    level: Option<i64>,
    store_mtime: bool,
    comment: Option<String>,
    items: Vec<String>,
}

impl<'a> ZipCreator<'a> {
    fn write_item(&mut self, writer: &mut ZipWriter<OutStream<'a>>, path: &str) -> Result<()> {
        let name = if cfg!(windows) {
            path.replace('\\', "/")
        } else {
            path.to_string()
        };
        let path_based = self.source.mode() != StreamMode::Attached;

        let level = match self.method {
            CompressionMethod::Stored => None,
            _ => self.level,
        };
        let mut options = SimpleFileOptions::default()
            .compression_method(self.method)
            .compression_level(level)
            .large_file(self.source.size(path) >= u64::from(u32::MAX));
        if path_based {
            let mode = self.source.file_mode(path);
            if mode != 0 {
                options = options.unix_permissions(mode & 0o7777);
            }
            if self.store_mtime {
                if let Some(mtime) = datetime_from_secs(self.source.mtime(path)) {
                    options = options.last_modified_time(mtime);
                }
            }
        }
        let options = match &self.password {
            Some(pw) => options.with_deprecated_encryption(pw.as_bytes()),
            None => options,
        };

        if self.source.is_dir(path) {
            log::debug!("adding directory '{}'", name);
            writer.add_directory(name, options).map_err(zip_error)?;
            return Ok(());
        }

        log::debug!("adding file '{}'", name);
        self.source.open(path)?;
        writer.start_file(name, options).map_err(zip_error)?;
        io::copy(&mut self.source, writer)?;
        self.source.close();
        Ok(())
    }
}

impl CodecWriter for ZipCreator<'_> {
    fn set_int_property(&mut self, name: &str, value: i64) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "x" | "level" if (0..=9).contains(&value) => {
                self.level = Some(value);
                if value == 0 {
                    self.method = CompressionMethod::Stored;
                }
                Ok(())
            }
            "x" | "level" => Err(Error::codec(format!(
                "compression level {} is out of range 0-9",
                value
            ))),
            "tm" => self.set_bool_property(name, value != 0),
            _ => Err(Error::codec(format!("unsupported property: {}", name))),
        }
    }

    fn set_bool_property(&mut self, name: &str, value: bool) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "tm" => {
                self.store_mtime = value;
                Ok(())
            }
            _ => Err(Error::codec(format!("unsupported property: {}", name))),
        }
    }

    fn set_string_property(&mut self, name: &str, value: &str) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "m" | "method" => {
                self.method = match value.to_ascii_lowercase().as_str() {
                    "copy" | "store" => CompressionMethod::Stored,
                    "deflate" => CompressionMethod::Deflated,
                    _ => {
                        return Err(Error::codec(format!(
                            "unsupported compression method: {}",
                            value
                        )));
                    }
                };
                Ok(())
            }
            "comment" => {
                self.comment = Some(value.to_string());
                Ok(())
            }
            _ => Err(Error::codec(format!("unsupported property: {}", name))),
        }
    }

    fn add_item(&mut self, path: &str) -> Result<()> {
        self.items.push(path.to_string());
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| Error::codec("archive has already been written"))?;
        if let Some(comment) = self.comment.take() {
            writer.set_comment(comment);
        }
        for path in std::mem::take(&mut self.items) {
            self.write_item(&mut writer, &path)?;
        }
        let mut output = writer.finish().map_err(zip_error)?;
        output.detach()?;
        Ok(())
    }
}

fn secs_from_datetime(dt: DateTime) -> Option<u32> {
    let civil = NaiveDate::from_ymd_opt(
        i32::from(dt.year()),
        u32::from(dt.month()),
        u32::from(dt.day()),
    )?
    .and_hms_opt(
        u32::from(dt.hour()),
        u32::from(dt.minute()),
        u32::from(dt.second()),
    )?;
    Some(timestamp::to_epoch_secs(civil))
}

fn datetime_from_secs(secs: u32) -> Option<DateTime> {
    let t = timestamp::from_epoch_secs(secs);
    let year = u16::try_from(t.year()).ok()?;
    match DateTime::from_date_and_time(
        year,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    ) {
        Ok(dt) => Some(dt),
        Err(_) => {
            log::debug!("time {} is outside the ZIP date range", secs);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let codec = ZipCodec::new();
        assert_eq!(codec.format_for_extension("zip"), Some(ZIP_FORMAT));
        assert_eq!(codec.format_for_extension("JAR"), Some(ZIP_FORMAT));
        assert_eq!(codec.format_for_extension("7z"), None);
    }

    #[test]
    fn test_forced_foreign_format_rejected() {
        assert!(check_format(FormatSelection::AutoDetect).is_ok());
        assert!(check_format(FormatSelection::Forced(ZIP_FORMAT)).is_ok());
        assert!(matches!(
            check_format(FormatSelection::Forced(FormatId(7))),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_datetime_conversion() {
        // 2020-05-17 10:20:30 UTC
        let dt = datetime_from_secs(1_589_710_830).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2020, 5, 17));
        assert_eq!(secs_from_datetime(dt), Some(1_589_710_830));
        // before 1980 is not representable
        assert!(datetime_from_secs(0).is_none());
    }

    #[test]
    fn test_item_attributes() {
        let item = ZipItem {
            path: "bin/tool".into(),
            is_dir: false,
            size: 0,
            packed_size: 0,
            crc: 0,
            mode: Some(0o100555),
            mtime: None,
            encrypted: false,
            method: "Stored".into(),
            comment: String::new(),
        };
        let attrib = item.attributes();
        assert_ne!(attrib & FILE_ATTRIBUTE_UNIX_EXTENSION, 0);
        assert_ne!(attrib & FILE_ATTRIBUTE_READONLY, 0);
        assert_eq!(attrib >> 16, 0o100555);
    }
}
