//! Shared test utilities for integration tests.
//!
//! Provides a scriptable in-memory codec ([`MockCodec`]) whose property
//! tables, type quirks and failures are configured per test, plus helpers for
//! building ZIP fixtures.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::rc::Rc;

use arcbridge::codec::{
    Codec, CodecArchive, CodecWriter, CreateRequest, FormatId, FormatInfo, FormatSelection,
    OpenRequest, Threads,
};
use arcbridge::stream::{InStream, OutStream};
use arcbridge::{Error, Library, PropertyId, PropertyType, Result};

/// Format id the mock codec answers to.
pub const MOCK_FORMAT: FormatId = FormatId(3);

/// One item of a mock archive.
#[derive(Debug, Clone, Default)]
pub struct MockItem {
    pub path: String,
    pub is_dir: bool,
    pub data: Vec<u8>,
    /// Report the size only through the 32-bit accessor although it is
    /// declared as a 64-bit property.
    pub size_via_u32: bool,
    pub mtime: Option<u32>,
    pub posix_mode: Option<u32>,
    pub attributes: Option<u32>,
    pub password: Option<String>,
    /// Write this many bytes, then fail with a codec error.
    pub fail_after: Option<usize>,
}

impl MockItem {
    pub fn file(path: &str, data: &[u8]) -> Self {
        Self {
            path: path.into(),
            data: data.to_vec(),
            ..Default::default()
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            ..Default::default()
        }
    }
}

/// What the mock codec observed, shared with the test.
#[derive(Debug, Default)]
pub struct MockLog {
    pub opened: Vec<(Option<PathBuf>, FormatSelection, bool)>,
    pub threads: Vec<Threads>,
    pub passwords: Vec<Option<String>>,
    pub int_props: Vec<(String, i64)>,
    pub bool_props: Vec<(String, bool)>,
    pub string_props: Vec<(String, String)>,
    pub added: Vec<String>,
    pub committed: bool,
    pub create_filename: Option<PathBuf>,
    pub create_format: Option<FormatSelection>,
}

/// Scriptable codec.
#[derive(Clone, Default)]
pub struct MockCodec {
    pub items: Vec<MockItem>,
    /// Declare `isdir` in the item property table.
    pub declare_isdir: bool,
    pub comment: Option<String>,
    pub log: Rc<RefCell<MockLog>>,
}

impl MockCodec {
    pub fn new(items: Vec<MockItem>) -> Self {
        Self {
            items,
            declare_isdir: true,
            ..Default::default()
        }
    }

    /// A library already initialized with a copy of this codec.
    pub fn library(&self) -> Library {
        Library::with_codec(self.clone())
    }
}

impl Codec for MockCodec {
    fn formats(&self) -> Vec<FormatInfo> {
        vec![FormatInfo {
            id: MOCK_FORMAT,
            name: "mock".into(),
            extensions: "mock mck".into(),
            updatable: true,
        }]
    }

    fn open_archive<'a>(&self, request: OpenRequest<'a>) -> Result<Box<dyn CodecArchive + 'a>> {
        self.log.borrow_mut().opened.push((
            request.filename.clone(),
            request.format,
            request.multivolume,
        ));
        let mut stream = request.stream;
        if let Some(filename) = &request.filename {
            stream.open(filename)?;
        }
        Ok(Box::new(MockArchive {
            items: self.items.clone(),
            declare_isdir: self.declare_isdir,
            comment: self.comment.clone(),
            log: Rc::clone(&self.log),
            _stream: stream,
        }))
    }

    fn create_archive<'a>(
        &self,
        request: CreateRequest<'a>,
    ) -> Result<Box<dyn CodecWriter + 'a>> {
        {
            let mut log = self.log.borrow_mut();
            log.create_filename = request.filename.clone();
            log.create_format = Some(request.format);
        }
        Ok(Box::new(MockWriter {
            output: request.output,
            _source: request.source,
            log: Rc::clone(&self.log),
        }))
    }
}

struct MockArchive<'a> {
    items: Vec<MockItem>,
    declare_isdir: bool,
    comment: Option<String>,
    log: Rc<RefCell<MockLog>>,
    _stream: InStream<'a>,
}

impl MockArchive<'_> {
    fn item_props(&self) -> Vec<(PropertyId, PropertyType)> {
        let mut props = vec![(PropertyId::PATH, PropertyType::String)];
        if self.declare_isdir {
            props.push((PropertyId::IS_DIR, PropertyType::Bool));
        }
        props.extend([
            (PropertyId::SIZE, PropertyType::U64),
            (PropertyId::MTIME, PropertyType::FileTime),
            (PropertyId::ATTRIB, PropertyType::U32),
            (PropertyId::POSIX_ATTRIB, PropertyType::U32),
            (PropertyId::CRC, PropertyType::Other(0x4000)),
        ]);
        props
    }

    fn get(&self, item: u32) -> Option<&MockItem> {
        self.items.get(item as usize)
    }
}

impl CodecArchive for MockArchive<'_> {
    fn item_count(&self) -> Result<u32> {
        Ok(self.items.len() as u32)
    }

    fn property_count(&self) -> u32 {
        1
    }

    fn property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)> {
        (index == 0).then_some((PropertyId::COMMENT, PropertyType::String))
    }

    fn item_property_count(&self) -> u32 {
        self.item_props().len() as u32
    }

    fn item_property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)> {
        self.item_props().get(index as usize).copied()
    }

    fn string_property(&self, id: PropertyId) -> Option<String> {
        (id == PropertyId::COMMENT).then(|| self.comment.clone()).flatten()
    }

    fn bool_property(&self, _: PropertyId) -> Option<bool> {
        None
    }

    fn u32_property(&self, _: PropertyId) -> Option<u32> {
        None
    }

    fn u64_property(&self, id: PropertyId) -> Option<u64> {
        (id == PropertyId::PHY_SIZE).then(|| self.items.iter().map(|i| i.data.len() as u64).sum())
    }

    fn time_property(&self, _: PropertyId) -> Option<u32> {
        None
    }

    fn string_item_property(&self, item: u32, id: PropertyId) -> Option<String> {
        let entry = self.get(item)?;
        (id == PropertyId::PATH).then(|| entry.path.clone())
    }

    fn bool_item_property(&self, item: u32, id: PropertyId) -> Option<bool> {
        let entry = self.get(item)?;
        (id == PropertyId::IS_DIR).then_some(entry.is_dir)
    }

    fn u32_item_property(&self, item: u32, id: PropertyId) -> Option<u32> {
        let entry = self.get(item)?;
        match id {
            PropertyId::SIZE if entry.size_via_u32 => Some(entry.data.len() as u32),
            PropertyId::ATTRIB => entry.attributes,
            PropertyId::POSIX_ATTRIB => entry.posix_mode,
            _ => None,
        }
    }

    fn u64_item_property(&self, item: u32, id: PropertyId) -> Option<u64> {
        let entry = self.get(item)?;
        match id {
            PropertyId::SIZE if !entry.size_via_u32 => Some(entry.data.len() as u64),
            _ => None,
        }
    }

    fn time_item_property(&self, item: u32, id: PropertyId) -> Option<u32> {
        let entry = self.get(item)?;
        match id {
            PropertyId::MTIME => entry.mtime,
            _ => None,
        }
    }

    fn set_threads(&mut self, threads: Threads) -> Result<()> {
        self.log.borrow_mut().threads.push(threads);
        Ok(())
    }

    fn extract(
        &mut self,
        output: &mut OutStream<'_>,
        password: Option<&str>,
        item: u32,
    ) -> Result<()> {
        self.log
            .borrow_mut()
            .passwords
            .push(password.map(str::to_owned));
        let entry = self
            .get(item)
            .ok_or_else(|| Error::codec("bad item index"))?;
        if let Some(expected) = &entry.password {
            if password != Some(expected.as_str()) {
                return Err(Error::codec("Wrong password"));
            }
        }
        match entry.fail_after {
            Some(n) => {
                output.write_all(&entry.data[..n.min(entry.data.len())])?;
                Err(Error::codec("Data error"))
            }
            None => {
                output.write_all(&entry.data)?;
                Ok(())
            }
        }
    }
}

struct MockWriter<'a> {
    output: OutStream<'a>,
    _source: InStream<'a>,
    log: Rc<RefCell<MockLog>>,
}

impl MockWriter<'_> {
    fn check(name: &str) -> Result<()> {
        if name.starts_with("bad") {
            Err(Error::codec(format!("unsupported property: {}", name)))
        } else {
            Ok(())
        }
    }
}

impl CodecWriter for MockWriter<'_> {
    fn set_int_property(&mut self, name: &str, value: i64) -> Result<()> {
        Self::check(name)?;
        self.log.borrow_mut().int_props.push((name.into(), value));
        Ok(())
    }

    fn set_bool_property(&mut self, name: &str, value: bool) -> Result<()> {
        Self::check(name)?;
        self.log.borrow_mut().bool_props.push((name.into(), value));
        Ok(())
    }

    fn set_string_property(&mut self, name: &str, value: &str) -> Result<()> {
        Self::check(name)?;
        self.log
            .borrow_mut()
            .string_props
            .push((name.into(), value.into()));
        Ok(())
    }

    fn add_item(&mut self, path: &str) -> Result<()> {
        self.log.borrow_mut().added.push(path.into());
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let added = self.log.borrow().added.join("\n");
        self.output.write_all(added.as_bytes())?;
        self.output.detach()?;
        self.log.borrow_mut().committed = true;
        Ok(())
    }
}

/// Builds a ZIP archive in memory from (path, data) pairs. Paths ending in
/// `/` become directories.
#[cfg(feature = "zip")]
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Writes [`zip_bytes`] to `dir/name` and returns the path.
#[cfg(feature = "zip")]
pub fn zip_file(dir: &std::path::Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, zip_bytes(entries)).unwrap();
    path
}

/// Reads an in-memory buffer back through a fresh handle.
pub fn cursor(bytes: Vec<u8>) -> Cursor<Vec<u8>> {
    Cursor::new(bytes)
}
