//! Assembles PAK container bytes for the integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::{write::ZlibEncoder, Compression};

/// One entry to place into a generated container.
pub struct EntrySpec {
    pub name: String,
    pub data: Vec<u8>,
    pub compressed: bool,
    pub file_time: (u32, u32),
}

impl EntrySpec {
    /// An uncompressed entry with a valid file time.
    pub fn stamped(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            compressed: false,
            file_time: (1, 1),
        }
    }

    /// A zlib-compressed entry with a valid file time.
    pub fn compressed(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            compressed: true,
            ..Self::stamped(name, data)
        }
    }

    /// An entry whose file time was never stamped by the packer.
    pub fn unstamped(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_time: (0, 0),
            ..Self::stamped(name, data)
        }
    }
}

/// Build the bytes of a PAK container holding the given entries.
pub fn build_pak(entries: &[EntrySpec]) -> Vec<u8> {
    let mut data_block = Vec::new();
    let mut record_block = Vec::new();
    let mut name_block = Vec::new();

    for entry in entries {
        let name_offset = name_block.len() as u32;
        name_block.extend_from_slice(entry.name.as_bytes());
        name_block.push(0);

        let stored = if entry.compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&entry.data).unwrap();
            encoder.finish().unwrap()
        } else {
            entry.data.clone()
        };

        let data_offset = 36 + data_block.len() as u32;
        record_block.write_u32::<LittleEndian>(0).unwrap();
        record_block
            .write_u32::<LittleEndian>(entry.data.len() as u32)
            .unwrap();
        record_block.write_u32::<LittleEndian>(data_offset).unwrap();
        record_block
            .write_u32::<LittleEndian>(if entry.compressed { 2 } else { 0 })
            .unwrap();
        record_block
            .write_u32::<LittleEndian>(stored.len() as u32)
            .unwrap();
        record_block
            .write_u32::<LittleEndian>(entry.file_time.0)
            .unwrap();
        record_block
            .write_u32::<LittleEndian>(entry.file_time.1)
            .unwrap();
        record_block.write_u32::<LittleEndian>(name_offset).unwrap();

        data_block.extend_from_slice(&stored);
    }

    let mut pak = Vec::new();
    pak.extend_from_slice(b"PACK0001");
    pak.write_u32::<LittleEndian>(entries.len() as u32).unwrap();
    pak.write_u32::<LittleEndian>(36 + data_block.len() as u32)
        .unwrap();
    pak.write_u32::<LittleEndian>(0).unwrap();
    pak.write_u32::<LittleEndian>(record_block.len() as u32)
        .unwrap();
    pak.write_u32::<LittleEndian>(0).unwrap();
    pak.write_u32::<LittleEndian>(name_block.len() as u32)
        .unwrap();
    pak.write_u32::<LittleEndian>(name_block.len() as u32)
        .unwrap();

    pak.extend(data_block);
    pak.extend(record_block);
    pak.extend(name_block);

    pak
}

/// Write a generated container into `dir` and return its path.
pub fn write_pak(dir: &Path, file_name: &str, entries: &[EntrySpec]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, build_pak(entries)).unwrap();
    path
}
