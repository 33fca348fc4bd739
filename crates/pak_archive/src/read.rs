//! Types for reading PAK containers
//!

use binrw::BinRead;
use byteorder::ReadBytesExt;
use crc::{Crc, CRC_32_BZIP2};
use indexmap::IndexMap;
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{Read, Seek},
    sync::Arc,
};
use tracing::warn;

use crate::{
    compression::{CompressionMethod, PakBlockReader},
    error::{EntryNotFoundError, Error, Result},
    types::{FileTime, PakHeader, PakRecord},
};

/// A struct for reading an entry from a PAK file
pub struct PakEntry<'a, R: Read + Seek> {
    data: Cow<'a, PakEntryData>,
    reader: PakBlockReader<'a, R>,
}

impl<'a, R: Read + Seek> Debug for PakEntry<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PakEntry({:#?})", self.get_metadata())
    }
}

/// Methods for retrieving information on PAK file entries
impl<'a, R: Read + Seek> PakEntry<'a, R> {
    /// Get the name of the entry
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`). Carelessly writing to these paths
    /// allows an attacker to craft a PAK archive that will overwrite critical
    /// files.
    ///
    pub fn name(&self) -> &str {
        &self.get_metadata().file_name
    }

    /// Get the name of the entry, in the raw (internal) byte representation.
    ///
    /// The encoding of this data is currently undefined.
    pub fn name_raw(&self) -> &[u8] {
        &self.get_metadata().file_name_raw
    }

    /// Get the size of the entry, in bytes, in the archive
    pub fn compressed_size(&self) -> u64 {
        self.get_metadata().compressed_size
    }

    /// Get the size of the entry, in bytes, when uncompressed
    pub fn size(&self) -> u64 {
        self.get_metadata().uncompressed_size
    }

    /// Get the packer-supplied file time of the entry
    pub fn file_time(&self) -> FileTime {
        self.get_metadata().file_time
    }

    /// Get the CRC32 hash of the entry's name
    pub fn checksum(&self) -> u32 {
        self.get_metadata().checksum
    }

    /// Get the starting offset of the data of the entry
    pub fn data_start(&self) -> u64 {
        self.get_metadata().data_start
    }

    /// Get the compression method used for this entry
    pub fn compression_method(&self) -> CompressionMethod {
        self.get_metadata().compression_method
    }

    fn get_metadata(&self) -> &PakEntryData {
        self.data.as_ref()
    }
}

impl<R: Read + Seek> Read for PakEntry<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Structure representing a PAK file entry.
#[derive(Debug, Clone, Default)]
pub struct PakEntryData {
    /// CRC32 checksum of the entry's name
    pub checksum: u32,
    /// Method of compressing the entry in the pak
    pub compression_method: CompressionMethod,
    /// Size of the entry in the pak
    pub compressed_size: u64,
    /// Size of the entry when extracted
    pub uncompressed_size: u64,
    /// The packer-supplied file time
    pub file_time: FileTime,
    /// Name of the entry
    pub file_name: Box<str>,
    /// Raw entry name. To be used when file_name was incorrectly decoded.
    pub file_name_raw: Box<[u8]>,
    /// Specifies where the data of the entry starts
    pub data_start: u64,
}

impl PakEntryData {
    /// Whether the stored name checksum matches the raw name bytes.
    ///
    /// A zero checksum means the packer never stamped one and is not checked.
    pub fn name_checksum_ok(&self) -> bool {
        self.checksum == 0
            || Crc::<u32>::new(&CRC_32_BZIP2).checksum(&self.file_name_raw) == self.checksum
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    header: PakHeader,
    entries: IndexMap<Box<str>, PakEntryData>,
}

/// PAK container reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_pak_contents(reader: impl Read + Seek) -> pak_archive::error::Result<()> {
///     let mut pak = pak_archive::PakArchive::new(reader)?;
///
///     for i in 0..pak.len() {
///         let mut entry = pak.by_index(i)?;
///         println!("Entry: {}", entry.name());
///         std::io::copy(&mut entry, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct PakArchive<R> {
    reader: R,
    shared: Arc<Shared>,
}

impl<R> PakArchive<R> {
    /// Total size of the entries in the archive, if it can be known. Doesn't include
    /// metadata.
    pub fn total_size(&self) -> Option<u128> {
        let mut total = 0u128;
        for entry in self.shared.entries.values() {
            total = total.checked_add(entry.uncompressed_size as u128)?;
        }
        Some(total)
    }
}

impl<R: Read + Seek> PakArchive<R> {
    /// Read a PAK container collecting the entries it contains.
    ///
    /// Parsing is all-or-nothing: a malformed header or a truncated record or name
    /// table fails the whole read and nothing is kept.
    pub fn new(mut reader: R) -> Result<PakArchive<R>> {
        if let Ok(shared) = Self::get_metadata(&mut reader) {
            return Ok(PakArchive {
                reader,
                shared: shared.into(),
            });
        }

        Err(Error::InvalidArchive)
    }

    /// Number of entries contained in this PAK.
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    /// Whether this PAK container holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all the entry names in this archive, in file order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.shared.entries.keys().map(|s| s.as_ref())
    }

    /// Returns an iterator over the metadata of every entry, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PakEntryData)> {
        self.shared
            .entries
            .iter()
            .map(|(name, data)| (name.as_ref(), data))
    }

    /// Returns how the record block was compressed.
    pub fn get_record_compression(&self) -> CompressionMethod {
        self.shared.header.record_compression
    }

    /// Returns how the name block was compressed.
    pub fn get_name_compression(&self) -> CompressionMethod {
        self.shared.header.name_compression
    }

    /// Get the index of an entry by name, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.entries.get_index_of(name)
    }

    /// Get the name of an entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared
            .entries
            .get_index(index)
            .map(|(name, _)| name.as_ref())
    }

    /// Search for an entry by name
    pub fn by_name(&mut self, name: &str) -> Result<PakEntry<'_, R>> {
        let Some(index) = self.shared.entries.get_index_of(name) else {
            return Err(Error::EntryNotFound(EntryNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained entry by index
    pub fn by_index(&mut self, entry_number: usize) -> Result<PakEntry<'_, R>> {
        let (_, data) = self
            .shared
            .entries
            .get_index(entry_number)
            .ok_or(Error::EntryNotFound(EntryNotFoundError::Index(entry_number)))?;

        Ok(PakEntry {
            data: Cow::Borrowed(data),
            reader: PakBlockReader::new(
                &mut self.reader,
                data.data_start,
                data.compressed_size,
                data.compression_method,
            )?,
        })
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn get_records(reader: &mut R, header: &PakHeader) -> Result<Vec<PakRecord>> {
        let mut record_reader = PakBlockReader::new(
            reader,
            header.record_start as u64,
            header.record_compressed as u64,
            header.record_compression,
        )?;

        (0..header.records)
            .map(|_| PakRecord::read(&mut record_reader).map_err(Error::from))
            .collect()
    }

    fn get_names(reader: &mut R, header: &PakHeader) -> Result<Vec<Vec<u8>>> {
        let mut name_reader = PakBlockReader::new(
            reader,
            (header.record_start + header.record_compressed) as u64,
            header.name_compressed as u64,
            header.name_compression,
        )?;

        (0..header.records)
            .map(|_| {
                let mut name_raw: Vec<u8> = Vec::new();
                loop {
                    let char = name_reader.read_u8()?;
                    if char == b'\0' {
                        break;
                    }
                    name_raw.push(char);
                }
                Ok(name_raw)
            })
            .collect()
    }

    fn get_metadata(reader: &mut R) -> Result<Shared> {
        let header = PakHeader::read(reader)?;
        let records = Self::get_records(reader, &header)?;
        let names = Self::get_names(reader, &header)?;

        let mut index_map = IndexMap::with_capacity(header.records as usize);
        records.into_iter().zip(names).for_each(|(r, n)| {
            let entry = PakEntryData {
                checksum: r.checksum,
                compression_method: r.data_compression,
                compressed_size: r.data_compressed as u64,
                uncompressed_size: r.data_uncompressed as u64,
                file_time: r.file_time,
                data_start: r.data_offset as u64,
                file_name: String::from_utf8_lossy(&n).into(),
                file_name_raw: n.into(),
            };
            if !entry.name_checksum_ok() {
                warn!("name checksum mismatch for {}", entry.file_name);
            }
            index_map.insert(entry.file_name.clone(), entry);
        });

        Ok(Shared {
            header,
            entries: index_map,
        })
    }
}
