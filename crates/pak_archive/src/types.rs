//! Base types for the structure of a PAK container.

use crate::compression::CompressionMethod;
use binrw::BinRead;

/// PAK container header
///
/// Defines the header of the PAK file which always starts with "PACK" and then a version
/// (in this case "0001"). All data is stored in little endian format
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(magic = b"PACK0001", little)]
pub struct PakHeader {
    /// The number of records stored in the file
    pub records: u32,

    /// The offset from the beginning of the file where the record metadata starts
    pub record_start: u32,

    /// The compression type used for compressing the record metadata block
    pub record_compression: CompressionMethod,

    /// The size in the file for the compressed record metadata block
    pub record_compressed: u32,

    /// The compression type used for compressing the block of entry names
    pub name_compression: CompressionMethod,

    /// The size of the name block after compression
    pub name_compressed: u32,

    /// The size of the name block before compression
    #[allow(dead_code)]
    pub name_uncompressed: u32,
}

impl Default for PakHeader {
    fn default() -> Self {
        Self {
            records: Default::default(),
            record_start: 36,
            record_compression: Default::default(),
            record_compressed: Default::default(),
            name_compression: Default::default(),
            name_compressed: Default::default(),
            name_uncompressed: Default::default(),
        }
    }
}

/// A two-part file time stamped on a record by the packer.
///
/// The packer copies this value from the source file's metadata when the container is
/// built. A record whose halves are both zero was never stamped; such records are
/// considered unloaded and downstream consumers must not serve them.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct FileTime {
    /// Low half of the time value
    pub low: u32,

    /// High half of the time value
    pub high: u32,
}

impl FileTime {
    /// Create a file time from its two halves.
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Whether this file time marks a record safe to serve.
    ///
    /// Both halves must be non-zero. This is the single validity gate used everywhere a
    /// record is about to be surfaced.
    pub const fn is_valid(&self) -> bool {
        self.low != 0 && self.high != 0
    }
}

/// PAK file record
///
/// Defines an entry in the PAK file
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct PakRecord {
    /// A [`crc::CRC_32_BZIP2`] checksum of the record's name
    pub checksum: u32,

    /// The size of the data for this record before compression
    pub data_uncompressed: u32,

    /// The offset to the data for this record from the start of the file
    pub data_offset: u32,

    /// The compression type used to compress this record's data
    pub data_compression: CompressionMethod,

    /// The size of this record's data after compression
    pub data_compressed: u32,

    /// The packer-supplied file time for this record
    pub file_time: FileTime,

    /// The offset from the start of the name block for this record's name
    #[allow(dead_code)]
    pub name_offset: u32,
}
