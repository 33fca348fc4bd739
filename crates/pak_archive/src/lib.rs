//! This library handles reading **PAK** archive containers.
//!
//! # PAK Container Format Documentation
//!
//! This crate provides utilities to read and extract data from the **PAK** container format.
//! A PAK container is a single packed file holding many named entries plus a metadata table
//! describing each entry's offset, size, compression and file time. PAK files are typically
//! identified with the `.pak` extension.
//!
//! ## File Structure
//!
//! A PAK file consists of a header, followed by the data blocks, a metadata block for records,
//! and a name block.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x4B434150 ("PACK")                               |
//! | 0x0004         | Version                | 4 bytes: Fixed value "0001"                                |
//! | 0x0008         | Record Count           | 4 bytes: Number of records in the container                |
//! | 0x000C         | Record Offset          | 4 bytes: Offset to the record metadata block               |
//! | 0x0010         | Record Compression     | 4 bytes: Compression method for the record block           |
//! | 0x0014         | Record Comp. Size      | 4 bytes: Compressed size of the record block               |
//! | 0x0018         | Name Compression      | 4 bytes: Compression method for the name block             |
//! | 0x001C         | Name Comp. Size        | 4 bytes: Compressed size of the name block                 |
//! | 0x0020         | Name Uncomp. Size      | 4 bytes: Uncompressed size of the name block               |
//!
//! ### Header
//!
//! - **Magic Number**: A 4-byte identifier set to the ASCII code for "PACK". This helps
//!   identify the file type.
//! - **Version**: A 4-byte version marker, fixed at "0001".
//! - **Record Count**: A 4-byte unsigned integer indicating the number of records stored.
//! - **Record Block Offset**: A 4-byte unsigned integer specifying the offset to the start of
//!   the record metadata block from the beginning of the file.
//! - **Record Block Compression**: A 4-byte unsigned integer indicating the compression method
//!   used for the entire record metadata block. Possible values are:
//!   - `0`: None (no compression)
//!   - `2`: Zlib (compressed with Zlib)
//! - **Record Block Compressed Size**: A 4-byte unsigned integer representing the compressed
//!   size of the record metadata block, if compression is applied.
//! - **Name Block Compression**: A 4-byte unsigned integer indicating the compression method
//!   for the entire name block.
//! - **Name Block Compressed Size**: A 4-byte unsigned integer for the compressed size of the
//!   name block, if compression is applied.
//! - **Name Block Uncompressed Size**: A 4-byte unsigned integer specifying the uncompressed
//!   size of the name block.
//!
//! ### Data Blocks
//!
//! After the header, the PAK file contains the actual data blocks for each record. These
//! blocks are stored sequentially and each may be compressed depending on the compression
//! method recorded for its entry.
//!
//! ### Record Metadata Block
//!
//! The record metadata block contains entries describing each file stored in the container.
//! The entire block may be compressed depending on the **Record Block Compression** method in
//! the header. Each record has the following structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Name CRC32             | 4 bytes: CRC-32 checksum of the record's name           |
//! | 0x0004         | Uncompressed Size      | 4 bytes: Size of the data when uncompressed             |
//! | 0x0008         | Data Offset            | 4 bytes: Offset to the record data from start of file   |
//! | 0x000C         | Compression            | 4 bytes: Compression method for the record data         |
//! | 0x0010         | Compressed Size        | 4 bytes: Compressed size of the record data             |
//! | 0x0014         | File Time (low)        | 4 bytes: Low half of the packer-supplied file time      |
//! | 0x0018         | File Time (high)       | 4 bytes: High half of the packer-supplied file time     |
//! | 0x001C         | Name Offset            | 4 bytes: Offset to the name within the name block       |
//!
//! The file time halves are copied verbatim from whatever tool packed the container. A record
//! whose halves are both zero was never stamped by the packer; consumers layering a virtual
//! filesystem over PAK containers treat such records as unsafe to serve.
//!
//! ### Name Block
//!
//! The name block stores the paths associated with each record, stored sequentially as UTF-8
//! strings, each ending with a null terminator. The entire block may be compressed depending
//! on the **Name Block Compression** method in the header. The name offsets in the record
//! metadata point to positions within this block.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.pak`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression Methods**:
//!   - `0`: None (no compression)
//!   - `2`: Zlib (compressed with Zlib)
//!

pub mod compression;
pub mod error;
pub mod read;
pub mod types;

pub use compression::CompressionMethod;
pub use read::PakArchive;
pub use types::FileTime;
