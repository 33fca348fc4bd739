//! Block decompression handling.

use std::io::{self, Read, Seek};

use binrw::{io::NoSeek, BinRead};
use flate2::read::ZlibDecoder;
use tracing::instrument;

use crate::error::Result;

/// Identifies the storage format used to compress a block inside the PAK file
///
/// The header names the method for the record and name blocks; each record additionally
/// names the method used for its own data block.
#[derive(BinRead, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[br(repr=u32)]
pub enum CompressionMethod {
    /// Stores the data as it is
    #[default]
    None = 0,

    /// Compress the data using Zlib
    Zlib = 2,
}

pub(crate) enum PakBlockReader<'a, R: Read + Seek> {
    Raw(io::Take<&'a mut R>),
    Compressed(Box<ZlibDecoder<io::Take<&'a mut R>>>),
}

impl<'a, R: Read + Seek> PakBlockReader<'a, R> {
    #[tracing::instrument(skip(reader))]
    pub fn new(
        reader: &'a mut R,
        start: u64,
        limit: u64,
        compression: CompressionMethod,
    ) -> Result<Self> {
        reader.seek(io::SeekFrom::Start(start))?;

        let limit_reader = reader.by_ref().take(limit);
        Ok(match compression {
            CompressionMethod::None => PakBlockReader::Raw(limit_reader),
            CompressionMethod::Zlib => {
                PakBlockReader::Compressed(Box::new(ZlibDecoder::new(limit_reader)))
            }
        })
    }
}

impl<R: Read + Seek> Seek for PakBlockReader<'_, R> {
    #[instrument(skip(self), err)]
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        match self {
            PakBlockReader::Raw(r) => NoSeek::new(r).seek(pos),
            PakBlockReader::Compressed(r) => NoSeek::new(r).seek(pos),
        }
    }
}

impl<R: Read + Seek> Read for PakBlockReader<'_, R> {
    #[instrument(skip(self), err)]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PakBlockReader::Raw(r) => r.read(buf),
            PakBlockReader::Compressed(r) => r.read(buf),
        }
    }

    #[instrument(skip(self), err)]
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match self {
            PakBlockReader::Raw(r) => r.read_exact(buf),
            PakBlockReader::Compressed(r) => r.read_exact(buf),
        }
    }

    #[instrument(skip(self), err)]
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        match self {
            PakBlockReader::Raw(r) => r.read_to_end(buf),
            PakBlockReader::Compressed(r) => r.read_to_end(buf),
        }
    }
}
