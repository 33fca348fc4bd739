//! Logical file handles backed by a packed record or a loose disk file.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed `fopen`-style access mode.
///
/// The leading character selects the base mode (`r`, `w` or `a`); a `+` adds the
/// complementary access and `b` is accepted and ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OpenMode {
    read: bool,
    write: bool,
    append: bool,
    truncate: bool,
    create: bool,
}

impl OpenMode {
    /// Whether the mode requests read access only.
    ///
    /// Archive-backed paths can only be opened with such a mode.
    pub const fn is_read_only(&self) -> bool {
        self.read && !self.write
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.read)
            .write(self.write)
            .append(self.append)
            .truncate(self.truncate)
            .create(self.create);
        options
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<Self> {
        let mut chars = mode.chars();
        let mut parsed = match chars.next() {
            Some('r') => Self {
                read: true,
                write: false,
                append: false,
                truncate: false,
                create: false,
            },
            Some('w') => Self {
                read: false,
                write: true,
                append: false,
                truncate: true,
                create: true,
            },
            Some('a') => Self {
                read: false,
                write: true,
                append: true,
                truncate: false,
                create: true,
            },
            _ => return Err(Error::InvalidMode(mode.into())),
        };

        for c in chars {
            match c {
                'b' => {}
                '+' => {
                    parsed.read = true;
                    parsed.write = true;
                }
                _ => return Err(Error::InvalidMode(mode.into())),
            }
        }

        Ok(parsed)
    }
}

pub(crate) enum Backing {
    /// Raw packed payload, streamed from a dedicated handle on the archive file
    Packed { file: File, data_start: u64 },

    /// Compressed packed payload, decoded in full when the handle was opened
    Decoded { data: Box<[u8]> },

    /// Loose file on the real filesystem
    Loose { file: File },
}

/// One open stream over a packed record or a loose disk file.
///
/// The handle owns its backing resources; dropping it is the close operation, so a
/// handle cannot be closed twice. Positions are logical offsets from the start of
/// the entry, never physical archive offsets.
pub struct PakFileHandle {
    pos: u64,
    len: u64,
    backing: Backing,
}

impl PakFileHandle {
    pub(crate) fn packed(file: File, data_start: u64, size: u64) -> Self {
        Self {
            pos: 0,
            len: size,
            backing: Backing::Packed { file, data_start },
        }
    }

    pub(crate) fn decoded(data: Vec<u8>) -> Self {
        Self {
            pos: 0,
            len: data.len() as u64,
            backing: Backing::Decoded { data: data.into() },
        }
    }

    pub(crate) fn loose(file: File, len: u64) -> Self {
        Self {
            pos: 0,
            len,
            backing: Backing::Loose { file },
        }
    }

    /// Logical size of the entry or file behind this handle.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the backing entry or file is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this handle serves a packed record rather than a loose file.
    pub fn is_packed(&self) -> bool {
        !matches!(self.backing, Backing::Loose { .. })
    }

    /// Current position, relative to the start of the entry.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Whether the position has reached or passed the logical end.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.len
    }

    /// Move the position, returning the new one.
    ///
    /// Seeking past the end is permitted (a subsequent read returns nothing); a seek
    /// that would produce a negative position fails and leaves the position unchanged.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target: i128 = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.pos as i128 + delta as i128,
            SeekFrom::End(delta) => self.len as i128 + delta as i128,
        };

        if target < 0 {
            return Err(Error::InvalidSeek(target as i64));
        }

        self.pos = target as u64;
        Ok(self.pos)
    }

    /// Read up to `count` elements of `element_size` bytes into `out`, returning the
    /// number of complete elements read.
    ///
    /// A short count is the end-of-data signal, not an error; combine with
    /// [`PakFileHandle::is_eof`] to distinguish it from an empty read request.
    pub fn read_elements(
        &mut self,
        element_size: usize,
        count: usize,
        out: &mut [u8],
    ) -> Result<usize> {
        if element_size == 0 {
            return Ok(0);
        }

        let want = element_size.saturating_mul(count).min(out.len());
        let mut total = 0;
        while total < want {
            let n = self.read(&mut out[total..want])?;
            if n == 0 {
                break;
            }
            total += n;
        }

        Ok(total / element_size)
    }
}

impl Read for PakFileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match &mut self.backing {
            Backing::Packed { file, data_start } => {
                let remaining = self.len.saturating_sub(self.pos);
                if remaining == 0 {
                    return Ok(0);
                }
                let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
                file.seek(SeekFrom::Start(*data_start + self.pos))?;
                file.read(&mut buf[..want])?
            }
            Backing::Decoded { data } => {
                let start = self.pos.min(data.len() as u64) as usize;
                let mut slice = &data[start..];
                slice.read(buf)?
            }
            Backing::Loose { file } => {
                file.seek(SeekFrom::Start(self.pos))?;
                file.read(buf)?
            }
        };

        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for PakFileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        PakFileHandle::seek(self, pos)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
    }
}
