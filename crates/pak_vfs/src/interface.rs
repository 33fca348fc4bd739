//! Interface instances tying the catalog, loader, handles and enumeration together.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use bon::Builder;
use flate2::read::ZlibDecoder;
use tracing::{debug, instrument};

use crate::catalog::{CatalogRecord, ConflictPolicy, RecordCatalog};
use crate::error::{Error, Result};
use crate::find::{Find, FindHandle, FoundFile};
use crate::handle::{OpenMode, PakFileHandle};
use pak_archive::{CompressionMethod, PakArchive};

/// Options for how an interface resolves and serves records
#[derive(Debug, Clone, Copy, Builder)]
pub struct PakOptions {
    /// The policy applied when two archives define the same virtual path
    #[builder(default)]
    pub conflict_policy: ConflictPolicy,
}

impl Default for PakOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Outcome of a two-phase path listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// Every currently valid path was written to the caller's buffer
    Filled {
        /// Number of slots written
        count: usize,
    },

    /// The buffer was absent or too small to hold every valid path
    NeedsCapacity {
        /// Exact number of slots a successful call requires
        required: usize,
    },
}

impl ListOutcome {
    /// Whether the call wrote the caller's buffer.
    pub const fn is_filled(&self) -> bool {
        matches!(self, ListOutcome::Filled { .. })
    }
}

/// A virtual filesystem over a set of PAK archives and the real filesystem.
///
/// Archives are loaded into a path-indexed record catalog; opens consult the
/// catalog first and fall back to the real filesystem, and enumeration merges
/// both sources behind one cursor.
///
/// An interface is synchronous and is not internally locked: loading archives
/// takes `&mut self`, which keeps loads from racing in-flight reads on the same
/// instance by construction.
///
/// ```no_run
/// use std::io::Read;
///
/// fn dump(path: &str) -> pak_vfs::error::Result<()> {
///     let mut vfs = pak_vfs::PakInterface::new();
///     vfs.add_pak_file("assets.pak")?;
///
///     let mut entry = vfs.open(path, "rb")?;
///     let mut data = Vec::new();
///     entry.read_to_end(&mut data)?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct PakInterface {
    options: PakOptions,
    archives: Vec<PathBuf>,
    catalog: RecordCatalog,
}

impl PakInterface {
    /// Create an empty interface with default options.
    pub fn new() -> Self {
        Self::with_options(PakOptions::default())
    }

    /// Create an empty interface with the given options.
    pub fn with_options(options: PakOptions) -> Self {
        Self {
            options,
            archives: Vec::new(),
            catalog: RecordCatalog::default(),
        }
    }

    /// The paths of every archive loaded so far, in load order.
    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }

    /// Load a PAK archive and merge its records into the catalog.
    ///
    /// Loading is all-or-nothing: the container is parsed completely before the
    /// first record is merged, so a malformed archive leaves the catalog unchanged.
    /// Records sharing a path with an earlier load are resolved per the interface's
    /// conflict policy.
    #[instrument(skip_all, err)]
    pub fn add_pak_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let archive = PakArchive::new(file)?;

        let index = self.archives.len();
        let records: Vec<(Box<str>, CatalogRecord)> = archive
            .entries()
            .map(|(name, data)| {
                (
                    name.into(),
                    CatalogRecord {
                        archive: index,
                        offset: data.data_start,
                        size: data.uncompressed_size,
                        compressed_size: data.compressed_size,
                        compression: data.compression_method,
                        file_time: data.file_time,
                        checksum: data.checksum,
                    },
                )
            })
            .collect();

        debug!("merging {} records from {}", records.len(), path.display());

        self.catalog.merge(records, self.options.conflict_policy);
        self.archives.push(path.to_path_buf());

        Ok(())
    }

    /// The catalog record for a virtual path, if a valid one exists.
    pub fn record(&self, path: &str) -> Option<&CatalogRecord> {
        self.catalog.lookup(path)
    }

    /// Open a file by virtual path.
    ///
    /// A valid catalog record wins over the filesystem; such opens are restricted
    /// to read access and stream from the owning archive, decoding compressed
    /// payloads transparently. Paths without a valid record are opened on the real
    /// filesystem with the caller's mode verbatim.
    pub fn open(&self, path: &str, mode: &str) -> Result<PakFileHandle> {
        let mode = OpenMode::from_str(mode)?;

        if let Some(record) = self.catalog.lookup(path) {
            if !mode.is_read_only() {
                return Err(Error::WriteNotSupported(path.to_owned()));
            }
            return self.open_record(record);
        }

        debug!("no packed record for {path}, trying the filesystem");
        let file = mode.open_options().open(path)?;
        let len = file.metadata()?.len();
        Ok(PakFileHandle::loose(file, len))
    }

    fn open_record(&self, record: &CatalogRecord) -> Result<PakFileHandle> {
        let mut file = File::open(&self.archives[record.archive])?;

        match record.compression {
            CompressionMethod::None => {
                Ok(PakFileHandle::packed(file, record.offset, record.size))
            }
            CompressionMethod::Zlib => {
                file.seek(SeekFrom::Start(record.offset))?;
                let mut decoder = ZlibDecoder::new(file.take(record.compressed_size));
                let mut data = Vec::with_capacity(record.size as usize);
                decoder.read_to_end(&mut data)?;
                Ok(PakFileHandle::decoded(data))
            }
        }
    }

    /// Start a find session for a pattern, returning the session handle and the
    /// first entry, or `None` when neither the catalog nor the directory matches.
    pub fn find_first(&self, pattern: &str) -> Result<Option<(FindHandle, FoundFile)>> {
        let mut handle = FindHandle::new(pattern)?;

        match self.find_next(&mut handle) {
            Some(entry) => Ok(Some((handle, entry))),
            None => Ok(None),
        }
    }

    /// Advance a find session, returning the next entry until both the catalog and
    /// the directory side are exhausted. An exhausted session keeps reporting
    /// exhaustion.
    pub fn find_next(&self, handle: &mut FindHandle) -> Option<FoundFile> {
        while !handle.catalog_done {
            let Some((path, record)) = self.catalog.next_valid_after(handle.cursor.as_deref())
            else {
                handle.catalog_done = true;
                break;
            };

            let entry = handle.pattern.matches(path).then(|| FoundFile {
                path: path.into(),
                size: record.size,
                packed: true,
                file_time: Some(record.file_time),
            });

            handle.cursor = Some(path.into());
            if let Some(entry) = entry {
                return Some(entry);
            }
        }

        handle.next_disk()
    }

    /// Close a find session.
    ///
    /// Dropping the handle is equivalent; this exists for callers mirroring the
    /// find-first/find-next/find-close protocol.
    pub fn find_close(&self, handle: FindHandle) {
        drop(handle);
    }

    /// Run a find session as an iterator.
    pub fn find(&self, pattern: &str) -> Result<Find<'_>> {
        let mut handle = FindHandle::new(pattern)?;
        let first = self.find_next(&mut handle);

        Ok(Find::new(self, handle, first))
    }

    /// Every currently valid virtual path, in catalog order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.catalog.valid_paths()
    }

    /// Snapshot every currently valid virtual path into a caller-supplied buffer.
    ///
    /// Two-phase protocol: call with `None` to learn the required capacity, then
    /// call again with a buffer of at least that many slots. An undersized buffer
    /// fails without writing anything and reports the required capacity again.
    ///
    /// The returned `&str` values borrow catalog-owned storage and stay valid for
    /// as long as the interface lives; the order is catalog key order and is stable
    /// across calls absent intervening archive loads.
    pub fn list_all_file_paths<'a>(&'a self, buffer: Option<&mut [&'a str]>) -> ListOutcome {
        let required = self.catalog.valid_len();

        let Some(buffer) = buffer else {
            return ListOutcome::NeedsCapacity { required };
        };

        if buffer.len() < required {
            return ListOutcome::NeedsCapacity { required };
        }

        for (slot, path) in buffer.iter_mut().zip(self.catalog.valid_paths()) {
            *slot = path;
        }

        ListOutcome::Filled { count: required }
    }
}

static GLOBAL: OnceLock<Mutex<PakInterface>> = OnceLock::new();

/// The process-wide shared interface.
///
/// Constructed lazily on first access and torn down only at process exit.
/// Locally constructed interfaces share no state with it; the mutex exists so the
/// instance is sound to reach from any thread, not to make concurrent use on one
/// instance a supported pattern.
pub fn global_interface() -> &'static Mutex<PakInterface> {
    GLOBAL.get_or_init(|| Mutex::new(PakInterface::new()))
}
