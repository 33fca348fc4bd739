//! Pattern-based enumeration over the union of packed entries and loose files.

use std::fs::ReadDir;

use glob::Pattern;

use crate::error::Result;
use crate::interface::PakInterface;
use pak_archive::FileTime;

/// One entry produced by a find session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub(crate) path: Box<str>,
    pub(crate) size: u64,
    pub(crate) packed: bool,
    pub(crate) file_time: Option<FileTime>,
}

impl FoundFile {
    /// Full path of the entry, virtual for packed entries and real for loose files.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path component of the entry.
    pub fn name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.path)
    }

    /// Logical size of the entry in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the entry comes from a loaded archive rather than the filesystem.
    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// The packer-supplied file time, present only for packed entries.
    pub fn file_time(&self) -> Option<FileTime> {
        self.file_time
    }
}

/// Splits a pattern into its literal parent directory and its final component.
///
/// The disk side of a search only lists a single literal directory; a pattern
/// without a separator searches the current directory.
fn split_pattern(pattern: &str) -> (Option<&str>, &str) {
    match pattern.rfind(['/', '\\']) {
        Some(index) => (Some(&pattern[..index]), &pattern[index + 1..]),
        None => (None, pattern),
    }
}

/// State for one find-first/find-next session.
///
/// The catalog side is cursored by the last path served, the disk side holds the
/// live directory iterator. Dropping the handle ends the session.
#[derive(Debug)]
pub struct FindHandle {
    pub(crate) pattern: Pattern,
    pub(crate) cursor: Option<Box<str>>,
    pub(crate) catalog_done: bool,
    name_pattern: Pattern,
    dir: Option<Box<str>>,
    disk: Option<ReadDir>,
}

impl FindHandle {
    pub(crate) fn new(pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern)?;
        let (dir, name) = split_pattern(pattern);
        let name_pattern = Pattern::new(name)?;

        // A missing or unlistable directory just means the loose-file side of the
        // union is empty.
        let disk = std::fs::read_dir(dir.unwrap_or(".")).ok();

        Ok(Self {
            pattern: compiled,
            cursor: None,
            catalog_done: false,
            name_pattern,
            dir: dir.map(Into::into),
            disk,
        })
    }

    /// The next matching loose file, once the catalog side is exhausted.
    pub(crate) fn next_disk(&mut self) -> Option<FoundFile> {
        let iter = self.disk.as_mut()?;

        for entry in iter {
            let Ok(entry) = entry else { continue };
            let Ok(kind) = entry.file_type() else { continue };
            if kind.is_dir() {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !self.name_pattern.matches(name) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let path = match &self.dir {
                Some(dir) => format!("{dir}/{name}"),
                None => name.to_owned(),
            };

            return Some(FoundFile {
                path: path.into(),
                size,
                packed: false,
                file_time: None,
            });
        }

        self.disk = None;
        None
    }
}

/// Iterator adapter over a find session.
///
/// Yields the entry returned by find-first followed by every find-next result; the
/// session closes when the iterator is dropped.
pub struct Find<'a> {
    interface: &'a PakInterface,
    handle: FindHandle,
    pending: Option<FoundFile>,
}

impl<'a> Find<'a> {
    pub(crate) fn new(
        interface: &'a PakInterface,
        handle: FindHandle,
        pending: Option<FoundFile>,
    ) -> Self {
        Self {
            interface,
            handle,
            pending,
        }
    }
}

impl<'a> Iterator for Find<'a> {
    type Item = FoundFile;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pending.take() {
            Some(entry) => Some(entry),
            None => self.interface.find_next(&mut self.handle),
        }
    }
}
