//! The path-indexed record catalog aggregated across loaded archives.

use std::collections::BTreeMap;
use std::ops::Bound;

use pak_archive::{CompressionMethod, FileTime};

/// How the catalog resolves two archives defining the same virtual path.
///
/// Which tie-break a deployment expects depends on how its archives were
/// produced, so the policy is chosen at interface construction rather than
/// hard-coded.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// The record from the archive loaded last is served
    #[default]
    LastWins,

    /// The record from the archive loaded first is kept
    FirstWins,
}

/// One catalog entry describing where a packed payload lives.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// Index of the owning archive in the interface's archive table
    pub(crate) archive: usize,

    /// Offset of the payload inside the owning archive
    pub offset: u64,

    /// Size of the payload when uncompressed
    pub size: u64,

    /// Size of the payload as stored
    pub compressed_size: u64,

    /// How the payload is stored
    pub compression: CompressionMethod,

    /// The packer-supplied file time
    pub file_time: FileTime,

    /// CRC32 of the entry name as recorded by the packer
    pub checksum: u32,
}

impl CatalogRecord {
    /// Whether this record is safe to surface to callers.
    ///
    /// A record without a packer-supplied file time is indistinguishable from one the
    /// packer never finished writing, so it is treated as absent at every consuming
    /// operation (open, enumeration, listing).
    pub fn is_valid(&self) -> bool {
        self.file_time.is_valid()
    }
}

/// Mapping from virtual path to record metadata, unique keys, iterated in
/// lexicographic key order. Records are never removed once merged.
#[derive(Debug, Default)]
pub(crate) struct RecordCatalog {
    records: BTreeMap<Box<str>, CatalogRecord>,
}

impl RecordCatalog {
    /// The record for `path`, if one exists and passes the validity gate.
    pub fn lookup(&self, path: &str) -> Option<&CatalogRecord> {
        self.records.get(path).filter(|r| r.is_valid())
    }

    /// Insert records keyed by path, resolving conflicts per `policy`.
    pub fn merge(
        &mut self,
        records: impl IntoIterator<Item = (Box<str>, CatalogRecord)>,
        policy: ConflictPolicy,
    ) {
        for (path, record) in records {
            match policy {
                ConflictPolicy::LastWins => {
                    self.records.insert(path, record);
                }
                ConflictPolicy::FirstWins => {
                    self.records.entry(path).or_insert(record);
                }
            }
        }
    }

    /// Number of records that pass the validity gate.
    pub fn valid_len(&self) -> usize {
        self.records.values().filter(|r| r.is_valid()).count()
    }

    /// Every valid path, in key order.
    pub fn valid_paths(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|(_, record)| record.is_valid())
            .map(|(path, _)| path.as_ref())
    }

    /// The first valid record strictly after `cursor`, in key order.
    ///
    /// Cursoring by key instead of holding an iterator keeps search handles free of
    /// borrows into the catalog.
    pub fn next_valid_after(&self, cursor: Option<&str>) -> Option<(&str, &CatalogRecord)> {
        let start = match cursor {
            Some(last) => Bound::Excluded(last),
            None => Bound::Unbounded,
        };

        self.records
            .range::<str, _>((start, Bound::Unbounded))
            .find(|(_, record)| record.is_valid())
            .map(|(path, record)| (path.as_ref(), record))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CatalogRecord, ConflictPolicy, RecordCatalog};
    use pak_archive::FileTime;

    fn record(archive: usize, time: (u32, u32)) -> CatalogRecord {
        CatalogRecord {
            archive,
            offset: 36,
            size: 16,
            compressed_size: 16,
            compression: Default::default(),
            file_time: FileTime::new(time.0, time.1),
            checksum: 0,
        }
    }

    #[test]
    fn lookup_hides_records_without_file_time() {
        let mut catalog = RecordCatalog::default();
        catalog.merge(
            [
                ("stamped.txt".into(), record(0, (1, 1))),
                ("unstamped.txt".into(), record(0, (0, 0))),
            ],
            ConflictPolicy::LastWins,
        );

        assert!(catalog.lookup("stamped.txt").is_some());
        assert!(catalog.lookup("unstamped.txt").is_none());
        assert!(catalog.lookup("missing.txt").is_none());
        assert_eq!(catalog.valid_len(), 1);
    }

    #[test]
    fn last_wins_replaces_earlier_records() {
        let mut catalog = RecordCatalog::default();
        catalog.merge([("a.txt".into(), record(0, (1, 1)))], ConflictPolicy::LastWins);
        catalog.merge([("a.txt".into(), record(1, (1, 1)))], ConflictPolicy::LastWins);

        assert_eq!(catalog.lookup("a.txt").unwrap().archive, 1);
    }

    #[test]
    fn first_wins_keeps_earlier_records() {
        let mut catalog = RecordCatalog::default();
        catalog.merge([("a.txt".into(), record(0, (1, 1)))], ConflictPolicy::FirstWins);
        catalog.merge([("a.txt".into(), record(1, (1, 1)))], ConflictPolicy::FirstWins);

        assert_eq!(catalog.lookup("a.txt").unwrap().archive, 0);
    }

    #[test]
    fn paths_iterate_in_key_order() {
        let mut catalog = RecordCatalog::default();
        catalog.merge(
            [
                ("b/two.txt".into(), record(0, (1, 1))),
                ("a/one.txt".into(), record(0, (1, 1))),
                ("c/three.txt".into(), record(0, (0, 0))),
            ],
            ConflictPolicy::LastWins,
        );

        assert_eq!(
            catalog.valid_paths().collect::<Vec<_>>(),
            vec!["a/one.txt", "b/two.txt"]
        );
    }

    #[test]
    fn cursor_scan_skips_invalid_records() {
        let mut catalog = RecordCatalog::default();
        catalog.merge(
            [
                ("a.txt".into(), record(0, (1, 1))),
                ("b.txt".into(), record(0, (0, 0))),
                ("c.txt".into(), record(0, (1, 1))),
            ],
            ConflictPolicy::LastWins,
        );

        let (first, _) = catalog.next_valid_after(None).unwrap();
        assert_eq!(first, "a.txt");

        let (second, _) = catalog.next_valid_after(Some("a.txt")).unwrap();
        assert_eq!(second, "c.txt");

        assert!(catalog.next_valid_after(Some("c.txt")).is_none());
    }
}
