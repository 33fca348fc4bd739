//! This library presents PAK archive entries and loose disk files through one
//! uniform, read-only file API.
//!
//! # Overview
//!
//! A [`PakInterface`] owns a path-indexed catalog of records aggregated across
//! every archive loaded into it. Opening a path consults the catalog first and
//! falls back to the real filesystem, so assets may live packed inside a
//! container or as loose override files without callers knowing which.
//! Pattern enumeration ([`PakInterface::find_first`] and friends) walks the
//! union of both sources behind a single cursor, and
//! [`PakInterface::list_all_file_paths`] snapshots every valid virtual path
//! through a two-phase capacity negotiation.
//!
//! Records carry a two-part file time stamped by the packer. A record whose
//! halves are both zero was never fully written; serving one is unsafe, so the
//! validity gate ([`pak_archive::FileTime::is_valid`]) hides such records from
//! every operation — lookup, open, enumeration and listing all treat them as
//! absent, and opens fall through to the real filesystem instead.
//!
//! Handles returned by [`PakInterface::open`] implement the classic stream
//! operations (seek/tell/read/eof) together with [`std::io::Read`] and
//! [`std::io::Seek`]; dropping a handle is the close operation.
//!
//! A process-wide default interface is available through
//! [`global_interface`]; it shares no state with locally constructed
//! instances.

pub mod catalog;
pub mod error;
pub mod find;
pub mod handle;
pub mod interface;

pub use catalog::{CatalogRecord, ConflictPolicy};
pub use find::{Find, FindHandle, FoundFile};
pub use handle::{OpenMode, PakFileHandle};
pub use interface::{global_interface, ListOutcome, PakInterface, PakOptions};

pub use pak_archive::{CompressionMethod, FileTime};
