mod common;

use std::io::{Read, SeekFrom};

use pretty_assertions::assert_eq;
use tracing_test::traced_test;

use common::{write_pak, EntrySpec};
use pak_vfs::{global_interface, ConflictPolicy, ListOutcome, PakInterface, PakOptions};

#[test]
fn open_serves_packed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("images/logo.txt", "packed bytes")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let mut handle = vfs.open("images/logo.txt", "rb").unwrap();
    assert!(handle.is_packed());
    assert_eq!(handle.len(), 12);

    let mut data = Vec::new();
    handle.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"packed bytes");
}

#[test]
fn open_decodes_compressed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::compressed("notes/readme.txt", "Hello World")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let mut handle = vfs.open("notes/readme.txt", "rb").unwrap();
    assert_eq!(handle.len(), 11);

    let mut data = Vec::new();
    handle.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"Hello World");

    // Decoded payloads support backwards seeks like any other handle.
    handle.seek(SeekFrom::Start(6)).unwrap();
    data.clear();
    handle.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"World");
}

#[test]
fn open_falls_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let loose = dir.path().join("loose.txt");
    std::fs::write(&loose, b"from disk").unwrap();

    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("packed.txt", "from pak")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let mut handle = vfs.open(loose.to_str().unwrap(), "r").unwrap();
    assert!(!handle.is_packed());

    let mut data = Vec::new();
    handle.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"from disk");

    let missing = dir.path().join("missing.txt");
    assert!(vfs.open(missing.to_str().unwrap(), "r").is_err());
}

#[test]
fn unstamped_records_fall_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let ghost = dir.path().join("ghost.txt");
    std::fs::write(&ghost, b"from disk").unwrap();

    // The pak defines the same path, but its record was never stamped with a
    // file time, so it must behave as if absent.
    let ghost_virtual = ghost.to_str().unwrap().to_owned();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[
            EntrySpec::unstamped(ghost_virtual.clone(), "from pak"),
            EntrySpec::stamped("real.txt", "real"),
        ],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let mut handle = vfs.open(&ghost_virtual, "r").unwrap();
    assert!(!handle.is_packed());

    let mut data = Vec::new();
    handle.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"from disk");

    // The unstamped record is invisible to listing as well.
    assert_eq!(vfs.paths().collect::<Vec<_>>(), vec!["real.txt"]);
}

#[test]
fn later_archives_override_earlier_ones() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_pak(
        dir.path(),
        "first.pak",
        &[EntrySpec::stamped("a.txt", "first")],
    );
    let second = write_pak(
        dir.path(),
        "second.pak",
        &[EntrySpec::stamped("a.txt", "second")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&first).unwrap();
    vfs.add_pak_file(&second).unwrap();

    let mut data = Vec::new();
    vfs.open("a.txt", "r").unwrap().read_to_end(&mut data).unwrap();
    assert_eq!(data, b"second");
}

#[test]
fn first_wins_policy_keeps_earlier_archives() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_pak(
        dir.path(),
        "first.pak",
        &[EntrySpec::stamped("a.txt", "first")],
    );
    let second = write_pak(
        dir.path(),
        "second.pak",
        &[EntrySpec::stamped("a.txt", "second")],
    );

    let options = PakOptions::builder()
        .conflict_policy(ConflictPolicy::FirstWins)
        .build();
    let mut vfs = PakInterface::with_options(options);
    vfs.add_pak_file(&first).unwrap();
    vfs.add_pak_file(&second).unwrap();

    let mut data = Vec::new();
    vfs.open("a.txt", "r").unwrap().read_to_end(&mut data).unwrap();
    assert_eq!(data, b"first");
}

#[test]
fn loading_a_malformed_archive_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_pak(
        dir.path(),
        "good.pak",
        &[EntrySpec::stamped("a.txt", "payload")],
    );
    let bad = dir.path().join("bad.pak");
    std::fs::write(&bad, b"PACK0001 truncated nonsense").unwrap();

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&good).unwrap();
    assert!(vfs.add_pak_file(&bad).is_err());

    assert_eq!(vfs.archives().len(), 1);
    assert_eq!(vfs.paths().collect::<Vec<_>>(), vec!["a.txt"]);
    assert!(vfs.open("a.txt", "r").is_ok());
}

#[test]
fn double_load_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[
            EntrySpec::stamped("a.txt", "alpha"),
            EntrySpec::stamped("b.txt", "beta"),
        ],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();
    let once = vfs.paths().map(str::to_owned).collect::<Vec<_>>();

    vfs.add_pak_file(&pak).unwrap();
    assert_eq!(vfs.paths().collect::<Vec<_>>(), once);

    let mut data = Vec::new();
    vfs.open("a.txt", "r").unwrap().read_to_end(&mut data).unwrap();
    assert_eq!(data, b"alpha");
}

#[test]
fn write_modes_fail_for_packed_paths() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("a.txt", "payload")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    assert!(vfs.open("a.txt", "w").is_err());
    assert!(vfs.open("a.txt", "r+").is_err());
    assert!(vfs.open("a.txt", "x").is_err());
    assert!(vfs.open("a.txt", "rb").is_ok());
}

#[test]
fn packed_handles_honor_stream_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("a.txt", "Hello World")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let mut handle = vfs.open("a.txt", "rb").unwrap();

    let pos = handle.seek(SeekFrom::End(-5)).unwrap();
    assert_eq!(pos, 6);

    let mut out = [0u8; 8];
    let elements = handle.read_elements(1, 8, &mut out).unwrap();
    assert_eq!(elements, 5);
    assert_eq!(&out[..5], b"World");
    assert!(handle.is_eof());

    // Past the end: reads return nothing rather than failing.
    handle.seek(SeekFrom::Start(64)).unwrap();
    assert_eq!(handle.read_elements(1, 8, &mut out).unwrap(), 0);
    assert!(handle.is_eof());

    // A negative target is rejected and the position stays put.
    handle.seek(SeekFrom::Start(4)).unwrap();
    assert!(handle.seek(SeekFrom::Current(-32)).is_err());
    assert_eq!(handle.tell(), 4);
    assert!(!handle.is_eof());
}

#[test]
fn listing_negotiates_buffer_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[
            EntrySpec::stamped("b.txt", "two"),
            EntrySpec::stamped("a.txt", "one"),
            EntrySpec::stamped("c.txt", "three"),
            EntrySpec::unstamped("ghost.txt", "never"),
        ],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    // Phase one: no buffer, learn the exact requirement.
    assert_eq!(
        vfs.list_all_file_paths(None),
        ListOutcome::NeedsCapacity { required: 3 }
    );

    // An undersized buffer fails without writing anything.
    let mut small = vec![""; 2];
    assert_eq!(
        vfs.list_all_file_paths(Some(&mut small)),
        ListOutcome::NeedsCapacity { required: 3 }
    );
    assert_eq!(small, vec![""; 2]);

    // Phase two: an exact-size buffer is filled in catalog key order.
    let mut buffer = vec![""; 3];
    assert_eq!(
        vfs.list_all_file_paths(Some(&mut buffer)),
        ListOutcome::Filled { count: 3 }
    );
    assert_eq!(buffer, vec!["a.txt", "b.txt", "c.txt"]);
}

#[traced_test]
#[test]
fn find_unions_packed_and_loose_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("loose.txt"), b"loose").unwrap();

    let base = dir.path().to_str().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[
            EntrySpec::stamped(format!("{base}/packed.txt"), "packed"),
            EntrySpec::unstamped(format!("{base}/ghost.txt"), "never"),
        ],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let pattern = format!("{base}/*.txt");
    let (mut handle, first) = vfs.find_first(&pattern).unwrap().expect("matches exist");

    // Catalog entries come first, in key order; the unstamped record is skipped.
    assert!(first.is_packed());
    assert_eq!(first.name(), "packed.txt");
    assert_eq!(first.size(), 6);
    assert!(first.file_time().unwrap().is_valid());

    let second = vfs.find_next(&mut handle).expect("the loose file follows");
    assert!(!second.is_packed());
    assert_eq!(second.name(), "loose.txt");
    assert_eq!(second.size(), 5);
    assert_eq!(second.file_time(), None);

    // Exhaustion is sticky.
    assert_eq!(vfs.find_next(&mut handle), None);
    assert_eq!(vfs.find_next(&mut handle), None);

    vfs.find_close(handle);
}

#[test]
fn find_first_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("a.txt", "payload")],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let pattern = format!("{}/*.nothing", dir.path().to_str().unwrap());
    assert!(vfs.find_first(&pattern).unwrap().is_none());
}

#[test]
fn find_iterator_walks_catalog_in_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[
            EntrySpec::stamped("assets/b.txt", "two"),
            EntrySpec::stamped("assets/a.txt", "one"),
        ],
    );

    let mut vfs = PakInterface::new();
    vfs.add_pak_file(&pak).unwrap();

    let names = vfs
        .find("assets/*.txt")
        .unwrap()
        .map(|entry| entry.path().to_owned())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["assets/a.txt", "assets/b.txt"]);
}

#[test]
fn global_interface_shares_no_state_with_local_instances() {
    let dir = tempfile::tempdir().unwrap();
    let pak = write_pak(
        dir.path(),
        "assets.pak",
        &[EntrySpec::stamped("global/only.txt", "payload")],
    );

    let mut shared = global_interface().lock().unwrap();
    shared.add_pak_file(&pak).unwrap();
    assert!(shared.record("global/only.txt").is_some());

    let local = PakInterface::new();
    assert!(local.record("global/only.txt").is_none());
    assert_eq!(local.paths().count(), 0);
}
