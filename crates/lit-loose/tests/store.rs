//! Integration tests for the loose object store: round-trips, write-once
//! behaviour, and the error taxonomy.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use lit_hash::{Hasher, ObjectId};
use lit_loose::{zlib, LooseObjectStore, StoreError, StoreOptions, WriteOutcome};
use lit_object::{encode, DecodeMode, ObjectKind, Tree, TreeEntry};

const HELLO_ID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

fn setup() -> (tempfile::TempDir, LooseObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let objects = dir.path().join("objects");
    fs::create_dir(&objects).unwrap();
    let store = LooseObjectStore::open(&objects);
    (dir, store)
}

/// Place raw (already compressed) bytes where `oid` would live.
fn plant(store: &LooseObjectStore, oid: &ObjectId, bytes: &[u8]) -> PathBuf {
    let path = store.object_path(oid);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn hello_blob_has_known_id_and_roundtrips() {
    let (_dir, store) = setup();
    let oid = store.put(ObjectKind::Blob, b"hello\n").unwrap();
    assert_eq!(oid.to_hex(), HELLO_ID);

    let obj = store.get(&oid).unwrap();
    assert_eq!(obj.kind, ObjectKind::Blob);
    assert_eq!(obj.payload, b"hello\n");
}

#[test]
fn stored_file_is_compressed_canonical_form() {
    let (dir, store) = setup();
    let oid = store.put(ObjectKind::Blob, b"hello\n").unwrap();

    let path = dir
        .path()
        .join("objects")
        .join(&HELLO_ID[..2])
        .join(&HELLO_ID[2..]);
    assert_eq!(store.object_path(&oid), path);

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(zlib::decompress(&on_disk).unwrap(), b"blob 6\0hello\n");
    assert_eq!(store.get_raw(&oid).unwrap(), b"blob 6\0hello\n");
}

#[test]
fn put_is_idempotent() {
    let (_dir, store) = setup();
    let (first, outcome) = store.insert(ObjectKind::Blob, b"same").unwrap();
    assert_eq!(outcome, WriteOutcome::Created);

    let path = store.object_path(&first);
    let before_bytes = fs::read(&path).unwrap();
    let before_mtime = fs::metadata(&path).unwrap().modified().unwrap();
    std::thread::sleep(Duration::from_millis(20));

    let (second, outcome) = store.insert(ObjectKind::Blob, b"same").unwrap();
    assert_eq!(second, first);
    assert_eq!(outcome, WriteOutcome::AlreadyPresent);
    assert_eq!(fs::read(&path).unwrap(), before_bytes);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before_mtime);
}

#[test]
fn put_never_overwrites_existing_file() {
    let (_dir, store) = setup();
    let oid = Hasher::hash_object("blob", b"payload");
    let path = plant(&store, &oid, b"sentinel, not zlib");

    let (stored, outcome) = store.insert(ObjectKind::Blob, b"payload").unwrap();
    assert_eq!(stored, oid);
    assert_eq!(outcome, WriteOutcome::AlreadyPresent);
    assert_eq!(fs::read(path).unwrap(), b"sentinel, not zlib");
}

#[test]
fn no_temp_files_left_behind() {
    let (_dir, store) = setup();
    let oid = store.put(ObjectKind::Blob, b"tidy").unwrap();
    store.put(ObjectKind::Blob, b"tidy").unwrap();
    let fanout = store.object_path(&oid).parent().unwrap().to_path_buf();
    let names: Vec<_> = fs::read_dir(fanout)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, [oid.to_hex()[2..].to_string()]);
}

#[cfg(unix)]
#[test]
fn object_files_are_read_only() {
    use std::os::unix::fs::PermissionsExt;
    let (_dir, store) = setup();
    let oid = store.put(ObjectKind::Blob, b"frozen").unwrap();
    let mode = fs::metadata(store.object_path(&oid)).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o444);
}

#[test]
fn empty_payloads_roundtrip() {
    let (_dir, store) = setup();
    let blob = store.put(ObjectKind::Blob, b"").unwrap();
    assert_eq!(blob.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    let tree = store.put(ObjectKind::Tree, b"").unwrap();
    assert_eq!(tree.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    assert!(store.read_tree(&tree).unwrap().is_empty());
    assert!(store.get(&blob).unwrap().payload.is_empty());
}

#[test]
fn missing_object_is_not_found() {
    let (_dir, store) = setup();
    let oid = ObjectId::from_hex(HELLO_ID).unwrap();
    assert!(!store.contains(&oid));
    assert!(matches!(store.get(&oid), Err(StoreError::NotFound { oid: o }) if o == oid));
    assert!(matches!(store.get_raw(&oid), Err(StoreError::NotFound { .. })));
    assert!(matches!(store.read_header(&oid), Err(StoreError::NotFound { .. })));
}

#[test]
fn garbage_file_is_corrupt() {
    let (_dir, store) = setup();
    let oid = ObjectId::from_hex(HELLO_ID).unwrap();
    plant(&store, &oid, b"this is not a zlib stream");
    assert!(matches!(store.get(&oid), Err(StoreError::Corrupt { .. })));
}

#[test]
fn truncated_file_is_corrupt() {
    let (_dir, store) = setup();
    let oid = store.put(ObjectKind::Blob, b"hello hello hello\n").unwrap();
    let path = store.object_path(&oid);
    let bytes = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    plant(&store, &oid, &bytes[..bytes.len() - 6]);
    assert!(matches!(store.get(&oid), Err(StoreError::Corrupt { .. })));
}

#[test]
fn bad_header_is_malformed() {
    let (_dir, store) = setup();
    let oid = ObjectId::from_hex(HELLO_ID).unwrap();
    plant(&store, &oid, &zlib::compress(b"blob six\0hello\n", 6).unwrap());
    assert!(matches!(store.get(&oid), Err(StoreError::Malformed { .. })));
}

#[test]
fn trailing_bytes_follow_decode_mode() {
    let dir = tempfile::tempdir().unwrap();
    let lenient = LooseObjectStore::open(dir.path());
    let strict = LooseObjectStore::with_options(
        dir.path(),
        StoreOptions {
            decode_mode: DecodeMode::Strict,
            ..StoreOptions::default()
        },
    );

    let oid = ObjectId::from_hex(HELLO_ID).unwrap();
    plant(&lenient, &oid, &zlib::compress(b"blob 6\0hello\nEXTRA", 6).unwrap());

    assert_eq!(lenient.get(&oid).unwrap().payload, b"hello\n");
    assert!(matches!(strict.get(&oid), Err(StoreError::Malformed { .. })));
}

#[test]
fn verified_read_detects_misplaced_content() {
    let (_dir, store) = setup();
    let oid = ObjectId::from_hex(HELLO_ID).unwrap();
    plant(&store, &oid, &zlib::compress(&encode(ObjectKind::Blob, b"other\n"), 6).unwrap());

    assert_eq!(store.get(&oid).unwrap().payload, b"other\n");
    match store.get_verified(&oid) {
        Err(StoreError::HashMismatch { expected, actual, .. }) => {
            assert_eq!(expected, oid);
            assert_eq!(actual, Hasher::hash_object("blob", b"other\n"));
        }
        other => panic!("expected hash mismatch, got {other:?}"),
    }

    let good = store.put(ObjectKind::Blob, b"fine").unwrap();
    assert_eq!(store.get_verified(&good).unwrap().payload, b"fine");
}

#[test]
fn read_header_reports_kind_and_size() {
    let (_dir, store) = setup();
    let payload = vec![7u8; 100_000];
    let oid = store.put(ObjectKind::Blob, &payload).unwrap();
    assert_eq!(store.read_header(&oid).unwrap(), (ObjectKind::Blob, 100_000));
}

#[test]
fn read_tree_parses_entries_in_order() {
    let (_dir, store) = setup();
    let blob = store.put(ObjectKind::Blob, b"hello\n").unwrap();
    let sub = store.put(ObjectKind::Tree, b"").unwrap();
    let tree = Tree {
        entries: vec![
            TreeEntry::new("100644", "file.txt", blob).unwrap(),
            TreeEntry::new("40000", "dir", sub).unwrap(),
        ],
    };
    let oid = store.put(ObjectKind::Tree, &tree.serialize_content()).unwrap();

    let read = store.read_tree(&oid).unwrap();
    assert_eq!(read, tree);
    let lines: Vec<_> = read.iter().map(|e| e.display_line().unwrap()).collect();
    assert_eq!(
        lines,
        [
            format!("100644 blob {HELLO_ID}\tfile.txt"),
            format!("040000 tree {sub}\tdir"),
        ]
    );
}

#[test]
fn read_tree_rejects_blobs() {
    let (_dir, store) = setup();
    let blob = store.put(ObjectKind::Blob, b"not a tree").unwrap();
    assert!(matches!(
        store.read_tree(&blob),
        Err(StoreError::UnexpectedKind {
            expected: ObjectKind::Tree,
            actual: ObjectKind::Blob,
            ..
        })
    ));
}

#[test]
fn read_tree_rejects_truncated_payload() {
    let (_dir, store) = setup();
    let oid = store.put(ObjectKind::Tree, b"100644 file.txt\0short").unwrap();
    assert!(matches!(store.read_tree(&oid), Err(StoreError::Malformed { .. })));
}

#[test]
fn hash_file_matches_put_file() {
    let (dir, store) = setup();
    let path = dir.path().join("hello.txt");
    fs::write(&path, b"hello\n").unwrap();

    let hashed = store.hash_file(&path).unwrap();
    assert!(!store.contains(&hashed));
    let stored = store.put_file(&path).unwrap();
    assert_eq!(hashed, stored);
    assert_eq!(stored.to_hex(), HELLO_ID);
    assert!(store.contains(&stored));
}

#[test]
fn text_much_larger_than_its_compressed_form_roundtrips() {
    let (_dir, store) = setup();
    let text = "line\n".repeat(1000);
    let oid = store.put(ObjectKind::Blob, text.as_bytes()).unwrap();
    assert!(fs::metadata(store.object_path(&oid)).unwrap().len() < 100);

    let obj = store.get(&oid).unwrap();
    assert_eq!(obj.payload, text.as_bytes());
    assert_eq!(store.get_verified(&oid).unwrap(), obj);
}

#[test]
fn runs_of_one_byte_roundtrip_at_every_size() {
    let (_dir, store) = setup();
    for n in [100, 1000, 4096, 10_000, 100_000] {
        let payload = vec![b'a'; n];
        let oid = store.put(ObjectKind::Blob, &payload).unwrap();
        assert_eq!(store.get(&oid).unwrap().payload, payload, "{n} bytes");
        assert_eq!(store.read_header(&oid).unwrap(), (ObjectKind::Blob, n));
    }
}

#[test]
fn free_hash_file_needs_no_store() {
    let (dir, store) = setup();
    let file = dir.path().join("big.txt");
    fs::write(&file, "row\n".repeat(5000)).unwrap();

    let standalone = lit_loose::hash_file(&file).unwrap();
    assert_eq!(standalone, store.hash_file(&file).unwrap());
    assert!(!store.contains(&standalone));
    assert_eq!(standalone, store.put_file(&file).unwrap());
}

#[test]
fn hash_file_on_missing_path_is_io_error() {
    let (dir, store) = setup();
    let missing = dir.path().join("nope");
    assert!(matches!(
        store.hash_file(&missing),
        Err(StoreError::Io { path, .. }) if path == missing
    ));
}

#[test]
fn iter_lists_every_object_sorted() {
    let (_dir, store) = setup();
    let mut expected: Vec<ObjectId> = (0..20)
        .map(|i| store.put(ObjectKind::Blob, format!("object {i}").as_bytes()).unwrap())
        .collect();
    expected.sort();

    // Stray files in the objects dir and fan-out dirs are ignored.
    fs::write(store.objects_dir().join("README"), b"x").unwrap();
    let fanout = store.object_path(&expected[0]).parent().unwrap().to_path_buf();
    fs::write(fanout.join("tmp_obj_leftover"), b"x").unwrap();

    let listed: Vec<ObjectId> = store.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(listed, expected);
}

#[test]
fn iter_on_missing_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LooseObjectStore::open(dir.path().join("absent"));
    assert_eq!(store.iter().unwrap().count(), 0);
}

#[test]
fn compression_level_does_not_change_identity() {
    let dir = tempfile::tempdir().unwrap();
    let mut fast = LooseObjectStore::open(dir.path().join("a"));
    fast.set_compression_level(0);
    let best = LooseObjectStore::with_options(
        dir.path().join("b"),
        StoreOptions {
            compression_level: 9,
            ..StoreOptions::default()
        },
    );
    let data = vec![b'z'; 4096];
    let a = fast.put(ObjectKind::Blob, &data).unwrap();
    let b = best.put(ObjectKind::Blob, &data).unwrap();
    assert_eq!(a, b);
    let size = |store: &LooseObjectStore| fs::metadata(store.object_path(&a)).unwrap().len();
    assert!(size(&fast) > size(&best));
    assert_eq!(fast.get(&a).unwrap(), best.get(&b).unwrap());
}
