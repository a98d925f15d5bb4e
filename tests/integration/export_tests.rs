use dupedetect::duplicates::find_duplicates;
use dupedetect::output::{export, load, ExportError, JsonRecord};
use dupedetect::progress::NullReporter;
use dupedetect::scanner::{Scanner, WalkerConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_export_scanned_duplicates() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), b"hello").unwrap();
    fs::write(data.join("b.txt"), b"hello").unwrap();
    fs::write(data.join("c.txt"), b"world").unwrap();

    let outcome = Scanner::new(WalkerConfig::default()).scan(&data, &NullReporter);
    let duplicates = find_duplicates(&outcome.records);
    let dest = dir.path().join("Dupelist.json");

    export(&duplicates, &dest).unwrap();

    let rows: Vec<JsonRecord> = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.md5, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(row.size, 5);
    }
    assert!(rows[0].path.ends_with("a.txt"));
    assert!(rows[1].path.ends_with("b.txt"));
}

#[test]
fn test_export_field_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1"), b"x").unwrap();
    fs::write(dir.path().join("2"), b"x").unwrap();
    let outcome = Scanner::new(WalkerConfig::default()).scan(dir.path(), &NullReporter);
    let dest = dir.path().join("out.json");

    export(&find_duplicates(&outcome.records), &dest).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    let first = &value.as_array().unwrap()[0];
    for key in ["path", "md5", "size", "creation"] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn test_export_then_load() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("p"), b"pair").unwrap();
    fs::write(dir.path().join("q"), b"pair").unwrap();
    let outcome = Scanner::new(WalkerConfig::default()).scan(dir.path(), &NullReporter);
    let duplicates = find_duplicates(&outcome.records);
    let dest = dir.path().join("list.json");

    export(&duplicates, &dest).unwrap();
    let loaded = load(&dest).unwrap();

    assert_eq!(loaded, duplicates);
}

#[test]
fn test_export_empty_list() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("Dupelist.json");

    export(&[], &dest).unwrap();

    let rows: Vec<JsonRecord> = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("no").join("such").join("dir").join("Dupelist.json");

    let err = export(&[], &dest).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!dest.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_export_rejects_file_name_that_is_not_utf8() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    let bad = data.join(OsStr::from_bytes(b"bad\xffname"));
    fs::write(&bad, b"same").unwrap();
    fs::write(data.join("ok"), b"same").unwrap();

    let outcome = Scanner::new(WalkerConfig::default()).scan(&data, &NullReporter);
    let duplicates = find_duplicates(&outcome.records);
    assert_eq!(duplicates.len(), 2);
    let dest = dir.path().join("Dupelist.json");

    let err = export(&duplicates, &dest).unwrap_err();

    assert!(matches!(err, ExportError::NonUtf8Path(ref p) if *p == bad));
    assert!(!dest.exists());
}
