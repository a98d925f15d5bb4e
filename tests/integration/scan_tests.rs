use dupedetect::duplicates::{find_duplicates, group_by_fingerprint, DuplicateSummary};
use dupedetect::progress::NullReporter;
use dupedetect::scanner::{ScanError, Scanner, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn scan(path: &std::path::Path) -> dupedetect::scanner::ScanOutcome {
    Scanner::new(WalkerConfig::default()).scan(path, &NullReporter)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let outcome = scan(dir.path());

    assert!(outcome.is_clean());
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.files_found, 0);
    assert!(find_duplicates(&outcome.records).is_empty());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content a")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"content b")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"content c")
        .unwrap();

    let outcome = scan(dir.path());

    assert_eq!(outcome.records.len(), 3);
    assert!(find_duplicates(&outcome.records).is_empty());
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();

    // Two identical files and one unique
    fs::write(dir.path().join("a.txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("b.txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("c.txt"), b"unique").unwrap();

    let outcome = scan(dir.path());
    let duplicates = find_duplicates(&outcome.records);

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(duplicates.len(), 2);
    let names: Vec<_> = duplicates
        .iter()
        .map(|r| r.path().file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert_eq!(duplicates[0].fingerprint().len(), 32);
    assert_eq!(duplicates[0].fingerprint(), duplicates[1].fingerprint());
}

#[test]
fn test_scan_records_are_absolute_with_size() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.bin"), vec![7u8; 1500]).unwrap();

    let outcome = scan(dir.path());

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert!(record.path().is_absolute());
    assert_eq!(record.size(), 1500);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("top.txt"), b"shared").unwrap();
    fs::write(deep.join("bottom.txt"), b"shared").unwrap();

    let outcome = scan(dir.path());
    let groups = group_by_fingerprint(&outcome.records);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    let summary = DuplicateSummary::from_groups(&groups);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.reclaimable, 6);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), b"").unwrap();
    fs::write(dir.path().join("empty2"), b"").unwrap();

    let outcome = scan(dir.path());
    let duplicates = find_duplicates(&outcome.records);

    assert_eq!(duplicates.len(), 2);
    assert_eq!(duplicates[0].fingerprint(), "d41d8cd98f00b204e9800998ecf8427e");
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();

    let outcome = scan(&dir.path().join("does-not-exist"));

    assert!(!outcome.is_clean());
    assert!(matches!(outcome.root_error, Some(ScanError::NotFound(_))));
    assert!(outcome.records.is_empty());
}

#[test]
fn test_scan_file_as_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();

    let outcome = scan(&file);

    assert!(matches!(outcome.root_error, Some(ScanError::NotADirectory(_))));
    assert!(outcome.records.is_empty());
}

#[cfg(unix)]
#[test]
fn test_scan_skips_unreadable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ok1.txt"), b"same").unwrap();
    fs::write(dir.path().join("ok2.txt"), b"same").unwrap();
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, b"same").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe in that case
    if File::open(&locked).is_ok() {
        return;
    }

    let outcome = scan(dir.path());

    assert!(outcome.root_error.is_none());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(find_duplicates(&outcome.records).len(), 2);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
