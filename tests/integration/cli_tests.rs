use clap::Parser;
use dupedetect::cli::Cli;
use dupedetect::error::ExitCode;
use dupedetect::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["dupedetect", "-q"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_run_export_action() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), b"twin").unwrap();
    fs::write(data.join("b"), b"twin").unwrap();
    let out = dir.path().join("Dupelist.json");

    let code = run_app(cli(&[
        arg(&data),
        "--action",
        "export",
        "--output-file",
        arg(&out),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert!(data.join("a").exists());
    assert!(data.join("b").exists());
}

#[test]
fn test_run_delete_action() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"twin").unwrap();
    fs::write(dir.path().join("b"), b"twin").unwrap();
    fs::write(dir.path().join("c"), b"single").unwrap();

    let code = run_app(cli(&[
        arg(dir.path()),
        "--action",
        "delete",
        "--tie-policy",
        "path-only",
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("c").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_run_quit_action_changes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"twin").unwrap();
    fs::write(dir.path().join("b"), b"twin").unwrap();
    let out = dir.path().join("never.json");

    let code = run_app(cli(&[
        arg(dir.path()),
        "--action",
        "quit",
        "--output-file",
        arg(&out),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!out.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_run_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"one").unwrap();
    fs::write(dir.path().join("b"), b"two").unwrap();

    let code = run_app(cli(&[arg(dir.path()), "--action", "delete"])).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_run_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let code = run_app(cli(&[arg(&missing), "--action", "export"])).unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
}

#[test]
fn test_run_export_failure_is_partial() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"twin").unwrap();
    fs::write(dir.path().join("b"), b"twin").unwrap();
    let out = dir.path().join("absent").join("Dupelist.json");

    let code = run_app(cli(&[
        arg(dir.path()),
        "--action",
        "export",
        "--output-file",
        arg(&out),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(!out.exists());
}

#[test]
fn test_run_export_lists_every_group_member() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    for name in ["red1", "red2", "red3"] {
        fs::write(data.join(name), b"red").unwrap();
    }
    for name in ["blue1", "blue2"] {
        fs::write(data.join(name), b"blue").unwrap();
    }
    fs::write(data.join("green"), b"green").unwrap();
    let out = dir.path().join("Dupelist.json");

    let code = run_app(cli(&[
        arg(&data),
        "--action",
        "export",
        "--output-file",
        arg(&out),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let loaded = dupedetect::output::load(&out).unwrap();
    let names: Vec<_> = loaded
        .iter()
        .map(|r| r.path().file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    // Groups in order of first appearance, members in scan order
    assert_eq!(names, vec!["blue1", "blue2", "red1", "red2", "red3"]);
}
