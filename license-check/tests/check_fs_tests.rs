//! Integration tests for `license_check::check_fs` and the stream adapter.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use license_check::{
    ContentMode, Error, FailureKind, FileRecord, FsSourceConfig, HEADER_NOT_PRESENT,
    HEADER_PRESENT, LicenseCheck, LicenseCheckConfig, StreamEvent, check_fs,
};
use tempfile::TempDir;

const HEADER: &str = "/* LICENSE */";
const OK_JS: &str = "/* LICENSE */\nconsole.log(1);\n";
const KO_JS: &str = "console.log(1);\n";

/// `header.txt`, `ok.js` and `ko.js` in a fresh directory.
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("header.txt"), HEADER).unwrap();
    fs::write(tmp.path().join("ok.js"), OK_JS).unwrap();
    fs::write(tmp.path().join("ko.js"), KO_JS).unwrap();
    tmp
}

fn check_config(dir: &Path, blocking: bool, log: bool) -> LicenseCheckConfig {
    let mut cfg = LicenseCheckConfig::new(dir.join("header.txt"));
    cfg.blocking = blocking;
    cfg.log = log;
    cfg
}

fn fs_config(patterns: &[String]) -> FsSourceConfig {
    let mut cfg = FsSourceConfig::default();
    cfg.patterns = patterns.to_vec();
    cfg
}

fn js_glob(dir: &Path) -> String {
    format!("{}/*.js", dir.display())
}

#[test]
fn test_missing_header_template_fails_before_scanning() {
    let tmp = fixture();
    let missing = tmp.path().join("header_no_exist.txt");
    let cfg = LicenseCheckConfig::new(&missing);

    // The source path does not exist either; the header error must win.
    let result = check_fs(&cfg, &fs_config(&["nowhere/at/all.js".to_owned()]));
    let msg = result.unwrap_err().to_string();
    assert_eq!(
        msg,
        format!("The license header file doesn't exist {}", missing.display())
    );
}

#[test]
fn test_license_check_new_missing_template() {
    let err = LicenseCheck::new(&LicenseCheckConfig::new("./test/fixture/header_no_exist.txt"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "The license header file doesn't exist ./test/fixture/header_no_exist.txt"
    );
}

#[test]
fn test_empty_patterns_errors() {
    let tmp = fixture();
    let result = check_fs(&check_config(tmp.path(), false, false), &fs_config(&[]));
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("No paths provided"), "got: {msg}");
}

#[test]
fn test_nonexistent_path_errors() {
    let tmp = fixture();
    let missing = tmp.path().join("does_not_exist.js").display().to_string();
    let result = check_fs(&check_config(tmp.path(), false, false), &fs_config(&[missing]));
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("does not exist"), "got: {msg}");
}

#[test]
fn test_glob_without_matches_is_acceptable() {
    let tmp = fixture();
    let pattern = format!("{}/*.donotexist", tmp.path().display());
    let report = check_fs(&check_config(tmp.path(), true, true), &fs_config(&[pattern])).unwrap();

    assert!(report.ok);
    assert_eq!(report.checked_files, 0);
    assert_eq!(report.forwarded_files, 0);
    assert!(report.events.is_empty());
}

#[test]
fn test_multiple_files_pass_through_when_not_blocking() {
    let tmp = fixture();
    let report = check_fs(
        &check_config(tmp.path(), false, false),
        &fs_config(&[js_glob(tmp.path())]),
    )
    .unwrap();

    assert!(report.ok);
    assert_eq!(report.checked_files, 2);
    assert_eq!(report.forwarded_files, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.without_header, vec![tmp.path().join("ko.js")]);
}

#[test]
fn test_blocking_reports_missing_header() {
    let tmp = fixture();
    let ko = tmp.path().join("ko.js").display().to_string();
    let report = check_fs(&check_config(tmp.path(), true, false), &fs_config(&[ko])).unwrap();

    assert!(!report.ok);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::MissingHeader);
    assert!(
        report.failures[0]
            .message
            .contains("The following file doesn't contain the license header"),
        "got: {}",
        report.failures[0].message
    );
}

#[test]
fn test_blocking_passes_when_header_present() {
    let tmp = fixture();
    let ok = tmp.path().join("ok.js").display().to_string();
    let report = check_fs(&check_config(tmp.path(), true, false), &fs_config(&[ok])).unwrap();

    assert!(report.ok);
    assert_eq!(report.forwarded_files, 1);
    assert!(report.failures.is_empty());
}

#[test]
fn test_blocking_continues_after_violation() {
    let tmp = fixture();
    fs::write(tmp.path().join("another_ko.js"), "let x;\n").unwrap();
    let report = check_fs(
        &check_config(tmp.path(), true, false),
        &fs_config(&[js_glob(tmp.path())]),
    )
    .unwrap();

    assert_eq!(report.checked_files, 3);
    assert_eq!(report.forwarded_files, 1);
    let failed: Vec<PathBuf> = report.failures.iter().map(|f| f.file.clone()).collect();
    assert_eq!(
        failed,
        vec![tmp.path().join("another_ko.js"), tmp.path().join("ko.js")]
    );
}

#[test]
fn test_log_disabled_emits_no_events() {
    let tmp = fixture();
    let ko = tmp.path().join("ko.js").display().to_string();
    let report = check_fs(&check_config(tmp.path(), false, false), &fs_config(&[ko])).unwrap();
    assert!(report.events.is_empty());
}

#[test]
fn test_log_enabled_emits_one_event_per_file() {
    let tmp = fixture();
    let report = check_fs(
        &check_config(tmp.path(), false, true),
        &fs_config(&[js_glob(tmp.path())]),
    )
    .unwrap();

    assert_eq!(report.events.len(), 2);
    assert_eq!(report.events[0].msg, HEADER_NOT_PRESENT);
    assert_eq!(report.events[0].path, tmp.path().join("ko.js"));
    assert_eq!(report.events[1].msg, HEADER_PRESENT);
    assert!(report.events[1].path.ends_with("ok.js"));
}

#[test]
fn test_stream_mode_gives_same_verdicts() {
    let tmp = fixture();
    let mut source = fs_config(&[js_glob(tmp.path())]);
    source.mode = ContentMode::Stream;
    let report = check_fs(&check_config(tmp.path(), true, true), &source).unwrap();

    assert_eq!(report.checked_files, 2);
    assert_eq!(report.with_header, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.events.len(), 2);
}

#[test]
fn test_oversized_file_is_a_scan_error() {
    let tmp = fixture();
    let mut source = fs_config(&[js_glob(tmp.path())]);
    source.max_file_size = 20;
    let report = check_fs(&check_config(tmp.path(), false, false), &source).unwrap();

    // ok.js is 30 bytes, ko.js is 16.
    assert!(!report.ok);
    assert_eq!(report.checked_files, 1);
    assert_eq!(report.scan_errors.len(), 1);
    assert_eq!(report.scan_errors[0].file, tmp.path().join("ok.js"));
}

#[test]
fn test_directory_pattern_with_exclude() {
    let tmp = fixture();
    let mut source = fs_config(&[tmp.path().display().to_string()]);
    source.exclude = vec!["*.txt".to_owned(), "ko.js".to_owned()];
    let report = check_fs(&check_config(tmp.path(), true, false), &source).unwrap();

    assert!(report.ok);
    assert_eq!(report.checked_files, 1);
}

#[test]
fn test_stream_adapter_preserves_modes_and_order() {
    let tmp = fixture();
    let check = LicenseCheck::new(&check_config(tmp.path(), false, false)).unwrap();

    let files = vec![
        FileRecord::buffer("ok.js", OK_JS),
        FileRecord::stream("ko.js", Cursor::new(KO_JS.as_bytes().to_vec())),
        FileRecord::stream("ok2.js", Cursor::new(OK_JS.as_bytes().to_vec())),
    ];

    let forwarded: Vec<FileRecord> = check
        .stream(files)
        .map(|event| match event {
            StreamEvent::Data(file) => file,
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();

    let names: Vec<&Path> = forwarded.iter().map(FileRecord::path).collect();
    assert_eq!(names, vec![Path::new("ok.js"), Path::new("ko.js"), Path::new("ok2.js")]);
    assert!(forwarded[0].is_buffer());
    assert!(forwarded[1].is_stream());
    assert!(forwarded[2].is_stream());

    let contents: Vec<Vec<u8>> = forwarded
        .into_iter()
        .map(|f| f.read_contents().unwrap())
        .collect();
    assert_eq!(contents[0], OK_JS.as_bytes());
    assert_eq!(contents[1], KO_JS.as_bytes());
    assert_eq!(contents[2], OK_JS.as_bytes());
}

#[test]
fn test_stream_adapter_blocking_surfaces_each_violation_once() {
    let tmp = fixture();
    let check = LicenseCheck::new(&check_config(tmp.path(), true, false)).unwrap();

    let files = vec![
        FileRecord::buffer("a.js", KO_JS),
        FileRecord::buffer("b.js", OK_JS),
        FileRecord::stream("c.js", Cursor::new(KO_JS.as_bytes().to_vec())),
    ];

    let mut errors = Vec::new();
    let mut data = Vec::new();
    for event in check.stream(files) {
        match event {
            StreamEvent::Error(Error::MissingHeader(e)) => errors.push(e.path),
            StreamEvent::Data(file) => data.push(file.path),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    assert_eq!(errors, vec![PathBuf::from("a.js"), PathBuf::from("c.js")]);
    assert_eq!(data, vec![PathBuf::from("b.js")]);
}
