use sourcemap::SourceMapBuilder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Path to the errmapper binary built for this test run
fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_errmapper"))
}

/// Write a source map for `app.js` into a fresh temp directory
///
/// Generated line 10, column 5 maps to app.ts:3:1 (symbol `getUser`);
/// generated line 2 maps to app.ts:1:5. Nothing else is mapped.
fn fixture() -> (TempDir, PathBuf) {
    let mut builder = SourceMapBuilder::new(Some("app.js"));
    let source_id = builder.add_source("app.ts");
    let name_id = builder.add_name("getUser");
    builder.add_raw(1, 0, 0, 4, Some(source_id), None, false);
    builder.add_raw(9, 4, 2, 0, Some(source_id), Some(name_id), false);

    let mut buf = Vec::new();
    builder.into_sourcemap().to_writer(&mut buf).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("app.js.map");
    fs::write(&map_path, buf).unwrap();
    (dir, map_path)
}

fn run(args: &[&str], map_path: &Path) -> Output {
    Command::new(bin_path())
        .args(args)
        .arg(map_path)
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_remaps_message() {
    let (_dir, map_path) = fixture();

    let output = run(&["Error at app.js:10:5"], &map_path);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Error at app.ts:3:1\n");
}

#[test]
fn test_unmapped_position_is_kept() {
    let (_dir, map_path) = fixture();

    let output = run(&["TypeError at /dist/app.js:25:12 and app.js:2"], &map_path);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "TypeError at /dist/app.js:25:12 and app.ts:1:5\n"
    );
}

#[test]
fn test_message_without_positions() {
    let (_dir, map_path) = fixture();

    let output = run(&["Something went wrong"], &map_path);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Something went wrong\n");
}

#[test]
fn test_missing_sourcemap() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.js.map");

    let output = run(&["Error at app.js:10:5"], &missing);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Source map file does not exist"), "Unexpected stderr: {}", stderr);
    assert!(stderr.contains("missing.js.map"));
}

#[test]
fn test_invalid_sourcemap() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("broken.js.map");
    fs::write(&map_path, "{ this is not json").unwrap();

    let output = run(&["Error at app.js:10:5"], &map_path);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid source map JSON"), "Unexpected stderr: {}", stderr);
    assert!(stderr.contains("broken.js.map"), "Path missing from stderr: {}", stderr);
}

#[test]
fn test_missing_arguments() {
    let output = Command::new(bin_path())
        .arg("Error at app.js:10:5")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help() {
    let output = Command::new(bin_path())
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("errmapper \"Error at app.js:10:5\""));
}

#[test]
fn test_missing_sourcemap_reported_before_reading_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.js.map");

    let mut child = Command::new(bin_path())
        .arg("-")
        .arg(&missing)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");

    // Hold stdin open without writing; the binary must not wait on it
    let _stdin = child.stdin.take().unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("Binary blocked on stdin before checking the source map");
        }
        thread::sleep(Duration::from_millis(20));
    };

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(stderr.contains("Source map file does not exist"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_json_output() {
    let (_dir, map_path) = fixture();

    let output = run(&["--json", "Error at app.js:10:5 and app.js:40:1"], &map_path);

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["success"], true);
    assert_eq!(json["output"], "Error at app.ts:3:1 and app.js:40:1");
    assert_eq!(json["mapped_count"], 1);
    assert_eq!(json["unmapped_count"], 1);
    assert_eq!(json["positions"][0]["name"], "getUser");
    assert_eq!(json["positions"][1]["status"], "unmapped");
    assert_eq!(json["sourcemap"], map_path.display().to_string());
    assert_eq!(
        json["sourcemap_checksum"],
        blake3::hash(&fs::read(&map_path).unwrap()).to_hex().to_string()
    );
}

#[test]
fn test_json_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.js.map");

    let output = run(&["--json", "Error at app.js:10:5"], &missing);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("does not exist"));
}

#[test]
fn test_stdin_message() {
    let (_dir, map_path) = fixture();

    let mut child = Command::new(bin_path())
        .arg("-")
        .arg(&map_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Uncaught Error\n    at getUser (app.js:10:5)\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Uncaught Error\n    at getUser (app.ts:3:1)\n"
    );
}

#[test]
fn test_custom_extension() {
    let (_dir, map_path) = fixture();

    let output = run(&["--ext", "mjs", "at app.mjs:10:5 and app.js:10:5"], &map_path);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "at app.ts:3:1 and app.js:10:5\n"
    );
}

#[test]
fn test_invalid_extension() {
    let (_dir, map_path) = fixture();

    let output = run(&["--ext", "j s", "at app.js:10:5"], &map_path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid file extension"));
}

#[test]
fn test_file_output() {
    let (dir, map_path) = fixture();
    let output_file = dir.path().join("out.txt");

    let output = Command::new(bin_path())
        .arg("--output")
        .arg(&output_file)
        .arg("Error at app.js:10:5")
        .arg(&map_path)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let content = fs::read_to_string(&output_file).expect("Failed to read output file");
    assert_eq!(content, "Error at app.ts:3:1");
}
