use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn dupescan() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dupescan"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_too_few_arguments_fails_without_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();

    let output = dupescan()
        .arg(dir.path())
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    assert!(!output.stderr.is_empty());
    // Only the file created above is present
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_no_arguments_fails() {
    let output = dupescan().output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_successful_run_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    let out = tempdir().unwrap();
    let report = out.path().join("result.json");

    let output = dupescan().arg(dir.path()).arg(&report).output().unwrap();

    assert!(output.status.success(), "{:?}", output);
    // The report goes to the file, never to stdout
    assert!(output.stdout.is_empty());
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_exits_zero_and_logs() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    let sub = dir.path().join("z_locked");
    fs::create_dir(&sub).unwrap();
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o000)).unwrap();
    let privileged = fs::read_dir(&sub).is_ok();

    let out = tempdir().unwrap();
    let report = out.path().join("result.json");
    let output = dupescan().arg(dir.path()).arg(&report).output().unwrap();

    fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(output.status.code(), Some(0));
    if !privileged {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("z_locked"), "stderr: {stderr}");
    }
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 1);
}

#[test]
fn test_unwritable_output_exits_nonzero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();
    let report = dir.path().join("missing-dir").join("result.json");

    let output = dupescan().arg(dir.path()).arg(&report).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DS001"), "stderr: {stderr}");
}

#[test]
fn test_json_errors_flag() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("missing-dir").join("result.json");

    let output = dupescan()
        .arg("--json-errors")
        .arg("-q")
        .arg(dir.path())
        .arg(&report)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["code"], "DS001");
    assert_eq!(value["exit_code"], 1);
}

#[test]
fn test_separator_from_environment() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("x.txt"), b"hello").unwrap();
    fs::write(b.path().join("y.txt"), b"hello").unwrap();
    let out = tempdir().unwrap();
    let report = out.path().join("result.json");

    let roots = format!("{}|{}", a.path().display(), b.path().display());
    let output = dupescan()
        .env("DUPESCAN_SEPARATOR", "|")
        .arg(&roots)
        .arg(&report)
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 1);
}

#[test]
fn test_indent_from_config_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    let out = tempdir().unwrap();
    let config = out.path().join("dupescan.toml");
    fs::write(&config, "indent = 2\n").unwrap();
    let report = out.path().join("result.json");

    let output = dupescan()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .arg(&report)
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("{\n  \""));
}

#[test]
fn test_missing_config_file_exits_nonzero() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("result.json");

    let output = dupescan()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg(dir.path())
        .arg(&report)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!report.exists());
}
