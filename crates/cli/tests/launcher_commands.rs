//! Integration tests for the launcher commands and the output envelope,
//! driven through the real binary with throwaway lifecycle scripts.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Helper to get the jarvis binary path
fn jarvis_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("jarvis");
    path
}

fn run_jarvis(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(jarvis_binary())
        .args(args)
        .output()
        .expect("Failed to execute jarvis");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (output.status.success(), stdout, stderr)
}

#[cfg(unix)]
fn write_script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("jarvis.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
fn write_config(dir: &Path, script: &Path) -> PathBuf {
    let path = dir.join("jarvis.toml");
    std::fs::write(
        &path,
        format!("[launcher]\nlifecycle_script = \"{}\"\n", script.display()),
    )
    .unwrap();
    path
}

#[cfg(unix)]
#[test]
fn bye_reports_goodbye_in_the_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 0");
    let config = write_config(dir.path(), &script);

    let (ok, stdout, _stderr) = run_jarvis(&["--config", config.to_str().unwrap(), "bye"]);
    assert!(ok, "bye failed: {stdout}");

    let envelope: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(envelope["ok"], serde_json::json!(true));
    assert_eq!(envelope["command"], serde_json::json!("bye"));
    assert_eq!(envelope["data"]["status"], serde_json::json!("Goodbye!"));
    assert!(envelope["timings"]["durationMs"].is_u64());
}

#[cfg(unix)]
#[test]
fn hello_exports_identity_to_the_hook_child_only() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("env.txt");
    let script = write_script(
        dir.path(),
        &format!(
            "printf '%s %s %s' \"$1\" \"$GITHUB_EMAIL\" \"$GITHUB_USERNAME\" > '{}'",
            capture.display()
        ),
    );
    let config = write_config(dir.path(), &script);

    let (ok, stdout, _stderr) = run_jarvis(&[
        "--config",
        config.to_str().unwrap(),
        "hello",
        "--email",
        "dev@example.com",
        "--username",
        "dev",
    ]);
    assert!(ok, "hello failed: {stdout}");

    let envelope: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        envelope["data"]["status"],
        serde_json::json!("Hello command executed")
    );

    // The hook saw the identity through its own environment.
    let captured = std::fs::read_to_string(&capture).unwrap();
    assert_eq!(captured, "hello dev@example.com dev");
}

#[cfg(unix)]
#[test]
fn bye_hook_does_not_inherit_the_hello_identity() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("env.txt");
    let script = write_script(
        dir.path(),
        &format!(
            "if [ \"$1\" = bye ]; then printf 'x%s' \"$GITHUB_EMAIL\" > '{}'; fi",
            capture.display()
        ),
    );
    let config = write_config(dir.path(), &script);

    let (ok, _stdout, _stderr) = run_jarvis(&[
        "--config",
        config.to_str().unwrap(),
        "hello",
        "--email",
        "dev@example.com",
    ]);
    assert!(ok);
    let (ok, _stdout, _stderr) = run_jarvis(&["--config", config.to_str().unwrap(), "bye"]);
    assert!(ok);

    let captured = std::fs::read_to_string(&capture).unwrap();
    assert_eq!(captured, "x");
}

#[test]
fn empty_clone_is_a_noop_reporting_ready() {
    let (ok, stdout, _stderr) = run_jarvis(&["clone"]);
    assert!(ok, "clone failed: {stdout}");

    let envelope: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(envelope["ok"], serde_json::json!(true));
    assert_eq!(envelope["command"], serde_json::json!("clone"));
    assert_eq!(envelope["data"]["status"], serde_json::json!("Ready"));
}

#[cfg(unix)]
#[test]
fn failing_hook_surfaces_a_script_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), Path::new("/nonexistent/jarvis.sh"));

    let (ok, stdout, stderr) = run_jarvis(&["--config", config.to_str().unwrap(), "bye"]);
    assert!(!ok);
    assert!(stderr.contains("SCRIPT_FAILED"), "stderr: {stderr}");

    let envelope: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(envelope["ok"], serde_json::json!(false));
    assert_eq!(envelope["error"]["code"], serde_json::json!("SCRIPT_FAILED"));
}

#[test]
fn missing_config_file_fails_with_config_error() {
    let (ok, stdout, stderr) = run_jarvis(&["--config", "/nonexistent/jarvis.toml", "bye"]);
    assert!(!ok);
    assert!(stderr.contains("CONFIG_ERROR"), "stderr: {stderr}");

    let envelope: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(envelope["ok"], serde_json::json!(false));
    assert_eq!(envelope["error"]["code"], serde_json::json!("CONFIG_ERROR"));
}

#[cfg(unix)]
#[test]
fn text_format_prints_the_status_in_plain_form() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 0");
    let config = write_config(dir.path(), &script);

    let (ok, stdout, _stderr) = run_jarvis(&[
        "--config",
        config.to_str().unwrap(),
        "--format",
        "text",
        "bye",
    ]);
    assert!(ok);
    assert!(stdout.contains("Goodbye!"));
    assert!(stdout.contains("Completed in"));
}
