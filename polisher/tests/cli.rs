//! CLI tests for the `polisher` binary.
//!
//! Spawns the binary in a temp directory and checks exit codes for paths that
//! never reach the completion service.

use std::fs;
use std::process::{Command, Stdio};

use polisher::exit_codes;
use polisher::io::config::{PolisherConfig, load_config};

fn polisher(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_polisher"));
    cmd.current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_ORG_ID")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null());
    cmd
}

#[test]
fn dry_run_prints_prompts_and_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("main.py"), "def main():\n    return 1\n").expect("write");

    let output = polisher(temp.path())
        .args(["--dry-run", "--mode", "optimize", "main.py"])
        .output()
        .expect("polisher --dry-run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("preview: source_bytes=25"));
    assert!(stdout.contains("== classify ("));
    assert!(stdout.contains("task is to Optimize"));
    assert_eq!(
        fs::read_to_string(temp.path().join("main.py")).expect("read"),
        "def main():\n    return 1\n"
    );
}

#[test]
fn closed_stdin_exits_with_input_closed_code() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = polisher(temp.path()).output().expect("polisher");

    assert_eq!(output.status.code(), Some(exit_codes::INPUT_CLOSED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input closed"));
}

#[test]
fn missing_target_file_exits_failed() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = polisher(temp.path())
        .args(["missing.js", "--mode", "refactor", "--recursive", "false"])
        .output()
        .expect("polisher");

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing.js"));
}

#[test]
fn invalid_config_exits_failed() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("polisher.toml"), "request_timeout_secs = 0\n").expect("write");

    let output = polisher(temp.path())
        .args(["--dry-run", "anything.js"])
        .output()
        .expect("polisher");

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("request_timeout_secs"));
}

#[test]
fn init_config_writes_loadable_defaults_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("polisher.toml");

    let output = polisher(temp.path())
        .arg("--init-config")
        .output()
        .expect("polisher --init-config");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        load_config(&path).expect("load written config"),
        PolisherConfig::default()
    );

    // A second run refuses to clobber an edited file.
    fs::write(&path, "max_rounds = 3\n").expect("edit");
    let output = polisher(temp.path())
        .arg("--init-config")
        .output()
        .expect("polisher --init-config");
    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(fs::read_to_string(&path).expect("read"), "max_rounds = 3\n");

    let output = polisher(temp.path())
        .args(["--init-config", "--force"])
        .output()
        .expect("polisher --init-config --force");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        load_config(&path).expect("load overwritten config"),
        PolisherConfig::default()
    );
}
