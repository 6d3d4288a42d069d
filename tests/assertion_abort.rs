//! A failed assertion must log its context and then abort the process.
//!
//! Each test re-runs this binary filtered to one of the `*_child` tests, which only
//! do anything when their environment variable is set.

use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use sololog::{WriteMode, WriterConfig};
use tempfile::TempDir;

const CHILD_LOG_ENV: &str = "SOLOLOG_ASSERTION_CHILD_LOG";
const DEFAULT_CHILD_LOG_ENV: &str = "SOLOLOG_DEFAULT_ASSERTION_CHILD_LOG";

fn file_only_config(path: String) -> WriterConfig {
    let mut config = WriterConfig::with_path(path);
    config.mode = WriteMode::FileOnly;
    config.force_file_only = false;
    config.banner_on_start = false;
    config
}

/// Re-run this binary filtered to `child`, with `env` pointing at `log_path`
fn run_child(child: &str, env: &str, log_path: &Path) -> ExitStatus {
    Command::new(std::env::current_exe().unwrap())
        .args([child, "--exact", "--nocapture", "--test-threads=1"])
        .env(env, log_path)
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap()
}

#[test]
fn assertion_child() {
    let Ok(path) = std::env::var(CHILD_LOG_ENV) else {
        return;
    };

    let mut config = file_only_config(path);
    config.mode = WriteMode::MemoryThenFile;
    let log = sololog::init(config).unwrap();

    log.info("before assertion");
    let x = -1;
    sololog::log_assert!(x > 0, "x must be positive");

    log.info("unreachable");
}

#[test]
fn failed_assertion_aborts_after_logging() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("assert.log");

    let status = run_child("assertion_child", CHILD_LOG_ENV, &log_path);

    assert!(!status.success(), "child should have aborted");

    // Buffered lines were flushed before the abort
    let content = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("(II) before assertion"));
    assert!(lines[1].contains("\t\t(II) Assertion context: thread '"));
    assert!(lines[2].contains("(FF) "));
    assert!(lines[2].contains(file!()));
    assert!(lines[2].ends_with(" >> x must be positive"));
    assert!(!content.contains("unreachable"));
}

#[test]
fn default_assertion_child() {
    let Ok(path) = std::env::var(DEFAULT_CHILD_LOG_ENV) else {
        return;
    };

    let log = sololog::init(file_only_config(path)).unwrap();
    let ready = false;
    log.assert(ready);

    log.info("unreachable");
}

#[test]
fn failed_assertion_without_message_uses_default() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("default_assert.log");

    let status = run_child("default_assertion_child", DEFAULT_CHILD_LOG_ENV, &log_path);
    assert!(!status.success(), "child should have aborted");

    let content = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("(II) Assertion context: thread '"));
    assert!(lines[1].contains(file!()));
    assert!(lines[1].ends_with(&format!(" >> {}", sololog::ASSERT_FAILED_MESSAGE)));
    assert!(!content.contains("unreachable"));
}
