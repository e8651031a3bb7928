//! CLI integration tests for tablemd.
//!
//! These tests verify argument parsing, help output and the exit status
//! for each startup failure. None of them needs a reachable database.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the tablemd binary.
fn cmd() -> Command {
    let mut command = Command::cargo_bin("tablemd").unwrap();
    command.env_remove("TABLEMD_CONFIG").env_remove("RUST_LOG");
    command
}

/// Writes a properties file into a fresh temp directory.
fn config_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tablemd.properties");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PATTERN"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--output-base"))
        .stdout(predicate::str::contains("--prompt-password"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tablemd"));
}

// =============================================================================
// Usage Errors (exit 1)
// =============================================================================

#[test]
fn test_missing_pattern_exits_with_usage_error() {
    cmd().assert().code(1).stderr(predicate::str::contains("PATTERN"));
}

#[test]
fn test_unknown_flag_exits_with_usage_error() {
    cmd()
        .args(["--bogus", "EMP"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_blank_pattern_exits_with_usage_error() {
    let (_dir, path) = config_file("DB_TYPE=oracle\n");
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("  ")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must not be empty"));
}

// =============================================================================
// Configuration Errors (exit 2, 3, 4)
// =============================================================================

#[test]
fn test_missing_config_file_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("--config")
        .arg(dir.path().join("absent.properties"))
        .arg("EMP")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_config_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .env("TABLEMD_CONFIG", dir.path().join("from-env.properties"))
        .arg("EMP")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("from-env.properties"));
}

#[test]
fn test_unsupported_db_type_exits_3() {
    let (_dir, path) = config_file("# legacy\nDB_TYPE=db2\n");
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("EMP")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unsupported DB_TYPE 'db2'"));
}

#[test]
fn test_missing_db_type_exits_3() {
    let (_dir, path) = config_file("OUTPUT_BASE=out\n");
    cmd().arg("--config").arg(&path).arg("EMP").assert().code(3);
}

#[test]
fn test_oracle_without_host_exits_4() {
    let (_dir, path) = config_file("DB_TYPE=oracle\nORA_USER=scott\nORA_SERVICE=ORCL\n");
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("EMP")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ORA_HOST"));
}

#[test]
fn test_oracle_without_service_or_sid_exits_4() {
    let (_dir, path) = config_file("DB_TYPE=ORACLE\nORA_HOST=db\nORA_USER=scott\nORA_PWD=tiger\n");
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("EMP")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("tiger").not());
}

#[test]
fn test_invalid_port_exits_4() {
    let (_dir, path) = config_file("DB_TYPE=sqlserver\nMSSQL_SERVER=db\nMSSQL_PORT=not-a-port\n");
    cmd().arg("--config").arg(&path).arg("EMP").assert().code(4);
}

// =============================================================================
// Backend and Connection Errors (exit 5, 6)
// =============================================================================

#[cfg(not(windows))]
#[test]
fn test_integrated_auth_unavailable_exits_5() {
    let (_dir, path) = config_file(
        "DB_TYPE=sqlserver\nMSSQL_SERVER=127.0.0.1\nMSSQL_DBNAME=Sales\nMSSQL_TRUSTED_CONNECTION=yes\n",
    );
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("EMP")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Hint:"));
}

#[cfg(feature = "mssql")]
#[test]
fn test_unreachable_server_exits_6_without_leaking_password() {
    let (dir, path) = config_file(
        "DB_TYPE=sqlserver\nMSSQL_SERVER=127.0.0.1\nMSSQL_PORT=1\nMSSQL_DBNAME=Sales\n\
         MSSQL_USER=reader\nMSSQL_PWD=s3cr3t-value\n",
    );
    cmd()
        .arg("--config")
        .arg(&path)
        .arg("--output-base")
        .arg(dir.path().join("out"))
        .arg("EMP")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Database connection failed"))
        .stderr(predicate::str::contains("s3cr3t-value").not());

    assert!(!dir.path().join("out").exists());
}
