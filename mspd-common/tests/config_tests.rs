//! Integration tests for configuration file resolution
//!
//! Covers explicit paths, missing files and the fallback to built-in defaults.

use mspd_common::config::{ConfigSource, TomlConfig};
use mspd_common::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_explicit_config_is_loaded() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        "[player]\nhttp_timeout_secs = 3\n\n[logging]\nlevel = \"debug\""
    )
    .unwrap();

    let (config, source) = TomlConfig::resolve(Some(file.path())).expect("Config should load");

    assert_eq!(source, ConfigSource::Explicit(file.path().to_path_buf()));
    assert_eq!(config.player.http_timeout_secs, 3);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = TomlConfig::resolve(Some(&missing));

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("nope.toml")),
        other => panic!("Expected Config error, got {:?}", other.map(|(_, s)| s)),
    }
}

#[test]
fn test_explicit_invalid_config_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[daemon]\nstations = \"not a list\"").unwrap();

    let result = TomlConfig::resolve(Some(file.path()));

    assert!(matches!(result, Err(Error::TomlParse { .. })));
}

#[test]
fn test_load_reads_daemon_section() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[daemon]
listen = "127.0.0.1:9000"
run_dir = "/tmp/mspd-run"
stations = ["a"]

[stations.a]
name = "Station A"
url = "http://a.example/stream"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();

    assert_eq!(config.daemon.listen, "127.0.0.1:9000");
    assert_eq!(config.daemon.run_dir, PathBuf::from("/tmp/mspd-run"));
    assert_eq!(config.stations["a"].name, "Station A");
}
