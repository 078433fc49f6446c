//! Config loading, TOML parsing, and env var override tests.
//!
//! `test_load_config_from_cwd` is `#[ignore]` (it chdirs and conflicts in parallel).
//! Run it with: `cargo test --test config_tests -- --ignored --test-threads=1`
//!
//! Only `test_env_overrides_file` sets an environment variable, and it uses
//! `ERPSIM_QUERY__MAX_ROWS`, which no other test here asserts on.

use chrono::NaiveDate;
use erpsim::{Config, Engine};
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(temp: &TempDir, name: &str, content: &str) -> String {
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// Default Configuration Tests
#[test]
fn test_config_default_data() {
    let config = Config::default();
    assert_eq!(config.data.master_seed, 42);
    assert_eq!(config.data.window_days, 365);
    assert!(config.data.anchor_date.is_none());
}

#[test]
fn test_config_default_http() {
    let config = Config::default();
    assert_eq!(config.http.host, "127.0.0.1");
    assert_eq!(config.http.port, 5000);
    assert!(!config.http.cors_allow_all);
}

#[test]
fn test_config_default_logging() {
    let config = Config::default();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
}

// TOML File Parsing Tests
#[test]
fn test_from_file_reads_all_sections() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "erpsim.toml",
        r#"
[data]
master_seed = 7
anchor_date = "2025-06-30"
window_days = 90

[variance]
band = 0.05

[logging]
level = "debug"
format = "json"

[http]
host = "0.0.0.0"
port = 8080
cors_origins = ["http://localhost:3000"]
"#,
    );

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.data.master_seed, 7);
    assert_eq!(config.data.anchor_date, NaiveDate::from_ymd_opt(2025, 6, 30));
    assert_eq!(config.data.window_days, 90);
    assert!((config.variance.band - 0.05).abs() < f64::EPSILON);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.http.cors_origins, vec!["http://localhost:3000"]);
}

#[test]
fn test_from_file_partial_keeps_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "partial.toml", "[data]\nmaster_seed = 99\n");

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.data.master_seed, 99);
    assert_eq!(config.data.window_days, 365);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.http.port, 5000);
}

#[test]
fn test_from_missing_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    let config = Config::from_file(&path.to_string_lossy()).unwrap();

    assert_eq!(config.data.master_seed, 42);
}

#[test]
fn test_from_file_rejects_bad_types() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "bad.toml", "[http]\nport = \"not a port\"\n");

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_from_file_rejects_bad_anchor_date() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "bad_date.toml", "[data]\nanchor_date = \"30/06/2025\"\n");

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_env_overrides_file() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "env.toml", "[query]\nmax_rows = 10\n");

    env::set_var("ERPSIM_QUERY__MAX_ROWS", "25");
    let config = Config::from_file(&path);
    env::remove_var("ERPSIM_QUERY__MAX_ROWS");

    assert_eq!(config.unwrap().query.max_rows, 25);
}

#[test]
fn test_loaded_config_drives_engine() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "engine.toml",
        "[data]\nmaster_seed = 3\nanchor_date = \"2025-01-31\"\nwindow_days = 30\n",
    );

    let config = Config::from_file(&path).unwrap();
    let engine = Engine::from_config(&config).unwrap();

    assert_eq!(engine.settings().master_seed, 3);
    assert_eq!(
        engine.settings().window_start(),
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    );
}

#[test]
#[ignore = "Requires --test-threads=1 due to directory change"]
fn test_load_config_from_cwd() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "config.toml", "[data]\nmaster_seed = 5\n\n[http]\nport = 6000\n");
    write_config(&temp, "config.local.toml", "[http]\nport = 6001\n");

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp.path()).unwrap();

    let config = Config::load();

    env::set_current_dir(original_dir).unwrap();

    let config = config.unwrap();
    assert_eq!(config.data.master_seed, 5);
    // config.local.toml wins over config.toml
    assert_eq!(config.http.port, 6001);
}
