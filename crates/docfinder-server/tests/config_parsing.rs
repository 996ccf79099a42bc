use std::{env, fs};

use docfinder_server::AppConfig;
use docfinder_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("docfinder.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
base_url = "https://api.docfinder.test"
body_limit_bytes = 2048

[pagination]
default_page_size = 5
max_page_size = 10

[logging]
level = "debug"

[notifications]
enabled = true
from = "DocFinder <no-reply@docfinder.test>"
smtp_host = "smtp.docfinder.test"
smtp_port = 2525

[import]
path = "seed/doctors.csv"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.addr().to_string(), "127.0.0.1:8081");
    assert_eq!(cfg.base_url(), "https://api.docfinder.test");
    assert_eq!(cfg.pagination.default_page_size, 5);
    assert_eq!(cfg.pagination.max_page_size, 10);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");
    assert_eq!(cfg.import.path.as_deref(), Some("seed/doctors.csv"));
    let smtp = cfg.notifications.smtp().expect("smtp configured");
    assert_eq!(smtp.port, 2525);
    assert_eq!(smtp.username, None);

    // 2) Env override should win over file
    unsafe {
        env::set_var("DOCFINDER__SERVER__BODY_LIMIT_BYTES", "4096");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.body_limit_bytes, 4096);
    unsafe {
        env::remove_var("DOCFINDER__SERVER__BODY_LIMIT_BYTES");
    }

    // 3) Invalid config (default > max) should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[pagination]
default_page_size = 50
max_page_size = 10
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("default_page_size must be <="));
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");

    let cfg = load_config(path.to_str()).expect("defaults are valid");
    assert_eq!(cfg.pagination.default_page_size, 12);
    assert_eq!(cfg.pagination.max_page_size, 100);
    assert!(cfg.notifications.enabled);
    assert!(cfg.import.path.is_none());
}

#[test]
fn serialized_defaults_round_trip_through_loader() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("generated.toml");

    let mut cfg = AppConfig::default();
    cfg.server.port = 9100;
    cfg.logging.level = "warn".into();
    fs::write(&path, toml::to_string(&cfg).expect("serialize")).expect("write toml");

    let loaded = load_config(path.to_str()).expect("load generated config");
    assert_eq!(loaded.server.port, 9100);
    assert_eq!(loaded.logging.level, "warn");
}

#[test]
fn smtp_without_sender_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("smtp.toml");
    fs::write(&path, "[notifications]\nsmtp_host = \"smtp.docfinder.test\"\n").expect("write");

    let err = load_config(path.to_str()).expect_err("sender required");
    assert!(err.contains("notifications.from"));
}
