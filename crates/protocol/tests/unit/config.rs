//! # Configuration Tests
//!
//! Defaults, JSON deserialization, and partial documents.

use epdload_core::config::*;
use epdload_core::image::Panel;
use epdload_core::protocol::AckPolicy;

use crate::common::harness::temp_file;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.link.kind, LinkKind::DeviceFile);
    assert_eq!(config.link.baud_rate, 115_200);
    assert_eq!(config.link.timeout_ms, 60_000);
    assert_eq!(config.ack_policy, AckPolicy::Warn);
    assert_eq!(config.panel, None);
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.link, LinkConfig::default());
    assert_eq!(config.ack_policy, AckPolicy::Warn);
}

#[test]
fn test_full_json() {
    let json = r#"{
        "link": { "kind": "serial", "baud_rate": 9600, "timeout_ms": 500 },
        "ack_policy": "strict",
        "panel": "2.7"
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.link.kind, LinkKind::Serial);
    assert_eq!(config.link.baud_rate, 9600);
    assert_eq!(config.link.timeout_ms, 500);
    assert_eq!(config.ack_policy, AckPolicy::Strict);
    assert_eq!(config.panel, Some(Panel::Epd270));
}

#[test]
fn test_partial_link_section_keeps_other_defaults() {
    let config = Config::from_json_str(r#"{ "link": { "baud_rate": 57600 } }"#).unwrap();
    assert_eq!(config.link.kind, LinkKind::DeviceFile);
    assert_eq!(config.link.baud_rate, 57600);
    assert_eq!(config.link.timeout_ms, 60_000);
}

#[test]
fn test_link_kind_aliases() {
    for alias in ["device_file", "file", "device"] {
        let json = format!(r#"{{ "link": {{ "kind": "{alias}" }} }}"#);
        let config = Config::from_json_str(&json).unwrap();
        assert_eq!(config.link.kind, LinkKind::DeviceFile, "alias {alias}");
    }
}

#[test]
fn test_unknown_policy_is_rejected() {
    let err = Config::from_json_str(r#"{ "ack_policy": "sometimes" }"#).unwrap_err();
    assert!(err.to_string().starts_with("could not parse inline JSON"));
}

#[test]
fn test_from_json_file() {
    let file = temp_file(r#"{ "ack_policy": "ignore", "panel": "1.44" }"#);
    let config = Config::from_json_file(file.path()).unwrap();
    assert_eq!(config.ack_policy, AckPolicy::Ignore);
    assert_eq!(config.panel, Some(Panel::Epd144));
}

#[test]
fn test_missing_file_reports_path() {
    let err = Config::from_json_file("/nonexistent/epdload.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/epdload.json"));
}
