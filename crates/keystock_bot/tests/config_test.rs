//! Tests for bot configuration.

use keystock_bot::{BotConfig, RoleIds};
use std::path::{Path, PathBuf};
use std::time::Duration;

const REQUIRED: &str = r#"
discord_token = "token"
admin_role_id = 11
client_role_id = 22
admin_channel_id = 33
"#;

#[test]
fn test_defaults_fill_optional_keys() {
    let config = BotConfig::from_toml_str(REQUIRED).unwrap();

    assert_eq!(*config.port(), 8000);
    assert_eq!(config.stock_path(), &PathBuf::from("stock.json"));
    assert_eq!(config.legacy_import_path(), Some(Path::new("stock.txt")));
    assert_eq!(config.command_prefix(), "!");
    assert_eq!(config.delivery_timeout(), Duration::from_secs(30));
    assert_eq!(
        config.role_ids(),
        RoleIds {
            issuer: 11,
            consumer: 22
        }
    );
    assert_eq!(*config.admin_channel_id(), 33);
}

#[test]
fn test_overrides_are_respected() {
    let contents = format!(
        "{REQUIRED}\nport = 9090\nstock_path = \"data/keys.json\"\nlegacy_stock_path = \"\"\ncommand_prefix = \"$\"\n"
    );
    let config = BotConfig::from_toml_str(&contents).unwrap();

    assert_eq!(*config.port(), 9090);
    assert_eq!(config.stock_path(), &PathBuf::from("data/keys.json"));
    assert_eq!(config.legacy_import_path(), None);
    assert_eq!(config.command_prefix(), "$");
}

#[test]
fn test_missing_token_is_rejected() {
    let err = BotConfig::from_toml_str("admin_role_id = 1\nclient_role_id = 2\nadmin_channel_id = 3\n")
        .unwrap_err();
    assert!(format!("{err}").contains("Configuration Error"));
}

#[test]
fn test_blank_token_is_rejected() {
    let contents = REQUIRED.replace("\"token\"", "\"   \"");
    let err = BotConfig::from_toml_str(&contents).unwrap_err();
    assert!(format!("{err}").contains("discord_token"));
}

#[test]
fn test_zero_ids_are_rejected() {
    let contents = REQUIRED.replace("admin_channel_id = 33", "admin_channel_id = 0");
    let err = BotConfig::from_toml_str(&contents).unwrap_err();
    assert!(format!("{err}").contains("admin_channel_id"));
}

#[test]
fn test_zero_delivery_timeout_is_rejected() {
    let contents = format!("{REQUIRED}\ndelivery_timeout_secs = 0\n");
    let err = BotConfig::from_toml_str(&contents).unwrap_err();
    assert!(format!("{err}").contains("delivery_timeout_secs"));
}

#[test]
fn test_explicit_config_file_must_exist() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(BotConfig::load(Some(missing.as_path())).is_err());
}
