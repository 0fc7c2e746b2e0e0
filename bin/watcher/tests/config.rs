//! Tests for watcher configuration loading and token resolution.

use alloy_primitives::address;
use watcher::config::{Config, TokenPreset};

fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn explicit_token_address_wins() {
    let path = write_config(
        "watcher-test-explicit.toml",
        r#"
            rpc_url = "http://localhost:8545"
            token_address = "0x1111111111111111111111111111111111111111"
            network = "Mainnet"
            token = "usdc"
        "#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(
        config.token_address().unwrap(),
        address!("1111111111111111111111111111111111111111")
    );
}

#[test]
fn network_preset_resolves_token() {
    let path = write_config(
        "watcher-test-preset.toml",
        r#"
            rpc_url = "http://localhost:8545"
            network = "Mainnet"
            token = "usdc"
            account = "0x2222222222222222222222222222222222222222"
            spenders = ["0x3333333333333333333333333333333333333333"]
        "#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.token, Some(TokenPreset::Usdc));
    assert_eq!(
        config.token_address().unwrap(),
        address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
    );
    assert_eq!(config.spenders.len(), 1);
    assert_eq!(config.poll_interval_secs, 12);
}

#[test]
fn preset_defaults_to_weth() {
    let path = write_config(
        "watcher-test-weth.toml",
        r#"
            rpc_url = "http://localhost:8545"
            network = "Testnet"
        "#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(
        config.token_address().unwrap(),
        address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")
    );
}

#[test]
fn missing_token_and_network_is_an_error() {
    let path = write_config(
        "watcher-test-missing.toml",
        r#"
            rpc_url = "http://localhost:8545"
        "#,
    );

    let config = Config::from_file(&path).unwrap();
    assert!(config.token_address().is_err());
}

#[test]
fn malformed_config_is_an_error() {
    let path = write_config("watcher-test-bad.toml", "rpc_url = [not toml");
    assert!(Config::from_file(&path).is_err());
}
