//! Configuration types for the token watcher.
//!
//! This crate provides:
//! - Network presets (mainnet, testnet) with canonical token addresses
//! - A builder for overriding individual addresses

pub mod network;

pub use network::{ChainConfig, NetworkConfig, NetworkConfigBuilder, NetworkType};
