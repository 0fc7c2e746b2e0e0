//! Network presets for watching well-known tokens.
//!
//! Provides chain ids, block times and canonical token addresses so a
//! deployment only has to pick a network and, optionally, a token.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Per-chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (12 for Ethereum); also the natural poll cadence
    pub block_time_secs: u64,
    /// Canonical WETH address
    pub weth: Address,
    /// Canonical USDC address
    pub usdc: Address,
}

impl ChainConfig {
    /// Ethereum mainnet.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            block_time_secs: 12,
            weth: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            // https://etherscan.io/address/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48
            usdc: address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        }
    }

    /// Ethereum Sepolia testnet.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            block_time_secs: 12,
            weth: address!("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
            // https://sepolia.etherscan.io/address/0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238
            usdc: address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
        }
    }
}

/// Complete network configuration for the watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain parameters and token addresses
    pub chain: ChainConfig,
}

impl NetworkConfig {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain: ChainConfig::mainnet(),
        }
    }

    /// Create testnet (Sepolia) configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain: ChainConfig::sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    chain: ChainConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain: ChainConfig::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain: ChainConfig::sepolia(),
        }
    }

    /// Override the WETH address.
    pub const fn weth(mut self, address: Address) -> Self {
        self.chain.weth = address;
        self
    }

    /// Override the USDC address.
    pub const fn usdc(mut self, address: Address) -> Self {
        self.chain.usdc = address;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            chain: self.chain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.chain.chain_id, 1);
        assert_eq!(config.chain.block_time_secs, 12);
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.chain.chain_id, 11155111);
        assert_eq!(config.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_token = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::mainnet().usdc(custom_token).build();

        assert_eq!(config.chain.usdc, custom_token);
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }
}
