use alloy_primitives::Address;
use config::{NetworkConfig, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named token preset resolved against the network configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPreset {
    Weth,
    Usdc,
}

/// Top-level watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url
    pub rpc_url: String,

    /// Explicit token contract address; overrides any preset
    pub token_address: Option<Address>,

    /// Network preset used when no explicit token address is given
    pub network: Option<NetworkType>,

    /// Which preset token to watch (defaults to WETH)
    pub token: Option<TokenPreset>,

    /// Connected account whose balance and allowances are tracked
    pub account: Option<Address>,

    /// Spenders whose allowance is queried once at startup
    #[serde(default)]
    pub spenders: Vec<Address>,

    /// Poll interval in seconds (defaults to one Ethereum block)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

const fn default_poll_interval_secs() -> u64 {
    12
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Resolve the token address: explicit address first, then the network
    /// preset.
    pub fn token_address(&self) -> eyre::Result<Address> {
        if let Some(address) = self.token_address {
            return Ok(address);
        }

        let Some(network) = self.network else {
            eyre::bail!("config needs either token_address or a network preset");
        };

        let chain = NetworkConfig::from_network_type(network).chain;
        Ok(match self.token.unwrap_or(TokenPreset::Weth) {
            TokenPreset::Weth => chain.weth,
            TokenPreset::Usdc => chain.usdc,
        })
    }
}
