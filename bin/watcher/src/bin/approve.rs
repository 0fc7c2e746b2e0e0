//! CLI tool to submit a single allowance approval.
//!
//! Reads the watcher config for the RPC endpoint and token, signs with a
//! private key, and runs one dispatcher action:
//! - `--amount 1.5` approves an exact human-scaled amount
//! - `--unlimited` approves the maximum representable amount

use action::dispatch::{ContractBinding, Dispatcher};
use alloy_primitives::Address;
use alloy_provider::Provider;
use amount::TokenAmount;
use clap::Parser;
use std::sync::Arc;
use sync::{RpcTokenSource, Synchronizer};
use tracing::info;
use watcher::config::Config;

#[derive(Parser)]
#[command(name = "approve")]
#[command(about = "Submit a single ERC20 allowance approval")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: String,

    /// Spender to grant the allowance to
    #[arg(short, long)]
    spender: Address,

    /// Human-scaled amount to approve, e.g. "1.5"
    #[arg(short, long, conflicts_with = "unlimited")]
    amount: Option<String>,

    /// Approve the maximum representable amount instead
    #[arg(long)]
    unlimited: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    let token = config.token_address()?;
    let Some(owner) = config.account else {
        eyre::bail!("config needs an account to approve from");
    };

    let provider = client::create_wallet_provider(&config.rpc_url, &cli.private_key)?;
    let chain_id = provider.get_chain_id().await?;

    // The token's decimals are needed to scale the requested amount; a
    // one-shot synchronizer bind fetches them the same way the watcher does.
    let source = Arc::new(RpcTokenSource::new(provider.clone(), token, Some(owner)));
    let mut synchronizer = Synchronizer::new();
    synchronizer.set_source(Some(Arc::clone(&source))).await;
    let state = synchronizer.state();

    let dispatcher = Dispatcher::new(Some(ContractBinding {
        provider,
        chain_id,
        token,
        owner,
    }));

    let receipt = if cli.unlimited {
        info!(spender = %cli.spender, "Approving unlimited allowance");
        dispatcher.approve_infinity(cli.spender).await?
    } else {
        let Some(amount) = cli.amount.as_deref() else {
            eyre::bail!("pass --amount or --unlimited");
        };
        let amount = TokenAmount::parse(amount, state.decimals)?;
        info!(spender = %cli.spender, amount = %amount, "Approving allowance");
        dispatcher.approve(cli.spender, amount.raw()).await?
    };

    info!(
        tx_hash = %receipt.tx_hash,
        block_number = receipt.block_number,
        "Approval confirmed"
    );

    Ok(())
}
