use metrics_exporter_prometheus::PrometheusBuilder;
use std::{sync::Arc, time::Duration};
use sync::{LogPump, RpcTokenSource, Synchronizer, TokenSource};
use tokio::time;
use tracing::{error, info};
use watcher::{config::Config, metrics::Metrics, run_cycle};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting token watcher");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    info!("Loading config: {}", config_path);
    let config = Config::from_file(&config_path)?;
    let token = config.token_address()?;

    info!("Loaded config:");
    info!("  RPC URL: {}", config.rpc_url);
    info!("  Token: {}", token);
    match config.account {
        Some(account) => info!("  Account: {}", account),
        None => info!("  Account: none (balance feed disabled)"),
    }

    PrometheusBuilder::new().install()?;
    let metrics = Metrics::new();

    info!("Connecting to RPC...");
    let provider = client::create_provider(&config.rpc_url).await?;

    let source = Arc::new(RpcTokenSource::new(
        provider.clone(),
        token,
        config.account,
    ));
    let mut pump = LogPump::new(provider, token, source.events().clone());

    let mut synchronizer = Synchronizer::new();
    synchronizer.set_source(Some(Arc::clone(&source))).await;

    for spender in &config.spenders {
        synchronizer.query_allowance_by_spender(*spender).await;
    }

    info!("Starting watch loop...");

    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs));

    loop {
        interval.tick().await;

        match run_cycle(&mut pump, &mut synchronizer, &metrics).await {
            Ok(state) => {
                metrics.record_poll(true);
                info!(
                    balance = %state.balance,
                    total_supply = %state.total_supply,
                    spenders = state.allowance.len(),
                    "token state"
                );
            }
            Err(e) => {
                metrics.record_poll(false);
                error!("watch cycle failed: {}", e);
            }
        }
    }
}
