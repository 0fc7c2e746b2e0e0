pub mod config;
pub mod metrics;

use crate::metrics::Metrics;
use alloy_provider::Provider;
use sync::{LogPump, RpcTokenSource, Synchronizer, TokenViewState};

/// One cycle of the watch loop: pump new logs into the event hub, let the
/// synchronizer work through the refreshes those events queued, then report
/// the resulting snapshot.
pub async fn run_cycle<P>(
    pump: &mut LogPump<P>,
    synchronizer: &mut Synchronizer<RpcTokenSource<P>>,
    metrics: &Metrics,
) -> eyre::Result<TokenViewState>
where
    P: Provider + Clone,
{
    let delivered = pump.poll().await?;
    metrics.record_events(delivered);

    synchronizer.drain().await;

    let state = synchronizer.state();
    metrics.record_state(&state);

    Ok(state)
}
