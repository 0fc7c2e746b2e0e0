//! Physical event delivery: on-chain logs -> [`EventHub`] notifications.

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::{Filter, Log};
use alloy_sol_types::SolEvent;
use binding::token::IERC20;
use events::{Channel, ChannelEvent, EventHub};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Scans new blocks for a token's `Transfer`/`Approval` logs and emits the
/// decoded payloads into an [`EventHub`].
///
/// The first poll anchors at the current tip; only events from then on are
/// delivered. Log fetches are retried with backoff since a missed range
/// would silently drop events.
pub struct LogPump<P> {
    provider: P,
    token: Address,
    hub: EventHub,
    next_block: Option<u64>,
}

impl<P> LogPump<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, token: Address, hub: EventHub) -> Self {
        Self {
            provider,
            token,
            hub,
            next_block: None,
        }
    }

    /// Scan blocks since the previous poll and emit decoded events.
    ///
    /// Returns the number of events delivered.
    pub async fn poll(&mut self) -> eyre::Result<usize> {
        let tip = self.provider.get_block_number().await?;
        let from_block = match self.next_block {
            Some(next) if next > tip => return Ok(0),
            Some(next) => next,
            None => tip,
        };

        let logs = self.fetch_logs_with_retry(from_block, tip).await?;

        let mut delivered = 0;
        for log in &logs {
            if let Ok(event) = IERC20::Transfer::decode_log(&log.inner) {
                self.hub.emit(
                    Channel::Transfer,
                    &ChannelEvent::Transfer {
                        from: event.from,
                        to: event.to,
                    },
                );
                delivered += 1;
            } else if let Ok(event) = IERC20::Approval::decode_log(&log.inner) {
                self.hub.emit(
                    Channel::Approval,
                    &ChannelEvent::Approval {
                        owner: event.owner,
                        spender: event.spender,
                    },
                );
                delivered += 1;
            }
        }

        debug!(
            from = from_block,
            to = tip,
            delivered,
            "log poll complete"
        );
        self.next_block = Some(tip + 1);

        Ok(delivered)
    }

    async fn fetch_logs_with_retry(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<Log>> {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);

        Retry::spawn(retry_strategy, || async {
            let filter = Filter::new()
                .address(self.token)
                .from_block(from_block)
                .to_block(to_block);

            self.provider.get_logs(&filter).await.map_err(|e| {
                warn!(
                    from = from_block,
                    to = to_block,
                    error = %e,
                    "log scan failed, will retry"
                );
                e
            })
        })
        .await
        .map_err(Into::into)
    }
}
