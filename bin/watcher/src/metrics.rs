//! Prometheus metrics for the watcher.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking
//! and management.

use amount::TokenAmount;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use sync::TokenViewState;

/// Aggregated metrics for the watcher.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!("watcher_polls_total", "Total number of poll cycles executed");
        describe_counter!(
            "watcher_poll_failures_total",
            "Total number of failed poll cycles"
        );
        describe_counter!(
            "watcher_events_total",
            "Total number of contract events delivered"
        );

        describe_gauge!(
            "watcher_balance",
            "Current token balance of the connected account (human-scaled)"
        );
        describe_gauge!(
            "watcher_total_supply",
            "Current token total supply (human-scaled)"
        );
        describe_gauge!(
            "watcher_tracked_spenders",
            "Number of spenders with a cached allowance entry"
        );
    }

    /// Record a poll cycle.
    pub fn record_poll(&self, success: bool) {
        counter!("watcher_polls_total").increment(1);
        if !success {
            counter!("watcher_poll_failures_total").increment(1);
        }
    }

    /// Record delivered contract events.
    pub fn record_events(&self, delivered: usize) {
        counter!("watcher_events_total").increment(delivered as u64);
    }

    /// Publish the current view-state.
    pub fn record_state(&self, state: &TokenViewState) {
        gauge!("watcher_balance").set(gauge_value(&state.balance));
        gauge!("watcher_total_supply").set(gauge_value(&state.total_supply));
        gauge!("watcher_tracked_spenders").set(state.allowance.len() as f64);
    }
}

// Gauges are f64; going through the human-scaled rendering is lossy but
// that is inherent to exporting a 256-bit amount as a gauge.
fn gauge_value(amount: &TokenAmount) -> f64 {
    amount.to_string().parse().unwrap_or(0.0)
}
