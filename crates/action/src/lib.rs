pub mod approve;
pub mod dispatch;

use alloy_primitives::{TxHash, U256};
use std::future::Future;

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    fn is_ready(&self) -> bool;

    /// Check if the action has already been completed.
    ///
    /// Returns true if the current onchain state already satisfies the
    /// action's outcome.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Execute the action.
    ///
    /// Resolves to the receipt of the executed action, or the failure
    /// reason; no intermediate submitted-but-unconfirmed state is exposed.
    fn execute(&self) -> impl Future<Output = eyre::Result<ActionReceipt>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Outcome of a successfully executed action.
#[derive(Debug, Clone)]
pub struct ActionReceipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where the transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<U256>,
}

#[cfg(test)]
pub(crate) mod test_utils {
    use alloy_provider::{network::Ethereum, Provider, RootProvider};

    /// Mock provider for unit tests. Panics on any network access, which
    /// makes it a tripwire for paths that must stay offline.
    #[derive(Clone)]
    pub struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }
}
