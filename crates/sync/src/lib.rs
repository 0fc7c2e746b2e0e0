//! Derived token view-state kept current from three feeds.
//!
//! The [`Synchronizer`] owns a [`TokenViewState`] and is its only writer.
//! Three kinds of input converge on it:
//!
//! - dependency-change polls (total supply, balance) issued whenever the
//!   bound source changes, each a single batched Multicall round trip;
//! - on-demand allowance queries, merged non-destructively into the
//!   allowance map;
//! - push updates decoded from on-chain `Transfer`/`Approval` logs,
//!   delivered through the `events` crate's identity-stable subscriptions.
//!
//! Per-feed generation counters drop results that were overtaken by a
//! newer request, so completion-order races never regress the state.

pub mod pump;
pub mod source;
pub mod synchronizer;

pub use pump::LogPump;
pub use source::RpcTokenSource;
pub use synchronizer::{FeedGeneration, Refresh, Synchronizer};

use alloy_primitives::{Address, U256};
use amount::TokenAmount;
use events::{EventHub, SourceId};
use serde::Serialize;
use std::{collections::HashMap, future::Future};

/// Best-known snapshot of a token's state for one connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenViewState {
    /// Balance of the connected account
    pub balance: TokenAmount,
    /// Total token supply
    pub total_supply: TokenAmount,
    /// Lazily populated allowance per spender; entries exist only for
    /// spenders explicitly queried or observed via an `Approval` event
    pub allowance: HashMap<Address, TokenAmount>,
    /// Fixed-point scale; immutable for the lifetime of the bound address
    pub decimals: u8,
}

impl TokenViewState {
    pub fn new(decimals: u8) -> Self {
        Self {
            balance: TokenAmount::zero(decimals),
            total_supply: TokenAmount::zero(decimals),
            allowance: HashMap::new(),
            decimals,
        }
    }
}

/// A remote token object: batched/single reads plus a push-event fanout.
///
/// Sources are identified by `(token address, connected account)`; the
/// synchronizer re-subscribes and re-polls when that identity changes.
pub trait TokenSource: Send + Sync {
    /// Identity of the bound (token address, account) pair.
    fn id(&self) -> SourceId;

    /// Batched read: total supply and decimals in one round trip.
    fn total_supply(&self) -> impl Future<Output = eyre::Result<(U256, u8)>> + Send;

    /// Batched read: account balance and decimals in one round trip.
    fn balance_of(&self, account: Address)
        -> impl Future<Output = eyre::Result<(U256, u8)>> + Send;

    /// Single read: allowance granted by `owner` to `spender`.
    fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = eyre::Result<U256>> + Send;

    /// Push-notification fanout for this source.
    fn events(&self) -> &EventHub;
}
