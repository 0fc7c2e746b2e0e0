//! Event fanout and identity-stable subscriptions for contract bindings.
//!
//! A contract binding emits push notifications on named channels
//! (`Transfer`, `Approval`). Two pieces live here:
//!
//! - [`EventHub`]: per-source fanout with `on`/`off`/`emit`, at most one
//!   delivery path per registered listener.
//! - [`Subscription`]: keeps exactly one physical listener alive per
//!   `(source, channel)` identity while letting the handler logic be
//!   hot-swapped on every rebind. The physical listener dereferences a
//!   shared handler cell at call time, so replacing the handler never
//!   requires a resubscribe and never drops events in between.

mod hub;
mod subscription;

pub use hub::{EventHub, ListenerId};
pub use subscription::Subscription;

use alloy_primitives::Address;

/// A named notification channel on a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Transfer,
    Approval,
}

/// Decoded payload of a channel notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Tokens moved between `from` and `to`.
    Transfer { from: Address, to: Address },
    /// `owner` set an allowance for `spender`.
    Approval { owner: Address, spender: Address },
}

/// Identity of an external source binding: the bound contract address plus
/// the connected account, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub address: Address,
    pub account: Option<Address>,
}

/// A listener attached to a channel. Handler failures (panics aside) are the
/// handler's own concern; the hub only forwards payloads.
pub type Listener = Box<dyn FnMut(&ChannelEvent) + Send>;
