use crate::{TokenSource, TokenViewState};
use alloy_primitives::Address;
use amount::TokenAmount;
use events::{Channel, ChannelEvent, Subscription};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, RwLock,
    },
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Monotonic request generation for one feed.
///
/// A generation is captured when a read is issued and compared when it
/// completes; a result whose generation is no longer the newest issued is
/// dropped. This is the only cancellation mechanism: a slow in-flight read
/// never overwrites fresher data (last-write-wins by issue order, not by
/// completion order).
#[derive(Debug, Default)]
pub struct FeedGeneration(AtomicU64);

impl FeedGeneration {
    /// Issue a new generation, invalidating all earlier ones.
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` is still the newest issued.
    pub fn is_latest(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

/// Refresh work queued by event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Re-read the connected account's balance.
    Balance,
    /// Re-read the allowance granted to one spender.
    Allowance(Address),
}

/// Owns a [`TokenViewState`] and keeps it current against a
/// [`TokenSource`].
///
/// The synchronizer is the only writer; callers read cloned snapshots via
/// [`state`](Self::state). Every read failure leaves the previous value in
/// place and is recorded in [`last_error`](Self::last_error) rather than
/// surfaced as a hard error.
pub struct Synchronizer<S> {
    source: Option<Arc<S>>,
    state: Arc<RwLock<TokenViewState>>,
    last_error: Arc<Mutex<Option<String>>>,
    supply_generation: FeedGeneration,
    balance_generation: FeedGeneration,
    // The allowance feed is keyed by spender; each key races only with
    // itself, so each gets its own generation counter.
    allowance_generations: Mutex<HashMap<Address, Arc<FeedGeneration>>>,
    transfer_subscription: Subscription,
    approval_subscription: Subscription,
    queue_tx: UnboundedSender<Refresh>,
    queue_rx: UnboundedReceiver<Refresh>,
}

impl<S> Synchronizer<S>
where
    S: TokenSource,
{
    pub fn new() -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            source: None,
            state: Arc::new(RwLock::new(TokenViewState::new(0))),
            last_error: Arc::new(Mutex::new(None)),
            supply_generation: FeedGeneration::default(),
            balance_generation: FeedGeneration::default(),
            allowance_generations: Mutex::new(HashMap::new()),
            transfer_subscription: Subscription::new(),
            approval_subscription: Subscription::new(),
            queue_tx,
            queue_rx,
        }
    }

    /// Bind to a new source (or unbind with `None`), rebinding the event
    /// subscriptions and issuing the dependency-change polls.
    pub async fn set_source(&mut self, source: Option<Arc<S>>) {
        self.source = source;
        self.rebind_subscriptions();
        self.refresh_total_supply().await;
        self.refresh_balance().await;
    }

    /// Current snapshot of the view-state.
    pub fn state(&self) -> TokenViewState {
        read_lock(&self.state).clone()
    }

    /// Most recent feed failure, if any.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    /// Connected account, if the bound source has one.
    pub fn account(&self) -> Option<Address> {
        self.source.as_ref().and_then(|source| source.id().account)
    }

    /// Re-read the total supply (batched) and overwrite the stored value.
    pub async fn refresh_total_supply(&self) {
        let Some(source) = self.source.clone() else {
            return;
        };

        let generation = self.supply_generation.issue();
        match source.total_supply().await {
            Ok((raw, decimals)) => {
                if !self.supply_generation.is_latest(generation) {
                    debug!(generation, "dropping overtaken total supply result");
                    return;
                }
                let mut state = write_lock(&self.state);
                state.decimals = decimals;
                state.total_supply = TokenAmount::from_raw(raw, decimals);
            }
            Err(error) => self.record_error("total_supply", &error),
        }
    }

    /// Re-read the connected account's balance (batched). Skipped entirely
    /// when no account is connected.
    pub async fn refresh_balance(&self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let Some(account) = source.id().account else {
            return;
        };

        let generation = self.balance_generation.issue();
        match source.balance_of(account).await {
            Ok((raw, decimals)) => {
                if !self.balance_generation.is_latest(generation) {
                    debug!(generation, "dropping overtaken balance result");
                    return;
                }
                let mut state = write_lock(&self.state);
                state.decimals = decimals;
                state.balance = TokenAmount::from_raw(raw, decimals);
            }
            Err(error) => self.record_error("balance", &error),
        }
    }

    /// Read one spender's allowance and merge it into the allowance map,
    /// preserving every other entry.
    pub async fn query_allowance_by_spender(&self, spender: Address) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let Some(owner) = source.id().account else {
            return;
        };

        let counter = self.allowance_generation(spender);
        let generation = counter.issue();
        match source.allowance(owner, spender).await {
            Ok(raw) => {
                if !counter.is_latest(generation) {
                    debug!(generation, spender = %spender, "dropping overtaken allowance result");
                    return;
                }
                let mut state = write_lock(&self.state);
                let decimals = state.decimals;
                state
                    .allowance
                    .insert(spender, TokenAmount::from_raw(raw, decimals));
            }
            Err(error) => self.record_error("allowance", &error),
        }
    }

    /// Process all refresh work queued by event handlers, then return.
    pub async fn drain(&mut self) {
        while let Ok(command) = self.queue_rx.try_recv() {
            self.dispatch(command).await;
        }
    }

    /// Process refresh work until the queue closes. Used when the
    /// synchronizer runs as its own task rather than inside a poll loop.
    pub async fn run(&mut self) {
        while let Some(command) = self.queue_rx.recv().await {
            self.dispatch(command).await;
        }
    }

    async fn dispatch(&self, command: Refresh) {
        match command {
            Refresh::Balance => self.refresh_balance().await,
            Refresh::Allowance(spender) => self.query_allowance_by_spender(spender).await,
        }
    }

    fn rebind_subscriptions(&mut self) {
        let Some(source) = &self.source else {
            self.transfer_subscription.release();
            self.approval_subscription.release();
            return;
        };

        let account = source.id().account;

        // A transfer touches the balance only when the connected account is
        // sender or receiver.
        let queue = self.queue_tx.clone();
        self.transfer_subscription
            .bind(Some(source.events()), Channel::Transfer, move |event| {
                let ChannelEvent::Transfer { from, to } = event else {
                    return;
                };
                let Some(account) = account else {
                    return;
                };
                if *from == account || *to == account {
                    let _ = queue.send(Refresh::Balance);
                }
            });

        // An approval matters only when the connected account is the owner.
        let queue = self.queue_tx.clone();
        self.approval_subscription
            .bind(Some(source.events()), Channel::Approval, move |event| {
                let ChannelEvent::Approval { owner, spender } = event else {
                    return;
                };
                if Some(*owner) == account {
                    let _ = queue.send(Refresh::Allowance(*spender));
                }
            });
    }

    fn allowance_generation(&self, spender: Address) -> Arc<FeedGeneration> {
        Arc::clone(
            lock_generations(&self.allowance_generations)
                .entry(spender)
                .or_default(),
        )
    }

    fn record_error(&self, feed: &str, error: &eyre::Report) {
        warn!(feed, error = %error, "feed read failed, keeping previous value");
        *lock(&self.last_error) = Some(format!("{feed}: {error}"));
    }
}

impl<S> Default for Synchronizer<S>
where
    S: TokenSource,
{
    fn default() -> Self {
        Self::new()
    }
}

fn read_lock(state: &RwLock<TokenViewState>) -> std::sync::RwLockReadGuard<'_, TokenViewState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock(state: &RwLock<TokenViewState>) -> std::sync::RwLockWriteGuard<'_, TokenViewState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock(value: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    value.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_generations(
    value: &Mutex<HashMap<Address, Arc<FeedGeneration>>>,
) -> MutexGuard<'_, HashMap<Address, Arc<FeedGeneration>>> {
    value.lock().unwrap_or_else(PoisonError::into_inner)
}
