use crate::{Channel, ChannelEvent, Listener, SourceId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Opaque handle to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Channel, Listener)>,
}

/// Per-source event fanout.
///
/// Clones share the same listener table, so a hub can be handed to both the
/// component that emits (the log pump) and the components that subscribe.
/// Listeners must not call back into the hub; the table is locked during
/// delivery.
#[derive(Clone)]
pub struct EventHub {
    id: SourceId,
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            inner: Arc::new(Mutex::new(HubInner::default())),
        }
    }

    /// Identity of the source this hub fans out for.
    pub const fn id(&self) -> SourceId {
        self.id
    }

    /// Attach a listener to a channel.
    pub fn on(&self, channel: Channel, listener: Listener) -> ListenerId {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.push((id, channel, listener));
        debug!(source = ?self.id.address, ?channel, "listener attached");
        id
    }

    /// Detach a listener. Unknown ids are ignored.
    pub fn off(&self, id: ListenerId) {
        let mut inner = lock(&self.inner);
        inner.listeners.retain(|(listener_id, _, _)| *listener_id != id);
    }

    /// Deliver an event to every listener on `channel`.
    pub fn emit(&self, channel: Channel, event: &ChannelEvent) {
        let mut inner = lock(&self.inner);
        for (_, listener_channel, listener) in inner.listeners.iter_mut() {
            if *listener_channel == channel {
                listener(event);
            }
        }
    }

    /// Number of live listeners on a channel.
    pub fn listener_count(&self, channel: Channel) -> usize {
        lock(&self.inner)
            .listeners
            .iter()
            .filter(|(_, listener_channel, _)| *listener_channel == channel)
            .count()
    }
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hub() -> EventHub {
        EventHub::new(SourceId {
            address: Address::from([1u8; 20]),
            account: None,
        })
    }

    fn transfer(from: u8, to: u8) -> ChannelEvent {
        ChannelEvent::Transfer {
            from: Address::from([from; 20]),
            to: Address::from([to; 20]),
        }
    }

    #[test]
    fn emit_reaches_channel_listeners_only() {
        let hub = hub();
        let transfers = Arc::new(AtomicUsize::new(0));
        let approvals = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&transfers);
        hub.on(
            Channel::Transfer,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let counter = Arc::clone(&approvals);
        hub.on(
            Channel::Approval,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        hub.emit(Channel::Transfer, &transfer(2, 3));
        hub.emit(Channel::Transfer, &transfer(3, 2));

        assert_eq!(transfers.load(Ordering::SeqCst), 2);
        assert_eq!(approvals.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn off_detaches_listener() {
        let hub = hub();
        let delivered = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&delivered);
        let id = hub.on(
            Channel::Transfer,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(hub.listener_count(Channel::Transfer), 1);

        hub.off(id);
        assert_eq!(hub.listener_count(Channel::Transfer), 0);

        hub.emit(Channel::Transfer, &transfer(2, 3));
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn emit_without_listeners_is_a_no_op() {
        hub().emit(Channel::Approval, &transfer(2, 3));
    }

    #[test]
    fn listener_receives_payload() {
        let hub = hub();
        let seen = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&seen);
        hub.on(
            Channel::Transfer,
            Box::new(move |event| {
                *slot.lock().unwrap() = Some(*event);
            }),
        );

        let event = transfer(7, 8);
        hub.emit(Channel::Transfer, &event);
        assert_eq!(*seen.lock().unwrap(), Some(event));
    }
}
