use crate::{Channel, ChannelEvent, EventHub, Listener, ListenerId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

type HandlerCell = Arc<Mutex<Option<Listener>>>;

struct Bound {
    hub: EventHub,
    channel: Channel,
    listener: ListenerId,
}

/// An identity-stable subscription with a hot-swappable handler.
///
/// `bind` splits the two concerns the naive approach conflates:
///
/// 1. The handler cell is replaced on every call, so the next delivered
///    event always runs the most recently supplied closure, even when that
///    closure captures state that changed since the physical listener was
///    installed.
/// 2. The physical listener (a thin indirection that dereferences the cell
///    at call time) is torn down and re-installed only when the
///    `(source, channel)` identity changes. Resubscribing on every handler
///    change would open a window where events are missed.
///
/// At most one physical listener exists per subscription at any instant,
/// and none once the subscription is dropped.
pub struct Subscription {
    cell: HandlerCell,
    bound: Option<Bound>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(None)),
            bound: None,
        }
    }

    /// Point this subscription at `(source, channel)` with a fresh handler.
    ///
    /// Passing `None` as the source releases any existing listener; the
    /// absent-prerequisite state is expected during startup, not an error.
    pub fn bind<F>(&mut self, source: Option<&EventHub>, channel: Channel, handler: F)
    where
        F: FnMut(&ChannelEvent) + Send + 'static,
    {
        *lock(&self.cell) = Some(Box::new(handler));

        let Some(hub) = source else {
            self.release();
            return;
        };

        if let Some(bound) = &self.bound {
            if bound.hub.id() == hub.id() && bound.channel == channel {
                // Same identity: the refreshed cell is all that was needed.
                return;
            }
        }

        self.release();

        let cell = Arc::clone(&self.cell);
        let listener = hub.on(
            channel,
            Box::new(move |event| {
                if let Some(handler) = lock(&cell).as_mut() {
                    handler(event);
                }
            }),
        );
        debug!(source = ?hub.id().address, ?channel, "subscription bound");
        self.bound = Some(Bound {
            hub: hub.clone(),
            channel,
            listener,
        });
    }

    /// Remove the physical listener, if any.
    pub fn release(&mut self) {
        if let Some(bound) = self.bound.take() {
            bound.hub.off(bound.listener);
            debug!(source = ?bound.hub.id().address, channel = ?bound.channel, "subscription released");
        }
    }

    /// Whether a physical listener is currently installed.
    pub const fn is_bound(&self) -> bool {
        self.bound.is_some()
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock(cell: &Mutex<Option<Listener>>) -> MutexGuard<'_, Option<Listener>> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
