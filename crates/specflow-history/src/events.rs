//! History change notifications
//!
//! Editors subscribe to the bus instead of polling the manager. Delivery is
//! best effort: publishing with no subscribers is fine, and a slow
//! subscriber sees `RecvError::Lagged` rather than blocking commits.
//!
//! # Example
//!
//! ```rust
//! use specflow_history::events::{EventBus, HistoryEvent};
//!
//! let bus = EventBus::new();
//! let mut subscriber = bus.subscribe();
//! bus.publish(HistoryEvent::Cleared);
//! assert!(matches!(subscriber.try_recv(), Ok(HistoryEvent::Cleared)));
//! ```

use tokio::sync::broadcast;

use crate::diff::{Impact, Patch};

/// Default channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Something happened to the history
#[derive(Debug, Clone)]
pub enum HistoryEvent {
    /// Baseline was set
    Initialized,
    /// A patch was committed and is now current
    Committed {
        /// The new patch
        patch: Patch,
        /// Its classified severity
        impact: Impact,
        /// Its position
        index: usize,
    },
    /// Position moved back; `None` is the baseline
    Undone {
        /// New position
        index: Option<usize>,
    },
    /// Position moved forward
    Redone {
        /// New position
        index: usize,
    },
    /// Position jumped to a named patch
    Reverted {
        /// Target patch
        patch_id: String,
        /// New position
        index: usize,
    },
    /// History was reset
    Cleared,
}

/// Broadcast channel for [`HistoryEvent`]s
///
/// Clones share the same channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<HistoryEvent>,
}

impl EventBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: HistoryEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }

    /// Receive all events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
