//! Notification hub with explicit subscription handles.
//!
//! Listeners call [`BroadcastHub::subscribe`] and keep the returned
//! [`Subscription`] for as long as they want events. Dropping it (or calling
//! [`Subscription::unsubscribe`]) detaches the listener.

use delegate_core::{Broadcaster, Notification};
use delegate_domain::constants::BROADCAST_CAPACITY;
use delegate_domain::Result;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<Notification>,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(BROADCAST_CAPACITY)
    }
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription { receiver: self.sender.subscribe() }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Broadcaster for BroadcastHub {
    /// Having no subscribers is not an error; the event is simply dropped.
    fn publish(&self, notification: Notification) -> Result<usize> {
        match self.sender.send(notification) {
            Ok(receivers) => Ok(receivers),
            Err(broadcast::error::SendError(notification)) => {
                debug!(event = notification.event_name(), "no subscribers for notification");
                Ok(0)
            }
        }
    }
}

/// A live listener registration.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
}

impl Subscription {
    /// Next notification, or `None` once the hub is gone.
    ///
    /// A listener that falls behind skips what it missed.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => return Some(notification),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged behind, notifications dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already queued notification, without waiting.
    pub fn try_recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.try_recv() {
                Ok(notification) => return Some(notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged behind, notifications dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Detach from the hub.
    pub fn unsubscribe(self) {}
}
