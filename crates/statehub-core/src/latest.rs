//! # Latest Value Holder
//!
//! Holds one current value and a list of subscribers. A new subscriber
//! immediately receives the current value; every replacement is queued to all
//! live subscribers in order. Delivery happens through per-subscriber queues,
//! so the producer never runs consumer code.

use parking_lot::Mutex;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

/// The holder was closed; no further values are accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value holder is closed")]
pub struct HolderClosed;

struct Inner<T> {
    current: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

/// Latest-value holder with replay-on-subscribe.
pub struct LatestValue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> LatestValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.inner.lock().current.clone()
    }

    /// Subscribe to the value.
    ///
    /// The returned subscription already holds the current value. On a closed
    /// holder the subscription is empty and terminated.
    pub fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        if !inner.closed && sender.send(inner.current.clone()).is_ok() {
            inner.subscribers.push(sender);
        }
        Subscription { receiver }
    }

    /// Replace the current value with `update(current)`.
    ///
    /// Updates are serialized by the holder's lock: each one is computed
    /// against the result of the previous one. `update` must not call back
    /// into the same holder.
    pub fn update(&self, update: impl FnOnce(&T) -> T) -> Result<(), HolderClosed> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(HolderClosed);
        }
        let next = update(&inner.current);
        inner.current = next.clone();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(next.clone()).is_ok());
        trace!(subscribers = inner.subscribers.len(), "Value replaced");
        Ok(())
    }

    /// Close the holder, terminating every subscription once its queue is
    /// drained. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        inner.subscribers.clear();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());
        inner.subscribers.len()
    }
}

/// A subscription handle for receiving values.
///
/// Dropping it unsubscribes.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Receive the next value.
    ///
    /// # Returns
    ///
    /// - `Some(value)` - The next value in publication order
    /// - `None` - The holder was closed and all queued values were consumed
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Try to receive the next value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    pub(crate) fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_recv(cx)
    }
}
