//! Projected, deduplicated views over a container's state.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::latest::Subscription;

type Selector<S, K> = Box<dyn Fn(&S) -> K + Send + 'static>;

/// Stream of projected values from a container.
///
/// - The first item is the projection of the state current at subscription.
/// - Later items are only produced when the projection differs from the
///   previously produced one.
/// - Items are queued, not coalesced, and delivered on the consumer's own
///   task turn.
/// - The stream ends when the container is destroyed.
///
/// Dropping the selection unsubscribes it.
pub struct Selection<S, K> {
    subscription: Subscription<S>,
    selector: Selector<S, K>,
    last: Option<K>,
}

impl<S, K: PartialEq + Clone> Selection<S, K> {
    pub(crate) fn new(
        subscription: Subscription<S>,
        selector: impl Fn(&S) -> K + Send + 'static,
    ) -> Self {
        Self {
            subscription,
            selector: Box::new(selector),
            last: None,
        }
    }

    /// Receive the next distinct projected value.
    pub async fn recv(&mut self) -> Option<K> {
        futures::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

// No field is structurally pinned.
impl<S, K> Unpin for Selection<S, K> {}

impl<S, K: PartialEq + Clone> Stream for Selection<S, K> {
    type Item = K;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<K>> {
        let this = self.get_mut();
        loop {
            let state = match this.subscription.poll_recv(cx) {
                Poll::Ready(Some(state)) => state,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            };

            let projected = (this.selector)(&state);
            if this.last.as_ref() == Some(&projected) {
                continue;
            }
            this.last = Some(projected.clone());
            return Poll::Ready(Some(projected));
        }
    }
}
