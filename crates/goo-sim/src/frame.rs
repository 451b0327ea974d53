//! Frame-synchronous callback loop.

use std::fmt;

use tracing::debug;

/// Timing information handed to a frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Wall-clock time of this frame in milliseconds.
    pub now_ms: f64,
    /// Milliseconds since this subscription was last invoked (or subscribed).
    pub elapsed_ms: f64,
}

/// Handle returned by [`FrameLoop::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback<S> = Box<dyn FnMut(&mut S, FrameTick)>;

struct Entry<S> {
    id: Subscription,
    last_ms: f64,
    callback: Callback<S>,
}

/// Runs subscribed callbacks once per frame, in subscription order.
///
/// Every subscription tracks its own previous invocation time, so two
/// callbacks subscribed at different moments see different elapsed times
/// on their first frame. Callbacks receive the shared state mutably; no
/// callback runs concurrently with another.
pub struct FrameLoop<S> {
    entries: Vec<Entry<S>>,
    next_id: u64,
}

impl<S> Default for FrameLoop<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for FrameLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("subscriptions", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<S> FrameLoop<S> {
    /// Create an empty loop.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback. Its first elapsed time is measured from `now_ms`.
    pub fn subscribe<F>(&mut self, callback: F, now_ms: f64) -> Subscription
    where
        F: FnMut(&mut S, FrameTick) + 'static,
    {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            last_ms: now_ms,
            callback: Box::new(callback),
        });
        debug!(id = id.0, total = self.entries.len(), "frame subscription added");
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != subscription);
        let removed = self.entries.len() != before;
        if removed {
            debug!(id = subscription.0, "frame subscription removed");
        }
        removed
    }

    /// Tear down every subscription.
    pub fn stop(&mut self) {
        if !self.entries.is_empty() {
            debug!(count = self.entries.len(), "frame loop stopped");
        }
        self.entries.clear();
    }

    /// Run one frame: invoke each callback once with its elapsed time.
    ///
    /// A clock that steps backwards yields an elapsed time of zero.
    pub fn frame(&mut self, state: &mut S, now_ms: f64) {
        for entry in &mut self.entries {
            let tick = FrameTick {
                now_ms,
                elapsed_ms: (now_ms - entry.last_ms).max(0.0),
            };
            entry.last_ms = now_ms;
            (entry.callback)(state, tick);
        }
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no subscription is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
