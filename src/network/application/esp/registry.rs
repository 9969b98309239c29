//! Topic subscriptions and deferred handler dispatch.
//!
//! Inbound frames only *stage* values on matching subscriptions. The
//! session's dispatch job later collects staged values into an [`Updates`]
//! batch, and handlers run when that batch is delivered. Handlers therefore
//! never run in the middle of parsing a line.

use core::fmt;

use heapless::Vec;

use super::MAX_SUBSCRIPTIONS;
use super::bitmap::Bitmap;
use super::codec::{InboundLine, Topic, parse_leading_int, truncated};
use crate::network::error::Error;

/// A subscription callback, typed by the payload it expects.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Receives the payload text as-is.
    String(fn(&str)),
    /// Receives the payload parsed as a number, NaN if it does not parse.
    Number(fn(f64)),
    /// Receives the payload decoded as a bitmap.
    Bitmap(fn(Bitmap)),
    /// Receives nothing; used for notifications.
    Void(fn()),
}

impl Handler {
    /// Convert `value` to this handler's payload type and call it.
    pub fn invoke(&self, value: &str) {
        match self {
            Handler::String(handler) => handler(value),
            Handler::Number(handler) => handler(value.trim().parse().unwrap_or(f64::NAN)),
            Handler::Bitmap(handler) => {
                let bits = parse_leading_int(value).unwrap_or(0);
                handler(Bitmap::decode(bits as u32))
            }
            Handler::Void(handler) => handler(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::String(_) => f.write_str("Handler::String"),
            Handler::Number(_) => f.write_str("Handler::Number"),
            Handler::Bitmap(_) => f.write_str("Handler::Bitmap"),
            Handler::Void(_) => f.write_str("Handler::Void"),
        }
    }
}

/// A handler bound to a topic, with the value staged for its next dispatch.
#[derive(Debug, Clone)]
pub struct Subscription {
    topic: Topic,
    handler: Handler,
    pending: InboundLine,
}

impl Subscription {
    /// Topic this subscription matches.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Registered handler.
    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// Value staged for the next dispatch, empty if none.
    pub fn pending(&self) -> &str {
        &self.pending
    }
}

/// Append-only list of subscriptions.
///
/// Duplicate topics are allowed; each subscription is staged and dispatched
/// on its own.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    subscriptions: Vec<Subscription, MAX_SUBSCRIPTIONS>,
    has_pending_update: bool,
}

impl TopicRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            has_pending_update: false,
        }
    }

    /// Register `handler` for `topic`.
    pub fn subscribe(&mut self, topic: &str, handler: Handler) -> Result<(), Error> {
        let subscription = Subscription {
            topic: truncated(topic),
            handler,
            pending: InboundLine::new(),
        };
        self.subscriptions
            .push(subscription)
            .map_err(|_| Error::CapacityExceeded)
    }

    /// Stage `value` on every subscription to `topic`. Returns whether any
    /// subscription matched.
    pub fn stage(&mut self, topic: &str, value: &str) -> bool {
        let mut matched = false;
        for subscription in self.subscriptions.iter_mut().filter(|s| s.topic == topic) {
            subscription.pending = truncated(value);
            matched = true;
        }
        if matched {
            self.has_pending_update = true;
        }
        matched
    }

    /// Whether anything was staged since the last [`take_updates`](Self::take_updates).
    pub fn has_pending_update(&self) -> bool {
        self.has_pending_update
    }

    /// Collect and clear every non-empty staged value.
    pub fn take_updates(&mut self) -> Updates {
        let mut updates = Updates::new();
        if !self.has_pending_update {
            return updates;
        }
        self.has_pending_update = false;

        for subscription in self.subscriptions.iter_mut() {
            if subscription.pending.is_empty() {
                continue;
            }
            let value = core::mem::take(&mut subscription.pending);
            // Cannot fail: one entry per subscription at most.
            let _ = updates.entries.push((subscription.handler, value));
        }
        updates
    }

    /// Registered subscriptions, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether no subscriptions are registered.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Handler invocations collected by one dispatch tick.
#[derive(Debug, Default)]
#[must_use = "updates do nothing until delivered"]
pub struct Updates {
    entries: Vec<(Handler, InboundLine), MAX_SUBSCRIPTIONS>,
}

impl Updates {
    /// An empty batch.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Number of pending invocations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to deliver.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged values, in registration order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    /// Run every handler in registration order.
    pub fn deliver(self) {
        for (handler, value) in &self.entries {
            handler.invoke(value);
        }
    }
}
