//! Bounded FIFO message queue.
//!
//! The queue stores discrete byte messages in arrival order under a fixed
//! total-byte budget shared by all queued messages. Writes that exceed the
//! remaining budget are truncated silently; a write arriving against a
//! completely full queue is subject to the configured [`OverflowPolicy`].
//!
//! The queue itself is not synchronized. Callers serialize every mutation
//! through the session's exclusion lock; see the `session` module.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One buffered message: an immutable-once-written payload plus its length.
///
/// Messages are owned exclusively by the queue. A message is created on
/// append and leaves the queue only through [`MessageQueue::pop_front`],
/// which transfers ownership to the caller.
#[derive(Debug)]
pub struct QueuedMessage {
    payload: Box<[u8]>,
}

impl QueuedMessage {
    fn new(data: &[u8]) -> Self {
        Self {
            payload: data.into(),
        }
    }

    /// The message payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// What to do with a write that arrives when the queue is already full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Discard every buffered, unread message before admitting (a prefix of)
    /// the new one. This reproduces the historically observed behavior and
    /// is the default; note that it silently destroys unread data.
    #[default]
    ClearBacklog,

    /// Leave the backlog intact and accept zero bytes of the new write.
    RejectNewest,
}

/// Ordered sequence of [`QueuedMessage`]s with a fixed total-byte capacity.
#[derive(Debug)]
pub struct MessageQueue {
    messages: VecDeque<QueuedMessage>,
    total_bytes: usize,
    capacity: usize,
    policy: OverflowPolicy,
}

impl MessageQueue {
    /// Create an empty queue with the given capacity and overflow policy.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            messages: VecDeque::new(),
            total_bytes: 0,
            capacity,
            policy,
        }
    }

    /// Discard all buffered messages and zero the byte counter.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.total_bytes = 0;
    }

    /// Append a message, truncating it to the remaining capacity.
    ///
    /// Returns the number of bytes accepted. If the queue is already full on
    /// entry, the overflow policy runs first: `ClearBacklog` resets the queue
    /// and then admits the write against the full capacity, `RejectNewest`
    /// accepts nothing. When `data` is longer than the remaining budget, only
    /// the leading `remaining` bytes are kept and the rest is dropped without
    /// signaling an error.
    pub fn append(&mut self, data: &[u8]) -> usize {
        if self.total_bytes >= self.capacity {
            match self.policy {
                OverflowPolicy::ClearBacklog => {
                    warn!(
                        dropped_messages = self.messages.len(),
                        dropped_bytes = self.total_bytes,
                        "queue full, clearing backlog before write"
                    );
                    self.reset();
                }
                OverflowPolicy::RejectNewest => {
                    warn!(len = data.len(), "queue full, rejecting write");
                    return 0;
                }
            }
        }

        let remaining = self.capacity - self.total_bytes;
        let accepted = data.len().min(remaining);
        if accepted < data.len() {
            warn!(
                requested = data.len(),
                accepted, "write exceeds remaining capacity, truncating"
            );
        }
        if accepted == 0 {
            // A zero-byte node would break the empty <=> zero-bytes invariant.
            return 0;
        }

        self.messages.push_back(QueuedMessage::new(&data[..accepted]));
        self.total_bytes += accepted;
        debug!(accepted, total_bytes = self.total_bytes, "message appended");
        accepted
    }

    /// Detach and return the oldest message, or `None` if the queue is empty.
    pub fn pop_front(&mut self) -> Option<QueuedMessage> {
        let message = self.messages.pop_front()?;
        self.total_bytes -= message.len();
        debug!(
            delivered = message.len(),
            total_bytes = self.total_bytes,
            "message popped"
        );
        Some(message)
    }

    /// Length of the head message without dequeuing it.
    pub fn front_len(&self) -> Option<usize> {
        self.messages.front().map(QueuedMessage::len)
    }

    /// Number of buffered messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no messages are buffered.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Sum of the lengths of all buffered messages.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// The fixed total-byte capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(
            self.total_bytes,
            self.messages.iter().map(QueuedMessage::len).sum::<usize>()
        );
        assert!(self.total_bytes <= self.capacity);
        assert_eq!(self.messages.is_empty(), self.total_bytes == 0);
    }
}
