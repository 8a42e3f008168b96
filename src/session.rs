//! Shared session state for one inbound/outbound endpoint pair.
//!
//! A [`QueueSession`] owns everything the two endpoints share: the queue slot
//! behind the exclusion lock and one open flag per endpoint. Callers hold the
//! session in an `Arc` and hand clones to [`InboundEndpoint::open`] and
//! [`OutboundEndpoint::open`]; nothing is ambient process-wide state.
//!
//! [`InboundEndpoint::open`]: crate::endpoint::InboundEndpoint::open
//! [`OutboundEndpoint::open`]: crate::endpoint::OutboundEndpoint::open

use crate::lock::{ExclusionGuard, ExclusionLock};
use crate::queue::{MessageQueue, OverflowPolicy};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Configuration for a queue session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum total buffered bytes across all queued messages.
    pub capacity: usize,
    /// Behavior when a write arrives against a full queue.
    pub policy: OverflowPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: crate::defaults::CAPACITY,
            policy: OverflowPolicy::default(),
        }
    }
}

/// The state shared by an inbound/outbound endpoint pair.
///
/// The queue slot holds `Some` exactly while an inbound endpoint is open; it
/// is `None` otherwise, and outbound operations against `None` fail
/// deterministically with `NotInitialized`. The lock and its wait channel
/// live as long as the session, independent of either endpoint's lifecycle.
pub struct QueueSession {
    slot: ExclusionLock<Option<MessageQueue>>,
    inbound_open: AtomicBool,
    outbound_open: AtomicBool,
    config: SessionConfig,
}

impl QueueSession {
    /// Create a session with the given configuration. No queue exists until
    /// the inbound endpoint is opened.
    pub fn new(config: SessionConfig) -> Self {
        debug!(
            capacity = config.capacity,
            policy = ?config.policy,
            "queue session created"
        );
        Self {
            slot: ExclusionLock::new(None),
            inbound_open: AtomicBool::new(false),
            outbound_open: AtomicBool::new(false),
            config,
        }
    }

    /// Create a session with a specific capacity and the default policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(SessionConfig {
            capacity,
            ..SessionConfig::default()
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a queue currently exists. The slot is live exactly between an
    /// inbound open and the matching inbound close.
    pub fn is_initialized(&self) -> bool {
        self.slot.acquire().is_some()
    }

    /// Total buffered bytes, or `None` if no queue exists.
    pub fn total_bytes(&self) -> Option<usize> {
        self.slot.acquire().as_ref().map(MessageQueue::total_bytes)
    }

    /// Number of buffered messages, or `None` if no queue exists.
    pub fn queued_messages(&self) -> Option<usize> {
        self.slot.acquire().as_ref().map(MessageQueue::len)
    }

    /// Acquire the exclusion lock over the queue slot, blocking if another
    /// caller holds it.
    pub(crate) fn lock_slot(&self) -> ExclusionGuard<'_, Option<MessageQueue>> {
        self.slot.acquire()
    }

    /// Build a fresh queue from the session configuration.
    pub(crate) fn fresh_queue(&self) -> MessageQueue {
        MessageQueue::new(self.config.capacity, self.config.policy)
    }

    /// Flip an endpoint's open flag from closed to open. Returns false when
    /// the endpoint already has an open instance. Compare-exchange closes the
    /// race between two near-simultaneous open attempts.
    pub(crate) fn try_mark_open(&self, side: EndpointSide) -> bool {
        self.flag(side)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark an endpoint closed again.
    pub(crate) fn mark_closed(&self, side: EndpointSide) {
        self.flag(side).store(false, Ordering::Release);
    }

    fn flag(&self, side: EndpointSide) -> &AtomicBool {
        match side {
            EndpointSide::Inbound => &self.inbound_open,
            EndpointSide::Outbound => &self.outbound_open,
        }
    }
}

impl Default for QueueSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl std::fmt::Debug for QueueSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueSession")
            .field("config", &self.config)
            .field("inbound_open", &self.inbound_open.load(Ordering::Acquire))
            .field("outbound_open", &self.outbound_open.load(Ordering::Acquire))
            .finish()
    }
}

/// Which of the two endpoints a flag operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndpointSide {
    Inbound,
    Outbound,
}
