use crate::error::{EndpointError, Result};
use crate::session::{EndpointSide, QueueSession};
use std::sync::Arc;
use tracing::{debug, info};

/// Producer-facing handle: the write-only side of a queue session.
///
/// Opening the inbound endpoint creates the session's queue; closing it (or
/// dropping the handle) destroys the queue, which also invalidates any data
/// the reader has not consumed yet. A session admits one open inbound handle
/// at a time.
pub struct InboundEndpoint {
    session: Arc<QueueSession>,
}

impl InboundEndpoint {
    /// Open the inbound endpoint on `session`, installing a fresh queue.
    ///
    /// Fails with [`EndpointError::Busy`] if an inbound handle is already
    /// open; the failed attempt makes no queue mutation. Re-opening after a
    /// close starts from an empty queue with `total_bytes == 0`.
    pub fn open(session: Arc<QueueSession>) -> Result<Self> {
        if !session.try_mark_open(EndpointSide::Inbound) {
            debug!("inbound endpoint is busy");
            return Err(EndpointError::Busy);
        }

        {
            let mut slot = session.lock_slot();
            *slot = Some(session.fresh_queue());
        }

        info!("inbound endpoint opened");
        Ok(Self { session })
    }

    /// Append one message, truncated against the remaining capacity.
    ///
    /// Returns the accepted length. Truncation is silent: the caller learns
    /// how many bytes were accepted but not which were dropped. A write
    /// against a completely full queue is handled by the session's overflow
    /// policy (destructively clearing the backlog by default).
    pub fn write(&mut self, data: &[u8]) -> usize {
        let mut slot = self.session.lock_slot();
        match slot.as_mut() {
            // The queue exists for as long as this handle does.
            Some(queue) => queue.append(data),
            None => 0,
        }
    }

    /// Close the endpoint, destroying the queue. Equivalent to dropping the
    /// handle.
    pub fn close(self) {}
}

impl Drop for InboundEndpoint {
    fn drop(&mut self) {
        {
            let mut slot = self.session.lock_slot();
            *slot = None;
            // Guard drop releases the lock and wakes all waiters.
        }
        self.session.mark_closed(EndpointSide::Inbound);
        info!("inbound endpoint closed, queue destroyed");
    }
}

impl std::fmt::Debug for InboundEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundEndpoint")
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    #[test]
    fn test_open_installs_empty_queue() {
        let session = Arc::new(QueueSession::default());
        let _inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();

        assert!(session.is_initialized());
        assert_eq!(session.total_bytes(), Some(0));
        assert_eq!(session.queued_messages(), Some(0));
    }

    #[test]
    fn test_second_open_fails_busy_without_mutation() {
        let session = Arc::new(QueueSession::default());
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        inbound.write(b"kept");

        assert_eq!(
            InboundEndpoint::open(Arc::clone(&session)).unwrap_err(),
            EndpointError::Busy
        );
        // The failed open did not reset the live queue.
        assert_eq!(session.total_bytes(), Some(4));
    }

    #[test]
    fn test_write_returns_accepted_length() {
        let session = Arc::new(QueueSession::new(SessionConfig {
            capacity: 10,
            ..SessionConfig::default()
        }));
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();

        assert_eq!(inbound.write(b"123456"), 6);
        assert_eq!(inbound.write(b"123456"), 4);
        assert_eq!(session.total_bytes(), Some(10));
    }

    #[test]
    fn test_close_destroys_queue_and_permits_reopen() {
        let session = Arc::new(QueueSession::default());
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        inbound.write(b"stale");
        inbound.close();

        assert!(!session.is_initialized());

        // A re-open starts from a fresh, empty queue.
        let _inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        assert_eq!(session.total_bytes(), Some(0));
    }
}
