use crate::error::{EndpointError, Result};
use crate::session::{EndpointSide, QueueSession};
use std::sync::Arc;
use tracing::{debug, info};

/// Consumer-facing handle: the read-only side of a queue session.
///
/// The outbound endpoint can only be opened while a queue exists, and it
/// never owns the queue: closing the handle leaves teardown to the inbound
/// side. A session admits one open outbound handle at a time.
pub struct OutboundEndpoint {
    session: Arc<QueueSession>,
}

impl OutboundEndpoint {
    /// Open the outbound endpoint on `session`.
    ///
    /// Fails with [`EndpointError::Busy`] if an outbound handle is already
    /// open, and with [`EndpointError::NotInitialized`] if no queue exists —
    /// the inbound endpoint has never been opened, or has closed since.
    pub fn open(session: Arc<QueueSession>) -> Result<Self> {
        if !session.try_mark_open(EndpointSide::Outbound) {
            debug!("outbound endpoint is busy");
            return Err(EndpointError::Busy);
        }

        let initialized = session.lock_slot().is_some();
        if !initialized {
            session.mark_closed(EndpointSide::Outbound);
            debug!("outbound open refused, no queue exists");
            return Err(EndpointError::NotInitialized);
        }

        info!("outbound endpoint opened");
        Ok(Self { session })
    }

    /// Deliver the oldest message in full into `dest`.
    ///
    /// Returns the number of bytes delivered; an empty queue yields `Ok(0)`
    /// rather than an error, and there is no blocking until data arrives.
    /// If `dest` is too small for the whole head message the read fails with
    /// [`EndpointError::Fault`] and the message stays queued, so a retry with
    /// a large enough buffer retrieves it in full. A message is dequeued
    /// exactly once, and only after the transfer is known to succeed. The
    /// payload copy happens outside the lock.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize> {
        let message = {
            let mut slot = self.session.lock_slot();
            let queue = slot.as_mut().ok_or(EndpointError::NotInitialized)?;

            let required = match queue.front_len() {
                Some(len) => len,
                None => return Ok(0),
            };
            if dest.len() < required {
                debug!(required, available = dest.len(), "read fault, message left queued");
                return Err(EndpointError::Fault { required });
            }

            match queue.pop_front() {
                Some(message) => message,
                None => return Ok(0),
            }
        };

        let len = message.len();
        dest[..len].copy_from_slice(message.payload());
        debug!(delivered = len, "message delivered");
        Ok(len)
    }

    /// Close the endpoint. The queue stays with the inbound side; any
    /// unconsumed messages remain buffered. Equivalent to dropping the
    /// handle.
    pub fn close(self) {}
}

impl Drop for OutboundEndpoint {
    fn drop(&mut self) {
        self.session.mark_closed(EndpointSide::Outbound);
        info!("outbound endpoint closed");
    }
}

impl std::fmt::Debug for OutboundEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundEndpoint")
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::InboundEndpoint;

    #[test]
    fn test_open_before_inbound_fails_not_initialized() {
        let session = Arc::new(QueueSession::default());
        assert_eq!(
            OutboundEndpoint::open(Arc::clone(&session)).unwrap_err(),
            EndpointError::NotInitialized
        );
        // The refused open released its claim on the endpoint.
        let _inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        assert!(OutboundEndpoint::open(session).is_ok());
    }

    #[test]
    fn test_second_open_fails_busy() {
        let session = Arc::new(QueueSession::default());
        let _inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        let _outbound = OutboundEndpoint::open(Arc::clone(&session)).unwrap();

        assert_eq!(
            OutboundEndpoint::open(session).unwrap_err(),
            EndpointError::Busy
        );
    }

    #[test]
    fn test_read_empty_queue_delivers_zero_bytes() {
        let session = Arc::new(QueueSession::default());
        let _inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        let mut outbound = OutboundEndpoint::open(session).unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(outbound.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_fault_leaves_head_intact_for_retry() {
        let session = Arc::new(QueueSession::default());
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        let mut outbound = OutboundEndpoint::open(Arc::clone(&session)).unwrap();

        inbound.write(b"whole message");

        let mut small = [0u8; 4];
        assert_eq!(
            outbound.read(&mut small).unwrap_err(),
            EndpointError::Fault { required: 13 }
        );
        assert_eq!(session.queued_messages(), Some(1));

        let mut big = [0u8; 64];
        let n = outbound.read(&mut big).unwrap();
        assert_eq!(&big[..n], b"whole message");
    }

    #[test]
    fn test_read_after_inbound_close_fails_not_initialized() {
        let session = Arc::new(QueueSession::default());
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        inbound.write(b"orphaned");
        let mut outbound = OutboundEndpoint::open(Arc::clone(&session)).unwrap();
        inbound.close();

        let mut buf = [0u8; 16];
        assert_eq!(
            outbound.read(&mut buf).unwrap_err(),
            EndpointError::NotInitialized
        );
    }

    #[test]
    fn test_outbound_close_keeps_messages_buffered() {
        let session = Arc::new(QueueSession::default());
        let mut inbound = InboundEndpoint::open(Arc::clone(&session)).unwrap();
        inbound.write(b"still here");

        let outbound = OutboundEndpoint::open(Arc::clone(&session)).unwrap();
        outbound.close();
        assert_eq!(session.queued_messages(), Some(1));

        // A later consumer picks up where the first left off.
        let mut outbound = OutboundEndpoint::open(session).unwrap();
        let mut buf = [0u8; 16];
        let n = outbound.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"still here");
    }
}
