//! # Queue Pair
//!
//! A bounded, in-memory FIFO byte-message queue shared between two asymmetric
//! endpoints: a write-only inbound endpoint and a read-only outbound endpoint.
//!
//! ## Model
//!
//! One [`QueueSession`] owns everything the two sides share: the queue slot
//! behind an exclusion lock with a blocking wait facility, and one open flag
//! per endpoint. The inbound endpoint owns the queue's lifecycle — opening it
//! creates the queue, closing it destroys the queue — while the outbound
//! endpoint consumes whole messages in arrival order, exactly once each.
//!
//! The queue has a fixed total-byte capacity (1024 by default). A write that
//! exceeds the remaining capacity is silently truncated to fit, and a write
//! arriving against a completely full queue is handled by the configurable
//! [`OverflowPolicy`], which by default destructively clears the backlog
//! before admitting the new data.
//!
//! ## Usage Example
//!
//! ```rust
//! use queue_pair::{InboundEndpoint, OutboundEndpoint, QueueSession};
//! use std::sync::Arc;
//!
//! # fn main() -> queue_pair::Result<()> {
//! let session = Arc::new(QueueSession::default());
//!
//! let mut writer = InboundEndpoint::open(Arc::clone(&session))?;
//! writer.write(b"hello");
//!
//! let mut reader = OutboundEndpoint::open(Arc::clone(&session))?;
//! let mut buf = [0u8; 64];
//! let n = reader.read(&mut buf)?;
//! assert_eq!(&buf[..n], b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Both endpoints may be driven from independent threads. Every queue
//! mutation happens under the session's exclusion lock, held only across the
//! mutation itself — never across the payload transfer to or from a caller's
//! buffer. Blocked acquirers suspend and are woken when the holder releases,
//! with no fairness guarantee among waiters.

/// Bounded FIFO queue and its message nodes
pub mod queue;

/// Mutual exclusion with a blocking wait facility
pub mod lock;

/// Shared session state tying one queue to one endpoint pair
pub mod session;

/// The inbound (producer) and outbound (consumer) endpoints
pub mod endpoint;

/// Error taxonomy for endpoint operations
pub mod error;

/// Command-line interface for the demo binary
pub mod cli;

/// Colorized tracing formatter for user-facing output
pub mod logging;

/// Run summary collection and JSON output
pub mod report;

// Re-export the types most callers need.
pub use endpoint::{InboundEndpoint, OutboundEndpoint};
pub use error::{EndpointError, Result};
pub use lock::{ExclusionGuard, ExclusionLock};
pub use queue::{MessageQueue, OverflowPolicy, QueuedMessage};
pub use session::{QueueSession, SessionConfig};

/// The current version of the queue-pair crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default total queue capacity in bytes.
    ///
    /// All currently buffered messages share this budget; it is not a
    /// per-message limit.
    pub const CAPACITY: usize = 1024;

    /// Default number of messages the demo writer appends.
    pub const MESSAGE_COUNT: usize = 64;

    /// Default payload size for demo messages. Small relative to the
    /// capacity so the default run stays lossless when the reader keeps up.
    pub const PAYLOAD_SIZE: usize = 32;
}
