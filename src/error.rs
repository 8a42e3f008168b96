use thiserror::Error;

/// Errors returned by endpoint operations.
///
/// The taxonomy is intentionally small: endpoint open contention, consumer
/// operations against a session whose queue does not exist, and a payload
/// transfer that cannot complete. Truncation on write is not an error — the
/// writer only learns how many bytes were accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EndpointError {
    /// The endpoint already has an open instance. Each endpoint permits at
    /// most one concurrently open handle.
    #[error("endpoint is busy: an instance is already open")]
    Busy,

    /// No queue exists. The inbound endpoint has never been opened, or has
    /// been closed since, tearing the queue down.
    #[error("queue not initialized: open the inbound endpoint first")]
    NotInitialized,

    /// The caller-supplied destination cannot receive the whole head message.
    /// The message stays queued; a retry with a buffer of at least `required`
    /// bytes will deliver it in full.
    #[error("destination buffer too small: head message requires {required} bytes")]
    Fault {
        /// Length of the head message that could not be transferred.
        required: usize,
    },
}

/// Convenience result alias for endpoint operations.
pub type Result<T> = std::result::Result<T, EndpointError>;
