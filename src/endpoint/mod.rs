//! The two asymmetric endpoints over a shared queue session.
//!
//! The inbound endpoint is write-only and owns the queue's lifecycle: opening
//! it creates the queue, closing it destroys the queue. The outbound endpoint
//! is read-only and can only be opened while a queue exists. Each endpoint
//! permits at most one open instance at a time; a second open fails with
//! [`EndpointError::Busy`].
//!
//! [`EndpointError::Busy`]: crate::error::EndpointError::Busy

pub mod inbound;
pub mod outbound;

pub use inbound::InboundEndpoint;
pub use outbound::OutboundEndpoint;
