//! Abstract interface for managed publish/subscribe services.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Clients provision topics and subscriptions within a project.
pub mod client;

/// Errors raised by pub/sub backends.
pub mod error;

/// Handlers process messages for push-style receives.
pub mod handler;

/// Messages are byte payloads with an acknowledgment handle.
pub mod message;

/// Subscriptions are durable attachments to a topic.
pub mod subscription;

/// Topics are named channels for messages.
pub mod topic;
