use streamadapter_pubsub::error::PubSubError;
use thiserror::Error;

/// Errors that can occur in the in-memory service.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// The message was acknowledged after its subscription's ack deadline.
    #[error("ack deadline exceeded for message {0}")]
    AckDeadlineExceeded(String),

    /// The receive loop was stopped through its cancellation token.
    #[error("receive canceled")]
    Canceled,

    /// A subscription with this id already exists.
    #[error("subscription {0} already exists")]
    SubscriptionAlreadyExists(String),

    /// No subscription with this id exists.
    #[error("subscription {0} not found")]
    SubscriptionNotFound(String),

    /// A topic with this id already exists.
    #[error("topic {0} already exists")]
    TopicAlreadyExists(String),

    /// No topic with this id exists.
    #[error("topic {0} not found")]
    TopicNotFound(String),
}

impl PubSubError for Error {
    fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
