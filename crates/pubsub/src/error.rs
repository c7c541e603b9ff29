use std::error::Error;

/// Marker trait for pub/sub backend errors
pub trait PubSubError: Error + Send + Sync + 'static {
    /// Whether the error reports a receive loop stopped through its own cancellation token.
    fn is_canceled(&self) -> bool;
}
