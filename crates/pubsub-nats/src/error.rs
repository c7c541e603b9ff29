use async_nats::jetstream::consumer::StreamErrorKind;
use async_nats::jetstream::consumer::pull::{BatchErrorKind, MessagesErrorKind};
use async_nats::jetstream::context::{
    CreateStreamErrorKind, DeleteStreamErrorKind, GetStreamErrorKind, PublishErrorKind,
};
use async_nats::jetstream::stream::ConsumerErrorKind;
use async_nats::jetstream::{Error as JetStreamError, ErrorCode};
use streamadapter_pubsub::error::PubSubError;
use thiserror::Error;

/// Errors that can occur when talking to NATS JetStream.
#[derive(Debug, Error)]
pub enum Error {
    /// Acknowledgment failed.
    #[error("Failed to acknowledge message: {0}")]
    Ack(async_nats::Error),

    /// Pull request for a single message failed.
    #[error("Failed to request message: {0}")]
    Batch(BatchErrorKind),

    /// The receive loop was stopped through its cancellation token.
    #[error("Receive canceled")]
    Canceled,

    /// Connection error.
    #[error("Failed to connect: {0}")]
    Connect(async_nats::ConnectErrorKind),

    /// Consumer create error.
    #[error("Failed to create consumer: {0}")]
    ConsumerCreate(ConsumerErrorKind),

    /// Consumer delete error.
    #[error("Failed to delete consumer: {0}")]
    ConsumerDelete(ConsumerErrorKind),

    /// Consumer lookup error.
    #[error("Failed to get consumer: {0}")]
    ConsumerGet(ConsumerErrorKind),

    /// Consumer stream error.
    #[error("Consumer stream error: {0}")]
    ConsumerStream(StreamErrorKind),

    /// A pulled message could not be read.
    #[error("Failed to fetch message: {0}")]
    Fetch(async_nats::Error),

    /// The project id cannot be used as a subject token.
    #[error("invalid project id {0:?} - must not be empty or contain '.', '*', '>', '/', '\\' or whitespace")]
    InvalidProjectId(String),

    /// Consumer messages error.
    #[error("Failed to get consumer messages: {0}")]
    Messages(MessagesErrorKind),

    /// Publish error.
    #[error("Failed to publish: {0}")]
    Publish(PublishErrorKind),

    /// Stream create error.
    #[error("Failed to create stream: {0}")]
    StreamCreate(CreateStreamErrorKind),

    /// Stream delete error.
    #[error("Failed to delete stream: {0}")]
    StreamDelete(DeleteStreamErrorKind),

    /// Stream lookup error.
    #[error("Failed to get stream: {0}")]
    StreamGet(GetStreamErrorKind),
}

impl PubSubError for Error {
    fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

pub(crate) fn is_stream_not_found(kind: &GetStreamErrorKind) -> bool {
    matches!(kind, GetStreamErrorKind::JetStream(error) if is_not_found(error))
}

pub(crate) fn is_consumer_not_found(kind: &ConsumerErrorKind) -> bool {
    matches!(kind, ConsumerErrorKind::JetStream(error) if is_not_found(error))
}

fn is_not_found(error: &JetStreamError) -> bool {
    let code = error.error_code();
    code == ErrorCode::STREAM_NOT_FOUND || code == ErrorCode::CONSUMER_NOT_FOUND
}
