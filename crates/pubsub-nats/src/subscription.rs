use crate::error::{Error, is_consumer_not_found};
use crate::message::NatsMessage;

use std::pin::pin;
use std::time::Duration;

use async_nats::jetstream::Context as JetStreamContext;
use async_nats::jetstream::consumer::PullConsumer;
use async_trait::async_trait;
use futures::StreamExt;
use streamadapter_pubsub::handler::MessageHandler;
use streamadapter_pubsub::subscription::Subscription;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How long a single-message pull request waits before it is reissued.
const PULL_EXPIRY: Duration = Duration::from_secs(30);

/// A subscription backed by a durable JetStream pull consumer.
#[derive(Clone, Debug)]
pub struct NatsSubscription {
    id: String,
    jetstream_context: JetStreamContext,
    stream: String,
}

impl NatsSubscription {
    pub(crate) const fn new(id: String, stream: String, jetstream_context: JetStreamContext) -> Self {
        Self {
            id,
            jetstream_context,
            stream,
        }
    }

    async fn consumer(&self) -> Result<PullConsumer, Error> {
        self.jetstream_context
            .get_consumer_from_stream(&self.id, &self.stream)
            .await
            .map_err(|e| Error::ConsumerGet(e.kind()))
    }
}

#[async_trait]
impl Subscription for NatsSubscription {
    type Error = Error;

    type Message = NatsMessage;

    fn id(&self) -> &str {
        &self.id
    }

    async fn exists(&self) -> Result<bool, Error> {
        let result: Result<PullConsumer, _> = self
            .jetstream_context
            .get_consumer_from_stream(&self.id, &self.stream)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let kind = e.kind();
                if is_consumer_not_found(&kind) {
                    Ok(false)
                } else {
                    Err(Error::ConsumerGet(kind))
                }
            }
        }
    }

    async fn delete(&self) -> Result<(), Error> {
        self.jetstream_context
            .delete_consumer_from_stream(&self.id, &self.stream)
            .await
            .map_err(|e| Error::ConsumerDelete(e.kind()))?;

        debug!(subscription = %self.id, stream = %self.stream, "deleted consumer");

        Ok(())
    }

    async fn receive<X>(&self, cancel: CancellationToken, handler: X) -> Result<(), Error>
    where
        X: MessageHandler<NatsMessage>,
    {
        let mut messages = self
            .consumer()
            .await?
            .messages()
            .await
            .map_err(|e| Error::ConsumerStream(e.kind()))?;

        loop {
            tokio::select! {
                () = cancel.cancelled() => return Err(Error::Canceled),
                next = messages.next() => match next {
                    Some(Ok(message)) => handler.handle(NatsMessage::new(message)).await,
                    Some(Err(e)) => return Err(Error::Messages(e.kind())),
                    None => return Ok(()),
                },
            }
        }
    }

    /// Issues pull requests for one message at a time, so nothing is left in flight
    /// once a message has been returned.
    async fn receive_one(&self) -> Result<NatsMessage, Error> {
        let consumer = self.consumer().await?;

        loop {
            let batch = consumer
                .batch()
                .max_messages(1)
                .expires(PULL_EXPIRY)
                .messages()
                .await
                .map_err(|e| Error::Batch(e.kind()))?;
            let mut batch = pin!(batch);

            if let Some(message) = batch.next().await {
                let message = message.map_err(Error::Fetch)?;
                return Ok(NatsMessage::new(message));
            }

            debug!(subscription = %self.id, "pull request expired without a message");
        }
    }
}
