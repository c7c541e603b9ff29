use crate::error::Error;

use async_nats::jetstream::Message as JetStreamMessage;
use async_trait::async_trait;
use bytes::Bytes;
use streamadapter_pubsub::message::Message;

/// A message pulled from a JetStream consumer.
#[derive(Debug)]
pub struct NatsMessage {
    data: Bytes,
    id: String,
    inner: JetStreamMessage,
}

impl NatsMessage {
    pub(crate) fn new(inner: JetStreamMessage) -> Self {
        // The stream sequence doubles as the message id returned from publish.
        let id = inner
            .info()
            .map(|info| info.stream_sequence.to_string())
            .unwrap_or_default();
        let data = inner.message.payload.clone();

        Self { data, id, inner }
    }
}

#[async_trait]
impl Message for NatsMessage {
    type Error = Error;

    fn id(&self) -> &str {
        &self.id
    }

    fn data(&self) -> &Bytes {
        &self.data
    }

    async fn ack(&self) -> Result<(), Error> {
        self.inner.ack().await.map_err(Error::Ack)
    }
}
