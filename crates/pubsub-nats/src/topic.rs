use crate::error::{Error, is_stream_not_found};

use async_nats::jetstream::Context as JetStreamContext;
use async_trait::async_trait;
use bytes::Bytes;
use streamadapter_pubsub::topic::Topic;
use tracing::debug;

/// A topic backed by a JetStream stream.
#[derive(Clone, Debug)]
pub struct NatsTopic {
    id: String,
    jetstream_context: JetStreamContext,
    stream: String,
    subject: String,
}

impl NatsTopic {
    pub(crate) fn new(id: String, project_id: &str, jetstream_context: JetStreamContext) -> Self {
        let stream = format!("{project_id}_{id}");
        let subject = format!("{project_id}.{id}");

        Self {
            id,
            jetstream_context,
            stream,
            subject,
        }
    }

    /// The name of the backing stream, scoped to the project.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// The subject the stream captures.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl Topic for NatsTopic {
    type Error = Error;

    fn id(&self) -> &str {
        &self.id
    }

    async fn exists(&self) -> Result<bool, Error> {
        match self.jetstream_context.get_stream(&self.stream).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let kind = e.kind();
                if is_stream_not_found(&kind) {
                    Ok(false)
                } else {
                    Err(Error::StreamGet(kind))
                }
            }
        }
    }

    async fn publish(&self, data: Bytes) -> Result<String, Error> {
        let ack = self
            .jetstream_context
            .publish(self.subject.clone(), data)
            .await
            .map_err(|e| Error::Publish(e.kind()))?
            .await
            .map_err(|e| Error::Publish(e.kind()))?;

        Ok(ack.sequence.to_string())
    }

    async fn delete(&self) -> Result<(), Error> {
        self.jetstream_context
            .delete_stream(&self.stream)
            .await
            .map_err(|e| Error::StreamDelete(e.kind()))?;

        debug!(topic = %self.id, stream = %self.stream, "deleted stream");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::client::DEFAULT_NATS_URL;

    use async_nats::ConnectOptions;
    use async_nats::jetstream;

    async fn setup_context() -> JetStreamContext {
        // Connects lazily, so no server is needed to build references.
        let client = ConnectOptions::new()
            .retry_on_initial_connect()
            .connect(DEFAULT_NATS_URL)
            .await
            .unwrap();

        jetstream::new(client)
    }

    #[tokio::test]
    async fn test_streams_are_scoped_to_project() {
        let context = setup_context().await;

        let first = NatsTopic::new("streamadapter_foo".to_string(), "projA", context.clone());
        let second = NatsTopic::new("streamadapter_foo".to_string(), "projB", context);

        assert_eq!(first.id(), second.id());
        assert_eq!(first.stream(), "projA_streamadapter_foo");
        assert_eq!(second.stream(), "projB_streamadapter_foo");
        assert_ne!(first.stream(), second.stream());
        assert_eq!(first.subject(), "projA.streamadapter_foo");
        assert_eq!(second.subject(), "projB.streamadapter_foo");
    }
}
