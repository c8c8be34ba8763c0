use futures::{stream::BoxStream, StreamExt};
use linesight_types::events::FlushEvent;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Fan-out channel delivering flush events to every live subscriber.
///
/// Backed by a broadcast channel, so subscribers that disconnect or lag past
/// the channel capacity drop out on their own and the publisher never tracks
/// them individually.
#[derive(Clone)]
pub struct FlushBroadcaster {
    tx: broadcast::Sender<FlushEvent>,
}

impl FlushBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to whoever is listening; with no subscribers this is a no-op.
    pub fn publish(&self, event: FlushEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> BoxStream<'static, FlushEvent> {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|event| async move { event.ok() })
            .boxed()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
