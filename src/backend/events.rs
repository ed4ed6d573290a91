use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Asynchronous notifications emitted by the backend gateway.
#[derive(Clone, Debug)]
pub enum BackendEvent {
    /// Progress of an in-flight flash, keyed by the target port.
    FlashProgress {
        port: String,
        source_id: String,
        current: u64,
        total: u64,
    },
}

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel between the gateway and any number of subscribers.
///
/// Cloning shares the same channel. Publishing with no subscribers is fine;
/// events are advisory.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BackendEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: BackendEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events from this point on. Dropping the returned
    /// stream unsubscribes.
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.sender.subscribe()),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to an [`EventBus`].
pub struct EventStream {
    inner: BroadcastStream<BackendEvent>,
}

impl Stream for EventStream {
    type Item = BackendEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                // A lagged receiver only misses progress ticks; skip and poll on
                Poll::Ready(Some(Err(_))) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = EventBus::new();
        let mut stream = bus.subscribe();

        bus.publish(BackendEvent::FlashProgress {
            port: "/dev/ttyUSB0".to_string(),
            source_id: "tbeam".to_string(),
            current: 10,
            total: 100,
        });

        match stream.next().await {
            Some(BackendEvent::FlashProgress { port, current, .. }) => {
                assert_eq!(port, "/dev/ttyUSB0");
                assert_eq!(current, 10);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_published_before_subscribing_are_not_delivered() {
        let bus = EventBus::new();

        bus.publish(BackendEvent::FlashProgress {
            port: "COM3".to_string(),
            source_id: "rak4631".to_string(),
            current: 1,
            total: 2,
        });

        let mut stream = bus.subscribe();

        bus.publish(BackendEvent::FlashProgress {
            port: "COM4".to_string(),
            source_id: "rak4631".to_string(),
            current: 2,
            total: 2,
        });

        match stream.next().await {
            Some(BackendEvent::FlashProgress { port, .. }) => assert_eq!(port, "COM4"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
