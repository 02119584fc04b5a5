//! Transport seam for the realtime socket.
//!
//! [`Transport`] is the narrow interface the subscriber drives: send one
//! frame, await the next. The production bindings are WebSockets
//! (`web_sys` in the browser, `tokio-tungstenite` behind `native-ws`);
//! [`LoopbackTransport`] is the in-memory pair used by tests and local
//! demos, with the far end exposed as [`LoopbackRemote`] so a test can
//! play the backend.

use std::future::Future;

use tokio::sync::mpsc;

use super::frame::Frame;
use store::events::RawChange;
use store::models::Table;

/// The peer closed the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportClosed;

impl std::fmt::Display for TransportClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("transport closed")
    }
}

/// Frame-level connection to the realtime endpoint.
pub trait Transport {
    fn send(&mut self, frame: Frame) -> impl Future<Output = Result<(), TransportClosed>>;
    /// Next inbound frame; `None` once the connection is gone.
    fn next(&mut self) -> impl Future<Output = Option<Frame>>;
}

/// Client half of an in-memory transport pair.
pub struct LoopbackTransport {
    outbound: mpsc::UnboundedSender<Frame>,
    inbound: mpsc::UnboundedReceiver<Frame>,
}

/// Backend half: push frames to the client, observe what it sent.
pub struct LoopbackRemote {
    inbound: mpsc::UnboundedSender<Frame>,
    outbound: mpsc::UnboundedReceiver<Frame>,
}

/// Create a connected transport pair.
pub fn loopback() -> (LoopbackTransport, LoopbackRemote) {
    let (to_remote, from_client) = mpsc::unbounded_channel();
    let (to_client, from_remote) = mpsc::unbounded_channel();
    (
        LoopbackTransport {
            outbound: to_remote,
            inbound: from_remote,
        },
        LoopbackRemote {
            inbound: to_client,
            outbound: from_client,
        },
    )
}

impl Transport for LoopbackTransport {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportClosed> {
        self.outbound.send(frame).map_err(|_| TransportClosed)
    }

    async fn next(&mut self) -> Option<Frame> {
        self.inbound.recv().await
    }
}

impl LoopbackRemote {
    /// Deliver a frame to the client.
    pub fn push(&self, frame: Frame) -> Result<(), TransportClosed> {
        self.inbound.send(frame).map_err(|_| TransportClosed)
    }

    /// Deliver a `postgres_changes` event on a table's channel.
    pub fn push_change(&self, table: Table, raw: &RawChange) -> Result<(), TransportClosed> {
        let payload = serde_json::to_value(raw).unwrap_or_default();
        self.push(Frame {
            topic: format!("realtime:public:{table}"),
            event: super::frame::EVENT_CHANGES.to_string(),
            payload,
            reference: None,
        })
    }

    /// Next frame the client sent, if any is queued.
    pub fn try_sent(&mut self) -> Option<Frame> {
        self.outbound.try_recv().ok()
    }

    /// Await the next frame the client sends.
    pub async fn sent(&mut self) -> Option<Frame> {
        self.outbound.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_cross_the_pair_in_both_directions() {
        let (mut transport, mut remote) = loopback();

        transport.send(Frame::heartbeat(1)).await.unwrap();
        assert_eq!(remote.sent().await.unwrap().event, "heartbeat");

        remote.push(Frame::heartbeat(2)).unwrap();
        assert_eq!(
            transport.next().await.unwrap().reference.as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn dropping_the_remote_closes_the_transport() {
        let (mut transport, remote) = loopback();
        drop(remote);
        assert!(transport.next().await.is_none());
        assert_eq!(transport.send(Frame::heartbeat(1)).await, Err(TransportClosed));
    }
}
