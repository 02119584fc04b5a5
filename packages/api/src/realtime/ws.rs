//! Native WebSocket binding for the realtime transport.

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::frame::Frame;
use super::transport::{Transport, TransportClosed};
use crate::error::{ApiResult, Error};

pub struct WsTransport {
    socket: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

pub async fn connect(url: &str) -> ApiResult<WsTransport> {
    let (socket, _response) = connect_async(url)
        .await
        .map_err(|err| Error::subscription(err.to_string()))?;
    Ok(WsTransport { socket })
}

impl Transport for WsTransport {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportClosed> {
        let text = serde_json::to_string(&frame).map_err(|_| TransportClosed)?;
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| TransportClosed)
    }

    async fn next(&mut self) -> Option<Frame> {
        while let Some(message) = self.socket.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str(text.as_ref()) {
                    Ok(frame) => return Some(frame),
                    Err(err) => {
                        tracing::warn!("dropping undecodable realtime frame: {err}");
                    }
                },
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => {}
            }
        }
        None
    }
}
