//! Browser WebSocket transport.
//!
//! `web_sys::WebSocket` is callback-driven; this adapter bridges its
//! events into the pull-based [`Transport`] interface over an unbounded
//! channel. The `Closure` handles registered on the socket are stored on
//! the transport so they stay alive as long as the socket does.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::frame::Frame;
use super::transport::{Transport, TransportClosed};
use crate::error::{ApiResult, Error};

pub struct WebSocketTransport {
    socket: WebSocket,
    incoming: mpsc::UnboundedReceiver<Frame>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

/// Open a socket and wait until it is ready to send.
pub async fn connect(url: &str) -> ApiResult<WebSocketTransport> {
    let socket = WebSocket::new(url)
        .map_err(|_| Error::subscription(format!("could not open websocket to {url}")))?;

    let (frame_tx, incoming) = mpsc::unbounded();

    let message_tx = frame_tx.clone();
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let Some(text) = event.data().as_string() else {
            return;
        };
        match serde_json::from_str::<Frame>(&text) {
            Ok(frame) => {
                let _ = message_tx.unbounded_send(frame);
            }
            Err(err) => tracing::warn!("dropping undecodable frame: {err}"),
        }
    });
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |_: CloseEvent| {
        frame_tx.close_channel();
    });
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    // One-shot open/error race; whichever fires first decides.
    let (ready_tx, ready_rx) = oneshot::channel::<Result<(), ()>>();
    let pending = Rc::new(RefCell::new(Some(ready_tx)));

    let opened = pending.clone();
    let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        if let Some(tx) = opened.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let failed = pending;
    let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        if let Some(tx) = failed.borrow_mut().take() {
            let _ = tx.send(Err(()));
        }
    });
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let ready = ready_rx.await;
    socket.set_onopen(None);
    socket.set_onerror(None);
    drop(on_open);
    drop(on_error);

    match ready {
        Ok(Ok(())) => Ok(WebSocketTransport {
            socket,
            incoming,
            _on_message: on_message,
            _on_close: on_close,
        }),
        _ => Err(Error::subscription(format!(
            "websocket handshake with {url} failed"
        ))),
    }
}

impl Transport for WebSocketTransport {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportClosed> {
        let text = serde_json::to_string(&frame).map_err(|_| TransportClosed)?;
        self.socket.send_with_str(&text).map_err(|_| TransportClosed)
    }

    async fn next(&mut self) -> Option<Frame> {
        self.incoming.next().await
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        let _ = self.socket.close();
    }
}
