//! # Change-feed subscriber
//!
//! [`RealtimeClient`] drives one socket-level [`Transport`] and multiplexes
//! any number of logical channels over it, one per `subscribe` call. On
//! every inbound `postgres_changes` frame it decodes the payload into a
//! typed [`ChangeEvent`] and invokes the matching channels' callbacks
//! synchronously — no other transformation happens here.
//!
//! - Multiple subscriptions on the same table are independent.
//! - [`RealtimeClient::unsubscribe`] is idempotent: the second call on a
//!   handle is a no-op with no duplicate teardown.
//! - Connection state is observable via a `tokio::sync::watch` receiver.
//!   There is no reconnect or backoff: once the transport closes, events
//!   stop until a new subscription is established on a new client.

pub mod frame;
pub mod transport;
#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(all(not(target_arch = "wasm32"), feature = "native-ws"))]
pub mod ws;

use std::collections::HashMap;

use tokio::sync::watch;

pub use frame::{ChannelConfig, EventMask, Frame};
pub use transport::{loopback, LoopbackRemote, LoopbackTransport, Transport, TransportClosed};

use crate::error::{ApiResult, Error};
use store::events::ChangeEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Opaque handle identifying one subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: u64,
}

type Callback = Box<dyn FnMut(&ChangeEvent)>;

struct Channel {
    config: ChannelConfig,
    callback: Callback,
}

pub struct RealtimeClient<T: Transport> {
    transport: T,
    channels: HashMap<u64, Channel>,
    next_ref: u64,
    state: watch::Sender<ConnectionState>,
}

impl<T: Transport> RealtimeClient<T> {
    /// Wrap an established transport.
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(ConnectionState::Connected);
        Self {
            transport,
            channels: HashMap::new(),
            next_ref: 0,
            state,
        }
    }

    /// Observe the connection state.
    pub fn connection(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    fn next_ref(&mut self) -> u64 {
        self.next_ref += 1;
        self.next_ref
    }

    /// Open a channel for `config`; `callback` fires synchronously for
    /// every matching decoded event.
    pub async fn subscribe(
        &mut self,
        config: ChannelConfig,
        callback: impl FnMut(&ChangeEvent) + 'static,
    ) -> ApiResult<SubscriptionHandle> {
        let reference = self.next_ref();
        self.transport
            .send(Frame::join(&config, reference))
            .await
            .map_err(|err| Error::subscription(err.to_string()))?;
        self.channels.insert(
            reference,
            Channel {
                config,
                callback: Box::new(callback),
            },
        );
        Ok(SubscriptionHandle { id: reference })
    }

    /// Tear a channel down. Unknown or already-removed handles are a
    /// no-op.
    pub async fn unsubscribe(&mut self, handle: &SubscriptionHandle) -> ApiResult<()> {
        let Some(channel) = self.channels.remove(&handle.id) else {
            return Ok(());
        };
        let reference = self.next_ref();
        self.transport
            .send(Frame::leave(&channel.config.topic(), reference))
            .await
            .map_err(|err| Error::subscription(err.to_string()))?;
        Ok(())
    }

    /// Process the next inbound frame. Returns `false` once the
    /// transport has closed (and flips the observable state).
    pub async fn poll(&mut self) -> bool {
        match self.transport.next().await {
            Some(frame) => {
                self.dispatch(frame);
                true
            }
            None => {
                let _ = self.state.send(ConnectionState::Disconnected);
                false
            }
        }
    }

    /// Drive the dispatch loop until the transport closes.
    pub async fn run(&mut self) {
        while self.poll().await {}
    }

    fn dispatch(&mut self, frame: Frame) {
        if frame.is_error_reply() {
            tracing::warn!(topic = %frame.topic, "channel join rejected");
            return;
        }
        let Some(raw) = frame.change_payload() else {
            return;
        };
        for channel in self.channels.values_mut() {
            if channel.config.topic() != frame.topic || !channel.config.events.matches(raw.kind) {
                continue;
            }
            match ChangeEvent::decode(channel.config.table, &raw) {
                Ok(event) => (channel.callback)(&event),
                Err(err) => {
                    tracing::warn!(topic = %frame.topic, "dropping undecodable change: {err}");
                }
            }
        }
    }
}

/// Connect the realtime transport for this platform.
#[cfg(target_arch = "wasm32")]
pub async fn connect(config: &crate::config::AppConfig) -> ApiResult<web::WebSocketTransport> {
    web::connect(&config.realtime_url()).await
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native-ws"))]
pub async fn connect(config: &crate::config::AppConfig) -> ApiResult<ws::WsTransport> {
    ws::connect(&config.realtime_url()).await
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "native-ws")))]
pub async fn connect(config: &crate::config::AppConfig) -> ApiResult<LoopbackTransport> {
    let _ = config;
    Err(Error::subscription(
        "no realtime transport built in; enable the `native-ws` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use store::events::{ChangeKind, RawChange};
    use store::models::Table;

    fn car_change(kind: ChangeKind, id: &str) -> RawChange {
        RawChange {
            kind,
            old: json!({}),
            new: json!({
                "id": id,
                "dealership_id": "d1",
                "brand": "Fiat",
                "model": "Panda",
                "category": "compact",
                "daily_rate": 25.0,
                "status": "approved",
                "available": true,
                "city": "Porto",
                "latitude": null,
                "longitude": null,
                "image_urls": [],
                "created_at": "2026-08-01T10:00:00Z",
            }),
        }
    }

    #[tokio::test]
    async fn subscribing_joins_a_channel() {
        let (transport, mut remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        client
            .subscribe(ChannelConfig::new(Table::Cars, EventMask::All), |_| {})
            .await
            .unwrap();

        let join = remote.sent().await.unwrap();
        assert_eq!(join.event, "phx_join");
        assert_eq!(join.topic, "realtime:public:cars");
    }

    #[tokio::test]
    async fn events_reach_the_callback_decoded_and_in_order() {
        let (transport, remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        client
            .subscribe(ChannelConfig::new(Table::Cars, EventMask::All), move |e| {
                if let ChangeEvent::Car(change) = e {
                    sink.borrow_mut()
                        .push(change.row().map(|c| c.id.clone()).unwrap_or_default());
                }
            })
            .await
            .unwrap();

        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Insert, "c1"))
            .unwrap();
        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Update, "c2"))
            .unwrap();
        assert!(client.poll().await);
        assert!(client.poll().await);

        assert_eq!(*seen.borrow(), vec!["c1".to_string(), "c2".to_string()]);
    }

    #[tokio::test]
    async fn event_mask_filters_delivery() {
        let (transport, remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        let inserts = Rc::new(RefCell::new(0u32));
        let sink = inserts.clone();
        client
            .subscribe(
                ChannelConfig::new(Table::Cars, EventMask::Insert),
                move |_| *sink.borrow_mut() += 1,
            )
            .await
            .unwrap();

        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Update, "c1"))
            .unwrap();
        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Insert, "c2"))
            .unwrap();
        client.poll().await;
        client.poll().await;

        assert_eq!(*inserts.borrow(), 1);
    }

    #[tokio::test]
    async fn same_table_subscribers_are_independent() {
        let (transport, remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        let first = Rc::new(RefCell::new(0u32));
        let second = Rc::new(RefCell::new(0u32));
        let sink = first.clone();
        client
            .subscribe(ChannelConfig::new(Table::Cars, EventMask::All), move |_| {
                *sink.borrow_mut() += 1
            })
            .await
            .unwrap();
        let sink = second.clone();
        client
            .subscribe(ChannelConfig::new(Table::Cars, EventMask::All), move |_| {
                *sink.borrow_mut() += 1
            })
            .await
            .unwrap();

        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Insert, "c1"))
            .unwrap();
        client.poll().await;

        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let (transport, mut remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        let deliveries = Rc::new(RefCell::new(0u32));
        let sink = deliveries.clone();
        let handle = client
            .subscribe(ChannelConfig::new(Table::Cars, EventMask::All), move |_| {
                *sink.borrow_mut() += 1
            })
            .await
            .unwrap();
        let _join = remote.sent().await.unwrap();

        client.unsubscribe(&handle).await.unwrap();
        let leave = remote.sent().await.unwrap();
        assert_eq!(leave.event, "phx_leave");

        // Second call: no error, no second leave frame.
        client.unsubscribe(&handle).await.unwrap();
        assert!(remote.try_sent().is_none());

        // Events after teardown are not delivered.
        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Insert, "c1"))
            .unwrap();
        client.poll().await;
        assert_eq!(*deliveries.borrow(), 0);
    }

    #[tokio::test]
    async fn connection_state_flips_on_transport_close() {
        let (transport, remote) = loopback();
        let mut client = RealtimeClient::new(transport);
        let state = client.connection();
        assert_eq!(*state.borrow(), ConnectionState::Connected);

        drop(remote);
        assert!(!client.poll().await);
        assert_eq!(*state.borrow(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn filtered_channels_only_match_their_topic() {
        let (transport, remote) = loopback();
        let mut client = RealtimeClient::new(transport);

        let deliveries = Rc::new(RefCell::new(0u32));
        let sink = deliveries.clone();
        client
            .subscribe(
                ChannelConfig::new(Table::Cars, EventMask::All).with_filter("id=eq.c9"),
                move |_| *sink.borrow_mut() += 1,
            )
            .await
            .unwrap();

        // Arrives on the unfiltered topic; the filtered channel ignores it.
        remote
            .push_change(Table::Cars, &car_change(ChangeKind::Insert, "c1"))
            .unwrap();
        client.poll().await;
        assert_eq!(*deliveries.borrow(), 0);
    }
}
