//! # API crate — the remote boundary of the marketplace
//!
//! Everything that talks to the hosted backend lives here. The crate is
//! platform-neutral: the same code runs in the browser (WASM) and in
//! native tests.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`RemoteClient`] — typed CRUD over the table store's REST dialect, with the [`Query`] filter builder and per-entity operations |
//! | [`realtime`] | Change-feed subscriber: Phoenix-style channels over a pluggable [`realtime::Transport`], delivering typed [`store::ChangeEvent`]s |
//! | [`storage`] | File uploads with client-side validation (size, type, image cap) |
//! | [`config`] | Environment-driven backend configuration |
//! | [`error`] | [`Error`] taxonomy: `Remote` / `Validation` / `Subscription` |

pub mod client;
pub mod config;
pub mod error;
pub mod realtime;
pub mod storage;

pub use client::{
    BookingFilter, CarFilter, CarPatch, DealershipPatch, ProfilePatch, Query, RemoteClient,
};
pub use config::AppConfig;
pub use error::{ApiResult, Error};
pub use realtime::{ChannelConfig, ConnectionState, EventMask, RealtimeClient, SubscriptionHandle};
pub use storage::{MAX_CAR_IMAGES, MAX_UPLOAD_BYTES};
