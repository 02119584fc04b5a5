//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod client;
pub use client::make_client;

pub mod session;
pub use session::{
    sign_in, sign_out, use_cache, use_client, use_data_version, use_live_status, use_notices,
    use_session, DataVersion, LiveStatus, SessionProvider, SessionState,
};

mod live;
pub use live::LiveProvider;

pub mod toasts;
pub use toasts::{push_toast, use_toasts, Toast, ToastList, Toasts};

mod connection_indicator;
pub use connection_indicator::ConnectionIndicator;

mod notification_bell;
pub use notification_bell::NotificationBell;

mod car_card;
pub use car_card::{CarCard, CarGrid, OwnerCarCard};

mod booking_table;
pub use booking_table::BookingTable;
