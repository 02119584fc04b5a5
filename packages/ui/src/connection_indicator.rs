//! Live/degraded status indicator for the navbar.

use dioxus::prelude::*;

use crate::icons::{FaCircleExclamation, FaUserSlash, FaWifi};
use crate::session::{use_live_status, use_session, LiveStatus};
use crate::Icon;

/// A small icon that shows whether the change feed is running.
///
/// - **Signed in + live**: green wifi icon ("Live updates")
/// - **Signed in + degraded**: orange exclamation ("Updates paused")
/// - **Anonymous**: gray slashed-user icon ("Sign in for live updates")
#[component]
pub fn ConnectionIndicator() -> Element {
    let session = use_session();
    let status = use_live_status();
    let state = session();

    if state.loading {
        return rsx! {};
    }

    match (&state.user, status()) {
        (Some(_), LiveStatus::Live) => rsx! {
            span {
                class: "connection-indicator connection-indicator--live",
                title: "Live updates",
                Icon { icon: FaWifi, width: 14, height: 14 }
            }
        },
        (Some(_), _) => rsx! {
            span {
                class: "connection-indicator connection-indicator--degraded",
                title: "Updates paused — data refreshes on navigation",
                Icon { icon: FaCircleExclamation, width: 14, height: 14 }
            }
        },
        (None, _) => rsx! {
            span {
                class: "connection-indicator connection-indicator--anonymous",
                title: "Sign in for live updates",
                Icon { icon: FaUserSlash, width: 14, height: 14 }
            }
        },
    }
}
