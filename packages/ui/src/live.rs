//! Change-feed wiring: one feed per signed-in session.
//!
//! `LiveProvider` starts the realtime subscriber when a user signs in,
//! routes every decoded event into the shared cache (invalidation) and
//! the notice feed (assembly), and tears the feed down when the user
//! signs out or the provider unmounts.

use api::realtime::{connect, ChannelConfig, EventMask, RealtimeClient};
use dioxus::prelude::*;
use store::{notice_for_event, NoticeFeed, QueryCache, Table, UserProfile};

use crate::session::{
    use_cache, use_client, use_data_version, use_notices, use_session, DataVersion, LiveStatus,
};

/// Tables the feed watches. Profiles and dealerships change rarely
/// enough that the next navigation picks them up.
const WATCHED: [Table; 4] = [
    Table::Cars,
    Table::Bookings,
    Table::Reviews,
    Table::Notifications,
];

/// Provider component that keeps one change feed alive per session.
/// Must be mounted inside [`crate::session::SessionProvider`].
#[component]
pub fn LiveProvider(children: Element) -> Element {
    let session = use_session();
    let cache = use_cache();
    let notices = use_notices();
    let client = use_client();
    let mut status = use_context::<Signal<LiveStatus>>();
    let version = use_data_version();
    let mut feed_task = use_signal(|| None::<Task>);

    // Restart the feed whenever the signed-in user changes.
    use_effect(move || {
        let user = session.read().user.clone();

        if let Some(task) = feed_task.write().take() {
            task.cancel();
        }

        let Some(user) = user else {
            status.set(LiveStatus::Idle);
            return;
        };
        let Some(client) = client.clone() else {
            status.set(LiveStatus::Degraded);
            return;
        };

        let cache = cache.clone();
        let task = spawn(async move {
            run_feed(client, user, cache, notices, version, status).await;
        });
        feed_task.set(Some(task));
    });

    use_drop(move || {
        if let Some(task) = feed_task.write().take() {
            task.cancel();
        }
    });

    rsx! {
        {children}
    }
}

async fn run_feed(
    client: api::RemoteClient,
    user: UserProfile,
    cache: QueryCache,
    notices: Signal<NoticeFeed>,
    version: Signal<DataVersion>,
    mut status: Signal<LiveStatus>,
) {
    let transport = match connect(client.config()).await {
        Ok(transport) => transport,
        Err(err) => {
            tracing::warn!("change feed unavailable: {err}");
            status.set(LiveStatus::Degraded);
            return;
        }
    };

    let mut realtime = RealtimeClient::new(transport);
    for table in WATCHED {
        let cache = cache.clone();
        let user = user.clone();
        let mut notices = notices;
        let mut version = version;
        let subscribed = realtime
            .subscribe(ChannelConfig::new(table, EventMask::All), move |event| {
                cache.invalidate(event);
                if let Some(notice) = notice_for_event(event, &user) {
                    notices.write().push(notice);
                }
                let next = DataVersion(version.peek().0 + 1);
                version.set(next);
            })
            .await;
        if let Err(err) = subscribed {
            tracing::warn!(%table, "subscription failed: {err}");
            status.set(LiveStatus::Degraded);
            return;
        }
    }

    status.set(LiveStatus::Live);
    realtime.run().await;

    // The transport closed under us. Views keep working off fetches.
    status.set(LiveStatus::Degraded);
}
