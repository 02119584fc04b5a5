//! Session context and hooks for the UI.
//!
//! `SessionProvider` owns the signed-in profile, the shared query cache
//! and the ephemeral notice feed, and hands them out through context.
//! Signing out tears all three down explicitly so nothing from one
//! account leaks into the next.

use api::RemoteClient;
use dioxus::prelude::*;
use store::{NoticeFeed, QueryCache, UserProfile};

use crate::client::make_client;
use crate::toasts::Toasts;

/// Session state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }
}

/// What the change feed is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiveStatus {
    /// No feed running (signed out, or not started yet).
    #[default]
    Idle,
    /// Subscribed and delivering events.
    Live,
    /// The feed could not be started or has dropped; reads still work,
    /// they just go stale-unnoticed until the next refetch.
    Degraded,
}

/// Bumped once per applied change event. Views that read this inside a
/// resource refetch as soon as the feed invalidates something, instead
/// of waiting for the next navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataVersion(pub u64);

/// Get the current session state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_data_version() -> Signal<DataVersion> {
    use_context::<Signal<DataVersion>>()
}

pub fn use_live_status() -> Signal<LiveStatus> {
    use_context::<Signal<LiveStatus>>()
}

/// The cache shared by every view. Cheap to clone.
pub fn use_cache() -> QueryCache {
    use_context::<QueryCache>()
}

pub fn use_notices() -> Signal<NoticeFeed> {
    use_context::<Signal<NoticeFeed>>()
}

/// The remote client, or `None` when the backend is not configured.
pub fn use_client() -> Option<RemoteClient> {
    use_context::<Option<RemoteClient>>()
}

pub fn sign_in(mut session: Signal<SessionState>, user: UserProfile) {
    session.set(SessionState {
        user: Some(user),
        loading: false,
    });
}

/// Sign out and drop everything derived from the old session: the
/// cached query results and the notice feed.
pub fn sign_out(
    mut session: Signal<SessionState>,
    cache: &QueryCache,
    mut notices: Signal<NoticeFeed>,
) {
    cache.clear();
    notices.write().clear();
    session.set(SessionState::default());
}

/// Provider component that owns the session, cache and notices.
/// Wrap the app with this component (outside the router).
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let session = use_signal(SessionState::default);
    use_context_provider(|| session);

    let live = use_signal(LiveStatus::default);
    use_context_provider(|| live);

    let version = use_signal(DataVersion::default);
    use_context_provider(|| version);

    use_context_provider(QueryCache::new);

    let notices = use_signal(NoticeFeed::new);
    use_context_provider(|| notices);

    let toasts = use_signal(Toasts::default);
    use_context_provider(|| toasts);

    use_context_provider(make_client);

    rsx! {
        {children}
    }
}
