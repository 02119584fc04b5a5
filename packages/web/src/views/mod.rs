mod home;
pub use home::Home;

mod cars;
pub use cars::Cars;

mod car_detail;
pub use car_detail::CarDetail;

mod bookings;
pub use bookings::Bookings;

mod dealer;
pub use dealer::Dealer;

mod admin;
pub use admin::Admin;

mod login;
pub use login::Login;

mod profile;
pub use profile::Profile;

mod bell;
pub use bell::Bell;

use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{CacheKey, Fetched, QueryCache, Severity};
use ui::{push_toast, Toasts};

/// Read-through load with toast reporting.
///
/// A failed refresh over a stale entry keeps showing the cached rows and
/// warns; a failed load with nothing cached shows an empty view and
/// errors.
pub(crate) async fn load<T, F, Fut>(
    cache: QueryCache,
    mut toasts: Signal<Toasts>,
    key: CacheKey,
    fetch: F,
) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = api::ApiResult<Vec<T>>>,
{
    match cache.fetch_with(key, fetch).await {
        Fetched::Cached(rows) | Fetched::Fetched(rows) => rows,
        Fetched::StaleAfterError(rows, err) => {
            push_toast(
                &mut toasts,
                Severity::Warning,
                &format!("Refresh failed, showing cached results: {err}"),
            );
            rows
        }
        Fetched::Failed(err) => {
            push_toast(&mut toasts, Severity::Error, &format!("Load failed: {err}"));
            Vec::new()
        }
    }
}
