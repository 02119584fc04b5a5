use api::BookingFilter;
use dioxus::prelude::*;
use store::{BookingStatus, CacheKey, Severity, Table};
use ui::{push_toast, use_cache, use_client, use_data_version, use_session, use_toasts, BookingTable};

use crate::Route;

/// The signed-in customer's bookings, newest first.
#[component]
pub fn Bookings() -> Element {
    let session = use_session();
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();

    let write_client = client.clone();

    let mut bookings = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let user_id = session.read().user.as_ref().map(|u| u.id.clone());
        let _ = version();
        async move {
            let (Some(client), Some(user_id)) = (client, user_id) else {
                return Vec::new();
            };
            let filter = BookingFilter {
                customer_id: Some(user_id),
                ..BookingFilter::default()
            };
            let key = CacheKey::list(Table::Bookings, filter.signature());
            super::load(cache, toasts, key, || async move {
                client.list_bookings(&filter).await
            })
            .await
        }
    });

    if session().user.is_none() {
        return rsx! {
            p { class: "page__signin-prompt",
                "Sign in to see your bookings. "
                Link { to: Route::Login {}, "Sign in" }
            }
        };
    }

    let on_set_status = move |(id, status): (String, BookingStatus)| {
        let Some(client) = write_client.clone() else {
            return;
        };
        spawn(async move {
            match client.set_booking_status(&id, status).await {
                Ok(_) => {
                    push_toast(&mut toasts, Severity::Success, "Booking updated.");
                    bookings.restart();
                }
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Update failed: {err}"));
                }
            }
        });
    };

    rsx! {
        section { class: "bookings",
            h1 { "My bookings" }
            match bookings() {
                Some(rows) => rsx! {
                    BookingTable {
                        bookings: rows,
                        can_manage: false,
                        on_set_status,
                    }
                },
                None => rsx! {
                    p { "Loading…" }
                },
            }
        }
    }
}
