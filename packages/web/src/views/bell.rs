use dioxus::prelude::*;
use store::{CacheKey, Severity, Table};
use ui::{
    push_toast, use_cache, use_client, use_data_version, use_session, use_toasts, NotificationBell,
};

/// Navbar bell wired to the signed-in user's notification rows.
#[component]
pub fn Bell() -> Element {
    let session = use_session();
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();

    let mark_client = client.clone();

    let mut rows = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let user_id = session.read().user.as_ref().map(|u| u.id.clone());
        let _ = version();
        async move {
            let (Some(client), Some(user_id)) = (client, user_id) else {
                return Vec::new();
            };
            let key = CacheKey::list(Table::Notifications, user_id.clone());
            super::load(cache, toasts, key, || async move {
                client.list_notifications(&user_id).await
            })
            .await
        }
    });

    let on_mark_read = move |id: String| {
        let Some(client) = mark_client.clone() else {
            return;
        };
        spawn(async move {
            match client.mark_notification_read(&id).await {
                Ok(()) => rows.restart(),
                Err(err) => {
                    push_toast(
                        &mut toasts,
                        Severity::Error,
                        &format!("Could not mark notification read: {err}"),
                    );
                }
            }
        });
    };

    rsx! {
        NotificationBell {
            rows: rows().unwrap_or_default(),
            on_mark_read,
        }
    }
}
