//! Navbar bell: persisted notification rows plus the ephemeral feed.

use dioxus::prelude::*;
use store::{NotificationRow, Severity};

use crate::icons::FaBell;
use crate::session::use_notices;
use crate::Icon;

/// Rows may carry no body; render nothing rather than a placeholder.
fn row_body(row: &NotificationRow) -> &str {
    row.body.as_deref().unwrap_or("")
}

fn notice_class(severity: &Severity) -> &'static str {
    match severity {
        Severity::Info => "notice--info",
        Severity::Success => "notice--success",
        Severity::Warning => "notice--warning",
        Severity::Error => "notice--error",
    }
}

/// Bell with an unread badge and a dropdown.
///
/// The dropdown shows the ephemeral notices assembled from the change
/// feed (newest first) above the persisted notification rows. Marking a
/// row read is delegated to the caller, which owns the remote write.
#[component]
pub fn NotificationBell(rows: Vec<NotificationRow>, on_mark_read: EventHandler<String>) -> Element {
    let notices = use_notices();
    let mut open = use_signal(|| false);

    let unread = rows.iter().filter(|row| !row.read).count();
    let feed = notices();

    rsx! {
        div { class: "notification-bell",
            button {
                class: "notification-bell__toggle",
                onclick: move |_| {
                    let next = !open();
                    open.set(next);
                },
                Icon { icon: FaBell, width: 16, height: 16 }
                if unread > 0 {
                    span { class: "notification-bell__badge", "{unread}" }
                }
            }
            if open() {
                div { class: "notification-bell__dropdown",
                    if feed.is_empty() && rows.is_empty() {
                        p { class: "notification-bell__empty", "Nothing new" }
                    }
                    for (index, notice) in feed.entries().enumerate() {
                        div {
                            key: "live-{index}",
                            class: "notice {notice_class(&notice.severity)}",
                            strong { "{notice.title}" }
                            p { "{notice.body}" }
                            if notice.action_required {
                                span { class: "notice__action", "Action required" }
                            }
                        }
                    }
                    for row in rows.iter() {
                        div {
                            key: "{row.id}",
                            class: if row.read { "notification notification--read" } else { "notification" },
                            strong { "{row.title}" }
                            if row.body.is_some() {
                                p { "{row_body(row)}" }
                            }
                            if !row.read {
                                button {
                                    class: "notification__mark-read",
                                    onclick: {
                                        let id = row.id.clone();
                                        move |_| on_mark_read.call(id.clone())
                                    },
                                    "Mark read"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::NotificationKind;

    fn row(body: Option<&str>) -> NotificationRow {
        NotificationRow {
            id: "n1".into(),
            recipient_id: "u1".into(),
            kind: NotificationKind::BookingConfirmed,
            title: "Booking Confirmed".into(),
            body: body.map(String::from),
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bodyless_rows_render_without_a_placeholder() {
        assert_eq!(row_body(&row(None)), "");
        assert_eq!(row_body(&row(Some("See you Monday."))), "See you Monday.");
    }
}
