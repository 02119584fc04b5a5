//! # Ephemeral notices synthesized from change events
//!
//! Not every event the backend pushes has a persisted
//! [`crate::models::NotificationRow`] behind it — a status flip on a car
//! the current dealer owns, for example, only arrives as a change event.
//! [`notice_for_event`] inspects which field changed and its new value and
//! synthesizes a session-local [`EphemeralNotice`] when the event concerns
//! the viewer.
//!
//! Notices live in a [`NoticeFeed`]: newest first, capped at
//! [`NOTICE_CAP`] with FIFO eviction. They are never persisted and do not
//! survive a reload — unlike notification rows, which are fetched through
//! the remote client and support mark-as-read.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::events::{ChangeEvent, ChangeKind};
use crate::models::{CarStatus, NotificationKind, Role, UserProfile};

/// Maximum number of notices kept per session; oldest drop first.
pub const NOTICE_CAP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EphemeralNotice {
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    /// The recipient is expected to act (e.g. fix and resubmit a listing).
    pub action_required: bool,
    pub occurred_at: DateTime<Utc>,
}

impl EphemeralNotice {
    fn new(
        kind: NotificationKind,
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            title: title.into(),
            body: body.into(),
            action_required: false,
            occurred_at: Utc::now(),
        }
    }

    fn action_required(mut self) -> Self {
        self.action_required = true;
        self
    }
}

/// Bounded, newest-first feed of session-local notices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeFeed {
    entries: VecDeque<EphemeralNotice>,
}

impl NoticeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push to the front; evict the oldest entry once over capacity.
    pub fn push(&mut self, notice: EphemeralNotice) {
        self.entries.push_front(notice);
        while self.entries.len() > NOTICE_CAP {
            self.entries.pop_back();
        }
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &EphemeralNotice> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Synthesize a notice for `viewer` from one decoded change event.
///
/// Returns `None` for events that do not concern the viewer or that the
/// backend already materializes as a notification row.
pub fn notice_for_event(event: &ChangeEvent, viewer: &UserProfile) -> Option<EphemeralNotice> {
    match event {
        ChangeEvent::Car(change) if change.kind == ChangeKind::Update => {
            let new = change.new.as_ref()?;
            let old = change.old.as_ref();

            let owns = viewer.dealership_id.as_deref() == Some(new.dealership_id.as_str());
            // Replica identity usually strips the old image down to the
            // key, in which case it decodes to `None`; treat that as a
            // flip so moderation results still reach the owner live.
            let status_flipped = old.map_or(true, |o| o.status != new.status);

            if owns && status_flipped {
                return match new.status {
                    CarStatus::Approved => Some(EphemeralNotice::new(
                        NotificationKind::Other,
                        Severity::Success,
                        "Car Listing Approved",
                        format!("{} is now visible to customers.", new.title()),
                    )),
                    CarStatus::Rejected => Some(
                        EphemeralNotice::new(
                            NotificationKind::Other,
                            Severity::Error,
                            "Car Listing Rejected",
                            format!("{} was rejected. Review and resubmit the listing.", new.title()),
                        )
                        .action_required(),
                    ),
                    CarStatus::Pending => None,
                };
            }

            // A car coming back into availability interests customers.
            let became_available = old.map(|o| !o.available && new.available).unwrap_or(false);
            if viewer.role == Role::Customer && became_available && new.status == CarStatus::Approved
            {
                return Some(EphemeralNotice::new(
                    NotificationKind::CarAvailable,
                    Severity::Info,
                    "Car Available",
                    format!("{} in {} is available again.", new.title(), new.city),
                ));
            }
            None
        }
        ChangeEvent::Booking(change) => {
            let booking = change.new.as_ref()?;
            let for_dealer = viewer.dealership_id.as_deref() == Some(booking.dealership_id.as_str());
            let for_customer = viewer.id == booking.customer_id;

            match change.kind {
                ChangeKind::Insert if for_dealer => Some(
                    EphemeralNotice::new(
                        NotificationKind::BookingRequest,
                        Severity::Info,
                        "New Booking Request",
                        format!("A customer requested a booking ({}).", booking.id),
                    )
                    .action_required(),
                ),
                ChangeKind::Update => {
                    use crate::models::BookingStatus;
                    let changed = change
                        .old
                        .as_ref()
                        .map(|o| o.status != booking.status)
                        .unwrap_or(true);
                    if !changed {
                        return None;
                    }
                    match booking.status {
                        BookingStatus::Confirmed if for_customer => Some(EphemeralNotice::new(
                            NotificationKind::BookingConfirmed,
                            Severity::Success,
                            "Booking Confirmed",
                            "Your booking was confirmed by the dealership.",
                        )),
                        BookingStatus::Cancelled if for_customer || for_dealer => {
                            Some(EphemeralNotice::new(
                                NotificationKind::BookingCancelled,
                                Severity::Warning,
                                "Booking Cancelled",
                                format!("Booking {} was cancelled.", booking.id),
                            ))
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        }
        ChangeEvent::Review(change) if change.kind == ChangeKind::Insert => {
            let review = change.new.as_ref()?;
            let for_dealer = viewer.dealership_id.as_deref() == Some(review.dealership_id.as_str());
            if for_dealer && review.visible {
                Some(EphemeralNotice::new(
                    NotificationKind::ReviewReceived,
                    Severity::Info,
                    "New Review",
                    format!("A customer left a {}-star review.", review.rating),
                ))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RawChange, RowChange};
    use crate::models::{Car, Table};
    use serde_json::json;

    fn dealer() -> UserProfile {
        UserProfile {
            id: "u-dealer".into(),
            email: "dealer@example.com".into(),
            name: Some("Dealer".into()),
            phone: None,
            avatar_url: None,
            role: Role::Dealer,
            dealership_id: Some("d1".into()),
        }
    }

    fn customer() -> UserProfile {
        UserProfile {
            id: "u-customer".into(),
            email: "customer@example.com".into(),
            name: None,
            phone: None,
            avatar_url: None,
            role: Role::Customer,
            dealership_id: None,
        }
    }

    fn car(status: &str, available: bool) -> Car {
        serde_json::from_value(json!({
            "id": "c1",
            "dealership_id": "d1",
            "brand": "Toyota",
            "model": "Yaris",
            "category": "compact",
            "daily_rate": 39.0,
            "status": status,
            "available": available,
            "city": "Lisbon",
            "latitude": null,
            "longitude": null,
            "image_urls": [],
            "created_at": "2026-08-01T10:00:00Z",
        }))
        .unwrap()
    }

    fn car_status_event(old: &str, new: &str) -> ChangeEvent {
        ChangeEvent::Car(RowChange {
            kind: ChangeKind::Update,
            old: Some(car(old, true)),
            new: Some(car(new, true)),
        })
    }

    #[test]
    fn approval_yields_one_success_notice_for_the_owner() {
        let event = car_status_event("pending", "approved");

        let notice = notice_for_event(&event, &dealer()).unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.title, "Car Listing Approved");
        assert!(!notice.action_required);

        // A customer gets nothing from someone else's moderation flow.
        assert!(notice_for_event(&event, &customer()).is_none());
    }

    #[test]
    fn rejection_is_an_error_flagged_action_required() {
        let notice =
            notice_for_event(&car_status_event("pending", "rejected"), &dealer()).unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.title, "Car Listing Rejected");
        assert!(notice.action_required);
    }

    #[test]
    fn unchanged_status_yields_nothing() {
        assert!(notice_for_event(&car_status_event("approved", "approved"), &dealer()).is_none());
    }

    #[test]
    fn availability_flip_notifies_customers() {
        let event = ChangeEvent::Car(RowChange {
            kind: ChangeKind::Update,
            old: Some(car("approved", false)),
            new: Some(car("approved", true)),
        });
        let notice = notice_for_event(&event, &customer()).unwrap();
        assert_eq!(notice.kind, NotificationKind::CarAvailable);
    }

    #[test]
    fn moderation_notice_survives_a_key_only_old_image() {
        // Production replicas often send just the key as the old image,
        // which decodes to no row at all.
        let raw = RawChange {
            kind: ChangeKind::Update,
            old: json!({ "id": "c1" }),
            new: serde_json::to_value(car("approved", true)).unwrap(),
        };
        let event = ChangeEvent::decode(Table::Cars, &raw).unwrap();

        let notice = notice_for_event(&event, &dealer()).unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.title, "Car Listing Approved");
    }

    #[test]
    fn feed_is_bounded_and_newest_first() {
        let mut feed = NoticeFeed::new();
        for i in 0..(NOTICE_CAP + 3) {
            feed.push(EphemeralNotice::new(
                NotificationKind::Other,
                Severity::Info,
                format!("notice {i}"),
                "",
            ));
        }
        assert_eq!(feed.len(), NOTICE_CAP);
        // Newest at the front, the first three evicted from the back.
        let titles: Vec<_> = feed.entries().map(|n| n.title.as_str()).collect();
        assert_eq!(titles.first(), Some(&"notice 12"));
        assert_eq!(titles.last(), Some(&"notice 3"));
    }

    #[test]
    fn booking_cancellation_notifies_both_parties() {
        let raw = RawChange {
            kind: ChangeKind::Update,
            old: json!({}),
            new: json!({
                "id": "b1",
                "car_id": "c1",
                "customer_id": "u-customer",
                "dealership_id": "d1",
                "status": "cancelled",
                "start_date": "2026-09-01T09:00:00Z",
                "end_date": "2026-09-03T09:00:00Z",
                "total_price": 120.0,
                "created_at": "2026-08-20T10:00:00Z",
            }),
        };
        let event = ChangeEvent::decode(Table::Bookings, &raw).unwrap();

        let for_customer = notice_for_event(&event, &customer()).unwrap();
        assert_eq!(for_customer.kind, NotificationKind::BookingCancelled);
        let for_dealer = notice_for_event(&event, &dealer()).unwrap();
        assert_eq!(for_dealer.severity, Severity::Warning);
    }
}
