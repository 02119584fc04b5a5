//! # Tagged change events from the backend feed
//!
//! The change feed delivers raw row images as JSON. This module decodes
//! them at the subscription boundary into one [`ChangeEvent`] variant per
//! table, each carrying typed old/new snapshots — consumers never see an
//! untyped payload.
//!
//! The `old` image may be partial (the backend only replicates identity
//! columns for updates and deletes), so old snapshots decode best-effort
//! into `Option<T>`. The `new` image is required for inserts and updates;
//! a row that fails to decode there is a [`DecodeError`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Booking, Car, Dealership, NotificationRow, Review, Table, UserProfile};

/// What happened to the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change payload as it arrives on the wire, before typing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawChange {
    #[serde(rename = "eventType")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub old: Value,
    #[serde(default)]
    pub new: Value,
}

/// Typed before/after images for one row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowChange<T> {
    pub kind: ChangeKind,
    pub old: Option<T>,
    pub new: Option<T>,
}

impl<T> RowChange<T> {
    /// The most recent image: `new` if present, else `old`.
    pub fn row(&self) -> Option<&T> {
        self.new.as_ref().or(self.old.as_ref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("change event for {table} is missing a decodable row: {source}")]
    BadRow {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
}

/// One decoded change event, tagged by table.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    Car(RowChange<Car>),
    Booking(RowChange<Booking>),
    Dealership(RowChange<Dealership>),
    Review(RowChange<Review>),
    Notification(RowChange<NotificationRow>),
    Profile(RowChange<UserProfile>),
}

impl ChangeEvent {
    /// Decode a raw payload for `table` into the matching variant.
    pub fn decode(table: Table, raw: &RawChange) -> Result<ChangeEvent, DecodeError> {
        Ok(match table {
            Table::Cars => ChangeEvent::Car(decode_rows(table, raw)?),
            Table::Bookings => ChangeEvent::Booking(decode_rows(table, raw)?),
            Table::Dealerships => ChangeEvent::Dealership(decode_rows(table, raw)?),
            Table::Reviews => ChangeEvent::Review(decode_rows(table, raw)?),
            Table::Notifications => ChangeEvent::Notification(decode_rows(table, raw)?),
            Table::Profiles => ChangeEvent::Profile(decode_rows(table, raw)?),
        })
    }

    pub fn table(&self) -> Table {
        match self {
            ChangeEvent::Car(_) => Table::Cars,
            ChangeEvent::Booking(_) => Table::Bookings,
            ChangeEvent::Dealership(_) => Table::Dealerships,
            ChangeEvent::Review(_) => Table::Reviews,
            ChangeEvent::Notification(_) => Table::Notifications,
            ChangeEvent::Profile(_) => Table::Profiles,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Car(c) => c.kind,
            ChangeEvent::Booking(c) => c.kind,
            ChangeEvent::Dealership(c) => c.kind,
            ChangeEvent::Review(c) => c.kind,
            ChangeEvent::Notification(c) => c.kind,
            ChangeEvent::Profile(c) => c.kind,
        }
    }

    /// (table, row id) pairs whose single-row cache entries this event
    /// makes stale. A booking or review change also touches the car it
    /// refers to, since booking status and ratings show on the car.
    pub fn touched_rows(&self) -> Vec<(Table, String)> {
        let mut touched = Vec::new();
        match self {
            ChangeEvent::Car(c) => {
                if let Some(car) = c.row() {
                    touched.push((Table::Cars, car.id.clone()));
                }
            }
            ChangeEvent::Booking(c) => {
                if let Some(booking) = c.row() {
                    touched.push((Table::Bookings, booking.id.clone()));
                    touched.push((Table::Cars, booking.car_id.clone()));
                }
            }
            ChangeEvent::Dealership(c) => {
                if let Some(dealership) = c.row() {
                    touched.push((Table::Dealerships, dealership.id.clone()));
                }
            }
            ChangeEvent::Review(c) => {
                if let Some(review) = c.row() {
                    touched.push((Table::Reviews, review.id.clone()));
                    touched.push((Table::Cars, review.car_id.clone()));
                }
            }
            ChangeEvent::Notification(c) => {
                if let Some(row) = c.row() {
                    touched.push((Table::Notifications, row.id.clone()));
                }
            }
            ChangeEvent::Profile(c) => {
                if let Some(profile) = c.row() {
                    touched.push((Table::Profiles, profile.id.clone()));
                }
            }
        }
        touched
    }
}

fn decode_rows<T: DeserializeOwned>(
    table: Table,
    raw: &RawChange,
) -> Result<RowChange<T>, DecodeError> {
    let old = optional_row(&raw.old);
    let new = match raw.kind {
        ChangeKind::Insert | ChangeKind::Update => Some(
            serde_json::from_value(raw.new.clone())
                .map_err(|source| DecodeError::BadRow { table, source })?,
        ),
        ChangeKind::Delete => None,
    };
    Ok(RowChange {
        kind: raw.kind,
        old,
        new,
    })
}

/// Best-effort decode of a possibly partial or absent row image.
fn optional_row<T: DeserializeOwned>(value: &Value) -> Option<T> {
    let empty = match value.as_object() {
        Some(map) => map.is_empty(),
        None => value.is_null(),
    };
    if empty {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, CarStatus};
    use serde_json::json;

    fn car_json(id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "dealership_id": "d1",
            "brand": "Toyota",
            "model": "Yaris",
            "category": "compact",
            "daily_rate": 39.0,
            "status": status,
            "available": true,
            "city": "Lisbon",
            "latitude": null,
            "longitude": null,
            "image_urls": [],
            "created_at": "2026-08-01T10:00:00Z",
        })
    }

    #[test]
    fn decodes_car_update_with_typed_snapshots() {
        let raw = RawChange {
            kind: ChangeKind::Update,
            old: car_json("c1", "pending"),
            new: car_json("c1", "approved"),
        };
        let event = ChangeEvent::decode(Table::Cars, &raw).unwrap();
        let ChangeEvent::Car(change) = event else {
            panic!("expected a car event");
        };
        assert_eq!(change.old.unwrap().status, CarStatus::Pending);
        assert_eq!(change.new.unwrap().status, CarStatus::Approved);
    }

    #[test]
    fn partial_old_image_decodes_to_none() {
        let raw = RawChange {
            kind: ChangeKind::Update,
            // Replica identity only — not a full row.
            old: json!({ "id": "c1" }),
            new: car_json("c1", "approved"),
        };
        let event = ChangeEvent::decode(Table::Cars, &raw).unwrap();
        let ChangeEvent::Car(change) = event else {
            panic!("expected a car event");
        };
        assert!(change.old.is_none());
        assert!(change.new.is_some());
    }

    #[test]
    fn delete_carries_no_new_image() {
        let raw = RawChange {
            kind: ChangeKind::Delete,
            old: car_json("c1", "approved"),
            new: json!({}),
        };
        let event = ChangeEvent::decode(Table::Cars, &raw).unwrap();
        assert_eq!(event.kind(), ChangeKind::Delete);
        assert_eq!(event.touched_rows(), vec![(Table::Cars, "c1".to_string())]);
    }

    #[test]
    fn undecodable_insert_is_an_error() {
        let raw = RawChange {
            kind: ChangeKind::Insert,
            old: json!({}),
            new: json!({ "id": "c1" }),
        };
        assert!(ChangeEvent::decode(Table::Cars, &raw).is_err());
    }

    #[test]
    fn booking_event_touches_its_car_row() {
        let raw = RawChange {
            kind: ChangeKind::Update,
            old: json!({}),
            new: json!({
                "id": "b1",
                "car_id": "c7",
                "customer_id": "u1",
                "dealership_id": "d1",
                "status": "cancelled",
                "start_date": "2026-09-01T09:00:00Z",
                "end_date": "2026-09-03T09:00:00Z",
                "total_price": 120.0,
                "created_at": "2026-08-20T10:00:00Z",
            }),
        };
        let event = ChangeEvent::decode(Table::Bookings, &raw).unwrap();
        let ChangeEvent::Booking(ref change) = event else {
            panic!("expected a booking event");
        };
        assert_eq!(change.row().unwrap().status, BookingStatus::Cancelled);
        assert_eq!(
            event.touched_rows(),
            vec![
                (Table::Bookings, "b1".to_string()),
                (Table::Cars, "c7".to_string()),
            ]
        );
    }

    #[test]
    fn event_kind_tags_survive_the_wire_format() {
        let raw: RawChange = serde_json::from_value(json!({
            "eventType": "INSERT",
            "new": car_json("c2", "pending"),
        }))
        .unwrap();
        assert_eq!(raw.kind, ChangeKind::Insert);
        assert!(raw.old.is_null());
    }
}
