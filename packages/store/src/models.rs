//! # Domain models for the rental marketplace
//!
//! Row types as the hosted backend returns them, `Serialize + Deserialize`
//! so they can cross the network boundary and be snapshotted into the
//! query cache. Ids are strings (backend UUIDs) so the same types work in
//! WASM without a `Uuid` dependency; timestamps are `chrono::DateTime<Utc>`.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`UserProfile`] | The signed-in user's profile row, including their [`Role`] and, for dealers, the owning `dealership_id`. |
//! | [`Dealership`] | A rental location with coordinates, an active flag, and an aggregate rating. |
//! | [`Car`] | A listing: brand/model/category, daily rate, moderation [`CarStatus`], availability, location, and image URLs. |
//! | [`Booking`] | A customer's reservation of a car for a date range, with a [`BookingStatus`] lifecycle. |
//! | [`Review`] | A rating + comment on a car, with a visibility flag. |
//! | [`NotificationRow`] | A persisted notification (survives reloads, supports mark-as-read) — distinct from the session-local [`crate::notify::EphemeralNotice`]. |
//!
//! [`Table`] names every subscribable backend table and is the first
//! component of every cache key. [`Table::dependents`] records which other
//! tables' list views are derived from a table's rows, which drives
//! cross-entity cache invalidation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend table with a change feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Cars,
    Bookings,
    Dealerships,
    Reviews,
    Notifications,
    Profiles,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Cars => "cars",
            Table::Bookings => "bookings",
            Table::Dealerships => "dealerships",
            Table::Reviews => "reviews",
            Table::Notifications => "notifications",
            Table::Profiles => "profiles",
        }
    }

    pub fn parse(name: &str) -> Option<Table> {
        match name {
            "cars" => Some(Table::Cars),
            "bookings" => Some(Table::Bookings),
            "dealerships" => Some(Table::Dealerships),
            "reviews" => Some(Table::Reviews),
            "notifications" => Some(Table::Notifications),
            "profiles" => Some(Table::Profiles),
            _ => None,
        }
    }

    /// Tables whose list views are derived from rows of `self`.
    ///
    /// A booking change moves cars in and out of availability-filtered
    /// views; a review change moves a car's displayed rating.
    pub fn dependents(&self) -> &'static [Table] {
        match self {
            Table::Bookings => &[Table::Cars],
            Table::Reviews => &[Table::Cars],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role, assigned at signup by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Dealer,
    Admin,
}

/// Profile row for the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    /// Set for dealer accounts: the dealership they manage.
    pub dealership_id: Option<String>,
}

impl UserProfile {
    /// Display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dealership {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Moderation state of a car listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    Pending,
    Approved,
    Rejected,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Pending => "pending",
            CarStatus::Approved => "approved",
            CarStatus::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub dealership_id: String,
    pub brand: String,
    pub model: String,
    pub category: String,
    pub daily_rate: f64,
    pub status: CarStatus,
    pub available: bool,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Car {
    /// "Brand Model" label used in listings and notices.
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Fields the client submits when creating a listing; the backend assigns
/// `id`/`created_at` and the moderation flow owns `status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub dealership_id: String,
    pub brand: String,
    pub model: String,
    pub category: String,
    pub daily_rate: f64,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "requested",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub car_id: String,
    pub customer_id: String,
    pub dealership_id: String,
    pub status: BookingStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub car_id: String,
    pub customer_id: String,
    pub dealership_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub car_id: String,
    pub dealership_id: String,
    pub author_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub car_id: String,
    pub dealership_id: String,
    pub author_id: String,
    pub rating: u8,
    pub comment: Option<String>,
}

/// Kind tag on both persisted notifications and ephemeral notices.
///
/// `Other` is the forward-compatibility fallback for kinds this client
/// does not know about yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingRequest,
    BookingConfirmed,
    BookingCancelled,
    MessageReceived,
    ReviewReceived,
    CarAvailable,
    #[serde(other)]
    Other,
}

/// A persisted notification row, created server-side by triggers.
///
/// The `read` flag only transitions false→true.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: String,
    pub recipient_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_through_names() {
        for table in [
            Table::Cars,
            Table::Bookings,
            Table::Dealerships,
            Table::Reviews,
            Table::Notifications,
            Table::Profiles,
        ] {
            assert_eq!(Table::parse(table.as_str()), Some(table));
        }
        assert_eq!(Table::parse("messages"), None);
    }

    #[test]
    fn booking_and_review_changes_touch_car_lists() {
        assert_eq!(Table::Bookings.dependents(), &[Table::Cars]);
        assert_eq!(Table::Reviews.dependents(), &[Table::Cars]);
        assert!(Table::Cars.dependents().is_empty());
    }

    #[test]
    fn unknown_notification_kind_falls_back_to_other() {
        let kind: NotificationKind = serde_json::from_str("\"payment_due\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);

        let kind: NotificationKind = serde_json::from_str("\"booking_request\"").unwrap();
        assert_eq!(kind, NotificationKind::BookingRequest);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile {
            id: "u1".into(),
            email: "kim@example.com".into(),
            name: None,
            phone: None,
            avatar_url: None,
            role: Role::Customer,
            dealership_id: None,
        };
        assert_eq!(profile.display_name(), "kim@example.com");
    }
}
