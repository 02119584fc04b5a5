pub mod cache;
pub mod events;
pub mod models;
pub mod notify;

pub use cache::{CacheKey, CacheRead, Fetched, QueryCache, Scope};
pub use events::{ChangeEvent, ChangeKind, DecodeError, RawChange, RowChange};
pub use models::{
    Booking, BookingStatus, Car, CarStatus, Dealership, NewBooking, NewCar, NewReview,
    NotificationKind, NotificationRow, Review, Role, Table, UserProfile,
};
pub use notify::{notice_for_event, EphemeralNotice, NoticeFeed, Severity, NOTICE_CAP};
