use dioxus::prelude::*;
use store::{Booking, BookingStatus};

fn status_class(status: &BookingStatus) -> &'static str {
    match status {
        BookingStatus::Requested => "booking--requested",
        BookingStatus::Confirmed => "booking--confirmed",
        BookingStatus::Completed => "booking--completed",
        BookingStatus::Cancelled => "booking--cancelled",
    }
}

/// Bookings as a table, customer- or dealer-facing.
///
/// `can_manage` is true for the dealership side: it exposes the
/// confirm/complete transitions. Cancelling is available to both sides
/// while a booking is still requested or confirmed. The actual status
/// write belongs to the caller.
#[component]
pub fn BookingTable(
    bookings: Vec<Booking>,
    can_manage: bool,
    on_set_status: EventHandler<(String, BookingStatus)>,
) -> Element {
    if bookings.is_empty() {
        return rsx! {
            p { class: "booking-table__empty", "No bookings yet." }
        };
    }

    rsx! {
        table { class: "booking-table",
            thead {
                tr {
                    th { "Dates" }
                    th { "Status" }
                    th { "Total" }
                    th { "" }
                }
            }
            tbody {
                for booking in bookings {
                    BookingRow {
                        key: "{booking.id}",
                        booking: booking.clone(),
                        can_manage,
                        on_set_status,
                    }
                }
            }
        }
    }
}

#[component]
fn BookingRow(
    booking: Booking,
    can_manage: bool,
    on_set_status: EventHandler<(String, BookingStatus)>,
) -> Element {
    let id = booking.id.clone();
    let cancellable = matches!(
        booking.status,
        BookingStatus::Requested | BookingStatus::Confirmed
    );
    let dates = format!(
        "{} → {}",
        booking.start_date.format("%Y-%m-%d"),
        booking.end_date.format("%Y-%m-%d")
    );

    rsx! {
        tr { class: "{status_class(&booking.status)}",
            td { "{dates}" }
            td { "{booking.status.as_str()}" }
            td { "${booking.total_price:.2}" }
            td { class: "booking-table__actions",
                if can_manage && booking.status == BookingStatus::Requested {
                    button {
                        onclick: {
                            let id = id.clone();
                            move |_| on_set_status.call((id.clone(), BookingStatus::Confirmed))
                        },
                        "Confirm"
                    }
                }
                if can_manage && booking.status == BookingStatus::Confirmed {
                    button {
                        onclick: {
                            let id = id.clone();
                            move |_| on_set_status.call((id.clone(), BookingStatus::Completed))
                        },
                        "Complete"
                    }
                }
                if cancellable {
                    button {
                        class: "booking-table__cancel",
                        onclick: {
                            let id = id.clone();
                            move |_| on_set_status.call((id.clone(), BookingStatus::Cancelled))
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}
