use api::{BookingFilter, CarFilter, CarPatch};
use dioxus::prelude::*;
use store::{BookingStatus, CacheKey, NewCar, Role, Severity, Table};
use ui::{
    push_toast, use_cache, use_client, use_data_version, use_session, use_toasts, BookingTable,
    OwnerCarCard,
};

use crate::Route;

/// Dealer dashboard: own listings, incoming bookings, new-listing form.
#[component]
pub fn Dealer() -> Element {
    let session = use_session();
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();
    let nav = use_navigator();

    let dealership_id = session()
        .user
        .as_ref()
        .filter(|u| u.role == Role::Dealer)
        .and_then(|u| u.dealership_id.clone());

    let cars_client = client.clone();
    let cars_cache = cache.clone();
    let cars_dealership = dealership_id.clone();
    let mut cars = use_resource(move || {
        let client = cars_client.clone();
        let cache = cars_cache.clone();
        let dealership_id = cars_dealership.clone();
        let _ = version();
        async move {
            let (Some(client), Some(dealership_id)) = (client, dealership_id) else {
                return Vec::new();
            };
            let filter = CarFilter {
                dealership_id: Some(dealership_id),
                ..CarFilter::default()
            };
            let key = CacheKey::list(Table::Cars, filter.signature());
            super::load(cache, toasts, key, || async move {
                client.list_cars(&filter).await
            })
            .await
        }
    });

    let bookings_client = client.clone();
    let bookings_cache = cache.clone();
    let bookings_dealership = dealership_id.clone();
    let mut bookings = use_resource(move || {
        let client = bookings_client.clone();
        let cache = bookings_cache.clone();
        let dealership_id = bookings_dealership.clone();
        let _ = version();
        async move {
            let (Some(client), Some(dealership_id)) = (client, dealership_id) else {
                return Vec::new();
            };
            let filter = BookingFilter {
                dealership_id: Some(dealership_id),
                ..BookingFilter::default()
            };
            let key = CacheKey::list(Table::Bookings, filter.signature());
            super::load(cache, toasts, key, || async move {
                client.list_bookings(&filter).await
            })
            .await
        }
    });

    let Some(dealership_id) = dealership_id else {
        return rsx! {
            p { class: "page__signin-prompt", "This page is for dealership accounts." }
        };
    };

    let toggle_client = client.clone();
    let on_toggle_available = move |(id, available): (String, bool)| {
        let Some(client) = toggle_client.clone() else {
            return;
        };
        spawn(async move {
            let patch = CarPatch {
                available: Some(available),
                ..CarPatch::default()
            };
            match client.update_car(&id, &patch).await {
                Ok(_) => cars.restart(),
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Update failed: {err}"));
                }
            }
        });
    };

    let booking_client = client.clone();
    let on_set_status = move |(id, status): (String, BookingStatus)| {
        let Some(client) = booking_client.clone() else {
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
        section { class: "dealer",
            h1 { "Dealer dashboard" }

            h2 { "Incoming bookings" }
            match bookings() {
                Some(rows) => rsx! {
                    BookingTable {
                        bookings: rows,
                        can_manage: true,
                        on_set_status,
                    }
                },
                None => rsx! {
                    p { "Loading…" }
                },
            }

            h2 { "My listings" }
            match cars() {
                Some(list) if list.is_empty() => rsx! {
                    p { "No listings yet — add one below." }
                },
                Some(list) => rsx! {
                    div { class: "dealer__listings",
                        for car in list {
                            div { key: "{car.id}", class: "dealer__listing",
                                OwnerCarCard {
                                    car: car.clone(),
                                    on_select: move |id: String| {
                                        nav.push(Route::CarDetail { car_id: id });
                                    },
                                }
                                button {
                                    onclick: {
                                        let mut on_toggle = on_toggle_available.clone();
                                        let id = car.id.clone();
                                        let next = !car.available;
                                        move |_| on_toggle((id.clone(), next))
                                    },
                                    if car.available { "Mark unavailable" } else { "Mark available" }
                                }
                            }
                        }
                    }
                },
                None => rsx! {
                    p { "Loading…" }
                },
            }

            NewCarForm {
                dealership_id,
                on_created: move |_| cars.restart(),
            }
        }
    }
}

#[component]
fn NewCarForm(dealership_id: String, on_created: EventHandler<()>) -> Element {
    let client = use_client();
    let mut toasts = use_toasts();

    let mut brand = use_signal(String::new);
    let mut model = use_signal(String::new);
    let mut category = use_signal(|| "economy".to_string());
    let mut daily_rate = use_signal(String::new);
    let mut city = use_signal(String::new);

    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let Some(client) = client.clone() else {
            return;
        };
        let Ok(rate) = daily_rate().trim().parse::<f64>() else {
            push_toast(&mut toasts, Severity::Warning, "Enter a daily rate.");
            return;
        };
        if brand().trim().is_empty() || model().trim().is_empty() || city().trim().is_empty() {
            push_toast(&mut toasts, Severity::Warning, "Brand, model and city are required.");
            return;
        }

        let car = NewCar {
            dealership_id: dealership_id.clone(),
            brand: brand().trim().to_string(),
            model: model().trim().to_string(),
            category: category(),
            daily_rate: rate,
            city: city().trim().to_string(),
            latitude: None,
            longitude: None,
            image_urls: Vec::new(),
        };

        spawn(async move {
            match client.create_car(&car).await {
                Ok(_) => {
                    push_toast(
                        &mut toasts,
                        Severity::Success,
                        "Listing submitted for approval.",
                    );
                    brand.set(String::new());
                    model.set(String::new());
                    daily_rate.set(String::new());
                    city.set(String::new());
                    on_created.call(());
                }
                Err(err) => {
                    push_toast(
                        &mut toasts,
                        Severity::Error,
                        &format!("Could not create listing: {err}"),
                    );
                }
            }
        });
    };

    rsx! {
        form { class: "new-car-form", onsubmit,
            h2 { "Add a listing" }
            input {
                placeholder: "Brand",
                value: "{brand}",
                oninput: move |e| brand.set(e.value()),
            }
            input {
                placeholder: "Model",
                value: "{model}",
                oninput: move |e| model.set(e.value()),
            }
            select {
                value: "{category}",
                onchange: move |e| category.set(e.value()),
                for c in super::cars::CATEGORIES {
                    option { value: "{c}", "{c}" }
                }
            }
            input {
                r#type: "number",
                placeholder: "Daily rate ($)",
                value: "{daily_rate}",
                oninput: move |e| daily_rate.set(e.value()),
            }
            input {
                placeholder: "City",
                value: "{city}",
                oninput: move |e| city.set(e.value()),
            }
            button { r#type: "submit", "Submit for approval" }
        }
    }
}
