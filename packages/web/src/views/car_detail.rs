use chrono::{DateTime, NaiveDate, Utc};
use dioxus::prelude::*;
use store::{CacheKey, Fetched, NewBooking, NewReview, Severity, Table};
use ui::{push_toast, use_cache, use_client, use_data_version, use_session, use_toasts};

/// Listing page: gallery, booking form and reviews.
#[component]
pub fn CarDetail(car_id: String) -> Element {
    let session = use_session();
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();

    let car_client = client.clone();
    let car_cache = cache.clone();
    let car_key_id = car_id.clone();
    let car = use_resource(move || {
        let client = car_client.clone();
        let cache = car_cache.clone();
        let id = car_key_id.clone();
        let _ = version();
        async move {
            let Some(client) = client else { return None };
            let key = CacheKey::row(Table::Cars, id.clone());
            match cache
                .fetch_with(key, || async move { client.get_car(&id).await })
                .await
            {
                Fetched::Cached(car) | Fetched::Fetched(car) => car,
                Fetched::StaleAfterError(car, err) => {
                    push_toast(
                        &mut toasts,
                        Severity::Warning,
                        &format!("Refresh failed, showing cached listing: {err}"),
                    );
                    car
                }
                Fetched::Failed(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Load failed: {err}"));
                    None
                }
            }
        }
    });

    let review_client = client.clone();
    let review_cache = cache.clone();
    let review_key_id = car_id.clone();
    let mut reviews = use_resource(move || {
        let client = review_client.clone();
        let cache = review_cache.clone();
        let id = review_key_id.clone();
        let _ = version();
        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            let key = CacheKey::list(Table::Reviews, id.clone());
            super::load(cache, toasts, key, || async move {
                client.list_reviews(&id).await
            })
            .await
        }
    });

    rsx! {
        match car() {
            Some(Some(car)) => rsx! {
                article { class: "car-detail",
                    h1 { "{car.title()}" }
                    div { class: "car-detail__gallery",
                        for (index, url) in car.image_urls.iter().enumerate() {
                            img { key: "{index}", src: "{url}", alt: "{car.title()}" }
                        }
                    }
                    p { class: "car-detail__meta",
                        "{car.category} · {car.city} · ${car.daily_rate:.2} / day"
                    }
                    if car.available {
                        BookingForm { car: car.clone() }
                    } else {
                        p { class: "car-detail__unavailable", "This car is currently rented out." }
                    }
                    section { class: "reviews",
                        h2 { "Reviews" }
                        match reviews() {
                            Some(list) if list.is_empty() => rsx! {
                                p { "No reviews yet." }
                            },
                            Some(list) => rsx! {
                                ul { class: "review-list",
                                    for review in list {
                                        li { key: "{review.id}",
                                            span { class: "review-list__rating", "★ {review.rating}" }
                                            if let Some(comment) = &review.comment {
                                                p { "{comment}" }
                                            }
                                        }
                                    }
                                }
                            },
                            None => rsx! {
                                p { "Loading reviews…" }
                            },
                        }
                        if session().user.is_some() {
                            ReviewForm {
                                car_id: car.id.clone(),
                                dealership_id: car.dealership_id.clone(),
                                on_submitted: move |_| reviews.restart(),
                            }
                        }
                    }
                }
            },
            Some(None) => rsx! {
                p { class: "car-detail__missing", "This listing no longer exists." }
            },
            None => rsx! {
                p { "Loading…" }
            },
        }
    }
}

fn parse_day(value: &str) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

#[component]
fn BookingForm(car: store::Car) -> Element {
    let session = use_session();
    let client = use_client();
    let mut toasts = use_toasts();

    let mut start = use_signal(String::new);
    let mut end = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let quote = match (parse_day(&start()), parse_day(&end())) {
        (Some(from), Some(to)) => {
            let days = (to - from).num_days();
            (days >= 1).then(|| days as f64 * car.daily_rate)
        }
        _ => None,
    };

    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let Some(client) = client.clone() else {
            return;
        };
        let Some(user) = session().user else {
            push_toast(&mut toasts, Severity::Warning, "Sign in to book a car.");
            return;
        };
        let (Some(from), Some(to)) = (parse_day(&start()), parse_day(&end())) else {
            push_toast(&mut toasts, Severity::Warning, "Pick both dates first.");
            return;
        };
        let days = (to - from).num_days();
        if days < 1 {
            push_toast(
                &mut toasts,
                Severity::Warning,
                "The return date must be after the pickup date.",
            );
            return;
        }

        let booking = NewBooking {
            car_id: car.id.clone(),
            customer_id: user.id,
            dealership_id: car.dealership_id.clone(),
            start_date: from,
            end_date: to,
            total_price: days as f64 * car.daily_rate,
        };

        submitting.set(true);
        spawn(async move {
            match client.create_booking(&booking).await {
                Ok(_) => {
                    push_toast(
                        &mut toasts,
                        Severity::Success,
                        "Booking requested — the dealership will confirm shortly.",
                    );
                    start.set(String::new());
                    end.set(String::new());
                }
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Booking failed: {err}"));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        form { class: "booking-form", onsubmit,
            h2 { "Book this car" }
            label {
                "Pickup"
                input {
                    r#type: "date",
                    value: "{start}",
                    oninput: move |e| start.set(e.value()),
                }
            }
            label {
                "Return"
                input {
                    r#type: "date",
                    value: "{end}",
                    oninput: move |e| end.set(e.value()),
                }
            }
            if let Some(total) = quote {
                p { class: "booking-form__quote", "Total: ${total:.2}" }
            }
            button { r#type: "submit", disabled: submitting(), "Request booking" }
        }
    }
}

#[component]
fn ReviewForm(
    car_id: String,
    dealership_id: String,
    on_submitted: EventHandler<()>,
) -> Element {
    let session = use_session();
    let client = use_client();
    let mut toasts = use_toasts();

    let mut rating = use_signal(|| 5u8);
    let mut comment = use_signal(String::new);

    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let Some(client) = client.clone() else {
            return;
        };
        let Some(user) = session().user else {
            return;
        };

        let text = comment().trim().to_string();
        let review = NewReview {
            car_id: car_id.clone(),
            dealership_id: dealership_id.clone(),
            author_id: user.id,
            rating: rating(),
            comment: (!text.is_empty()).then_some(text),
        };

        spawn(async move {
            match client.create_review(&review).await {
                Ok(_) => {
                    comment.set(String::new());
                    on_submitted.call(());
                }
                Err(err) => {
                    push_toast(
                        &mut toasts,
                        Severity::Error,
                        &format!("Could not post review: {err}"),
                    );
                }
            }
        });
    };

    rsx! {
        form { class: "review-form", onsubmit,
            h3 { "Leave a review" }
            select {
                value: "{rating}",
                onchange: move |e| {
                    if let Ok(value) = e.value().parse() {
                        rating.set(value);
                    }
                },
                for stars in (1..=5u8).rev() {
                    option { value: "{stars}", "{stars} ★" }
                }
            }
            textarea {
                placeholder: "How was the car?",
                value: "{comment}",
                oninput: move |e| comment.set(e.value()),
            }
            button { r#type: "submit", "Post review" }
        }
    }
}
