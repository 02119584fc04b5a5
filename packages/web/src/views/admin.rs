use api::CarFilter;
use dioxus::prelude::*;
use store::{CacheKey, CarStatus, Severity, Table};
use ui::{push_toast, use_cache, use_client, use_data_version, use_toasts};

/// Moderation console: pending listings and dealership activation.
///
/// The access code is a front-end gate only; the backend's row-level
/// security is what actually authorizes the writes.
#[component]
pub fn Admin() -> Element {
    let client = use_client();
    let mut toasts = use_toasts();

    let mut unlocked = use_signal(|| false);
    let mut code = use_signal(String::new);

    if !unlocked() {
        let gate_client = client.clone();
        let onsubmit = move |event: FormEvent| {
            event.prevent_default();
            let expected = gate_client
                .as_ref()
                .and_then(|c| c.config().admin_access_code.clone());
            match expected {
                Some(expected) if expected == code() => unlocked.set(true),
                Some(_) => {
                    push_toast(&mut toasts, Severity::Error, "Wrong access code.");
                }
                None => {
                    push_toast(
                        &mut toasts,
                        Severity::Error,
                        "No admin access code is configured.",
                    );
                }
            }
        };

        return rsx! {
            form { class: "admin-gate", onsubmit,
                h1 { "Admin" }
                input {
                    r#type: "password",
                    placeholder: "Access code",
                    value: "{code}",
                    oninput: move |e| code.set(e.value()),
                }
                button { r#type: "submit", "Unlock" }
            }
        };
    }

    rsx! {
        section { class: "admin",
            h1 { "Moderation" }
            PendingCars {}
            DealershipList {}
        }
    }
}

#[component]
fn PendingCars() -> Element {
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();

    let write_client = client.clone();

    let mut pending = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let _ = version();
        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            let filter = CarFilter {
                status: Some(CarStatus::Pending),
                ..CarFilter::default()
            };
            let key = CacheKey::list(Table::Cars, filter.signature());
            super::load(cache, toasts, key, || async move {
                client.list_cars(&filter).await
            })
            .await
        }
    });

    let moderate = move |(id, status): (String, CarStatus)| {
        let Some(client) = write_client.clone() else {
            return;
        };
        spawn(async move {
            match client.set_car_status(&id, status).await {
                Ok(_) => pending.restart(),
                Err(err) => {
                    push_toast(
                        &mut toasts,
                        Severity::Error,
                        &format!("Moderation failed: {err}"),
                    );
                }
            }
        });
    };

    rsx! {
        section { class: "admin__pending",
            h2 { "Pending listings" }
            match pending() {
                Some(list) if list.is_empty() => rsx! {
                    p { "Queue is empty." }
                },
                Some(list) => rsx! {
                    ul { class: "moderation-queue",
                        for car in list {
                            li { key: "{car.id}",
                                span { "{car.title()} — {car.city}, ${car.daily_rate:.2}/day" }
                                button {
                                    onclick: {
                                        let mut moderate = moderate.clone();
                                        let id = car.id.clone();
                                        move |_| moderate((id.clone(), CarStatus::Approved))
                                    },
                                    "Approve"
                                }
                                button {
                                    class: "moderation-queue__reject",
                                    onclick: {
                                        let mut moderate = moderate.clone();
                                        let id = car.id.clone();
                                        move |_| moderate((id.clone(), CarStatus::Rejected))
                                    },
                                    "Reject"
                                }
                            }
                        }
                    }
                },
                None => rsx! {
                    p { "Loading…" }
                },
            }
        }
    }
}

#[component]
fn DealershipList() -> Element {
    let cache = use_cache();
    let client = use_client();
    let mut toasts = use_toasts();
    let version = use_data_version();

    let write_client = client.clone();

    let mut dealerships = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let _ = version();
        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            // All dealerships, active or not; the public views only
            // ever see the active ones.
            let query = api::Query::new(Table::Dealerships).order_desc("rating");
            let key = CacheKey::list(Table::Dealerships, query.signature());
            super::load(cache, toasts, key, || async move {
                client.select::<store::Dealership>(&query).await
            })
            .await
        }
    });

    let toggle = move |(id, active): (String, bool)| {
        let Some(client) = write_client.clone() else {
            return;
        };
        spawn(async move {
            match client.set_dealership_active(&id, active).await {
                Ok(_) => dealerships.restart(),
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Update failed: {err}"));
                }
            }
        });
    };

    rsx! {
        section { class: "admin__dealerships",
            h2 { "Dealerships" }
            if let Some(list) = dealerships() {
                ul {
                    for d in list {
                        li { key: "{d.id}",
                            strong { "{d.name}" }
                            span { " — {d.city} · ★ {d.rating:.1}" }
                            button {
                                onclick: {
                                    let mut toggle = toggle.clone();
                                    let id = d.id.clone();
                                    let next = !d.active;
                                    move |_| toggle((id.clone(), next))
                                },
                                if d.active { "Deactivate" } else { "Activate" }
                            }
                        }
                    }
                }
            }
        }
    }
}
