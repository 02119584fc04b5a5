use api::CarFilter;
use dioxus::prelude::*;
use store::{CacheKey, Table};
use ui::{use_cache, use_client, use_data_version, use_toasts, CarGrid};

use crate::Route;

/// Landing page: a handful of listings plus the best-rated dealerships.
#[component]
pub fn Home() -> Element {
    let cache = use_cache();
    let client = use_client();
    let toasts = use_toasts();
    let version = use_data_version();
    let nav = use_navigator();

    let featured_client = client.clone();
    let featured_cache = cache.clone();
    let featured = use_resource(move || {
        let client = featured_client.clone();
        let cache = featured_cache.clone();
        let _ = version();
        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            let filter = CarFilter::browsable();
            let key = CacheKey::list(Table::Cars, filter.signature());
            let mut cars = super::load(cache, toasts, key, || async move {
                client.list_cars(&filter).await
            })
            .await;
            cars.truncate(6);
            cars
        }
    });

    let dealerships = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let _ = version();
        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            let key = CacheKey::list(Table::Dealerships, "active");
            super::load(cache, toasts, key, || async move {
                client.list_dealerships().await
            })
            .await
        }
    });

    rsx! {
        section { class: "hero",
            h1 { "Rent the right car, right now" }
            p { "Browse listings from local dealerships and book in minutes." }
            Link { class: "hero__cta", to: Route::Cars {}, "Browse cars" }
        }
        section { class: "featured",
            h2 { "Fresh listings" }
            match featured() {
                Some(cars) => rsx! {
                    CarGrid {
                        cars,
                        on_select: move |id: String| {
                            nav.push(Route::CarDetail { car_id: id });
                        },
                    }
                },
                None => rsx! {
                    p { "Loading…" }
                },
            }
        }
        section { class: "dealerships",
            h2 { "Top dealerships" }
            if let Some(list) = dealerships() {
                ul { class: "dealership-list",
                    for d in list {
                        li { key: "{d.id}",
                            strong { "{d.name}" }
                            span { " — {d.city}" }
                            span { class: "dealership-list__rating", " ★ {d.rating:.1}" }
                        }
                    }
                }
            }
        }
    }
}
