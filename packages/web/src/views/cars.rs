use api::CarFilter;
use dioxus::prelude::*;
use store::{CacheKey, Table};
use ui::{use_cache, use_client, use_data_version, use_toasts, CarGrid};

use crate::Route;

pub(crate) const CATEGORIES: [&str; 6] = ["economy", "compact", "suv", "luxury", "van", "convertible"];

/// Browse approved, available listings with filters.
#[component]
pub fn Cars() -> Element {
    let cache = use_cache();
    let client = use_client();
    let toasts = use_toasts();
    let version = use_data_version();
    let nav = use_navigator();

    let mut category = use_signal(String::new);
    let mut city = use_signal(String::new);
    let mut min_rate = use_signal(String::new);
    let mut max_rate = use_signal(String::new);
    let mut search = use_signal(String::new);

    let cars = use_resource(move || {
        let client = client.clone();
        let cache = cache.clone();
        let _ = version();

        let mut filter = CarFilter::browsable();
        let category = category();
        if !category.is_empty() {
            filter.category = Some(category);
        }
        let city = city().trim().to_string();
        if !city.is_empty() {
            filter.city = Some(city);
        }
        filter.min_rate = min_rate().trim().parse().ok();
        filter.max_rate = max_rate().trim().parse().ok();
        let search = search().trim().to_string();
        if !search.is_empty() {
            filter.search = Some(search);
        }

        async move {
            let Some(client) = client else {
                return Vec::new();
            };
            let key = CacheKey::list(Table::Cars, filter.signature());
            super::load(cache, toasts, key, || async move {
                client.list_cars(&filter).await
            })
            .await
        }
    });

    rsx! {
        section { class: "browse",
            h1 { "Find a car" }
            div { class: "browse__filters",
                input {
                    class: "browse__search",
                    placeholder: "Search brand or model",
                    value: "{search}",
                    oninput: move |e| search.set(e.value()),
                }
                select {
                    value: "{category}",
                    onchange: move |e| category.set(e.value()),
                    option { value: "", "All categories" }
                    for c in CATEGORIES {
                        option { value: "{c}", "{c}" }
                    }
                }
                input {
                    placeholder: "City",
                    value: "{city}",
                    oninput: move |e| city.set(e.value()),
                }
                input {
                    r#type: "number",
                    placeholder: "Min $/day",
                    value: "{min_rate}",
                    oninput: move |e| min_rate.set(e.value()),
                }
                input {
                    r#type: "number",
                    placeholder: "Max $/day",
                    value: "{max_rate}",
                    oninput: move |e| max_rate.set(e.value()),
                }
            }
            match cars() {
                Some(cars) => rsx! {
                    CarGrid {
                        cars,
                        on_select: move |id: String| {
                            nav.push(Route::CarDetail { car_id: id });
                        },
                    }
                },
                None => rsx! {
                    p { class: "browse__loading", "Loading cars…" }
                },
            }
        }
    }
}
