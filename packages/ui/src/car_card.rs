use dioxus::prelude::*;
use store::{Car, CarStatus};

use crate::icons::{FaCar, FaLocationDot};
use crate::Icon;

/// One listing in the browse grid.
#[component]
pub fn CarCard(car: Car, on_select: EventHandler<String>) -> Element {
    let id = car.id.clone();

    rsx! {
        article {
            class: if car.available { "car-card" } else { "car-card car-card--unavailable" },
            onclick: move |_| on_select.call(id.clone()),
            if let Some(url) = car.cover_image() {
                img { class: "car-card__image", src: "{url}", alt: "{car.title()}" }
            } else {
                div { class: "car-card__image car-card__image--placeholder",
                    Icon { icon: FaCar, width: 32, height: 32 }
                }
            }
            div { class: "car-card__body",
                h3 { "{car.title()}" }
                p { class: "car-card__meta",
                    Icon { icon: FaLocationDot, width: 12, height: 12 }
                    " {car.city} · {car.category}"
                }
                p { class: "car-card__rate", "${car.daily_rate:.2} / day" }
                if !car.available {
                    span { class: "car-card__flag", "Currently rented" }
                }
            }
        }
    }
}

/// Owner-facing variant that also shows moderation status.
#[component]
pub fn OwnerCarCard(car: Car, on_select: EventHandler<String>) -> Element {
    let status = match car.status {
        CarStatus::Pending => ("car-card__status--pending", "Awaiting approval"),
        CarStatus::Approved => ("car-card__status--approved", "Approved"),
        CarStatus::Rejected => ("car-card__status--rejected", "Rejected"),
    };

    rsx! {
        div { class: "owner-car-card",
            CarCard { car: car.clone(), on_select }
            span { class: "car-card__status {status.0}", "{status.1}" }
        }
    }
}

/// Grid of listings; emits the selected car id.
#[component]
pub fn CarGrid(cars: Vec<Car>, on_select: EventHandler<String>) -> Element {
    if cars.is_empty() {
        return rsx! {
            p { class: "car-grid__empty", "No cars match the current filters." }
        };
    }

    rsx! {
        div { class: "car-grid",
            for car in cars {
                CarCard { key: "{car.id}", car: car.clone(), on_select }
            }
        }
    }
}
