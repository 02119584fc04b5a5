use dioxus::prelude::*;

use ui::{ConnectionIndicator, LiveProvider, SessionProvider, ToastList};
use views::{Admin, Bell, Bookings, CarDetail, Cars, Dealer, Home, Login, Profile};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/cars")]
        Cars {},
        #[route("/cars/:car_id")]
        CarDetail { car_id: String },
        #[route("/bookings")]
        Bookings {},
        #[route("/dealer")]
        Dealer {},
        #[route("/admin")]
        Admin {},
        #[route("/login")]
        Login {},
        #[route("/profile")]
        Profile {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            LiveProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Top navigation plus the routed page body.
#[component]
fn Shell() -> Element {
    let session = ui::use_session();
    let state = session();

    rsx! {
        header { class: "navbar",
            Link { class: "navbar__brand", to: Route::Home {}, "DriveLane" }
            nav { class: "navbar__links",
                Link { to: Route::Cars {}, "Browse cars" }
                if state.user.is_some() {
                    Link { to: Route::Bookings {}, "My bookings" }
                }
                if state.user.as_ref().is_some_and(|u| u.role == store::Role::Dealer) {
                    Link { to: Route::Dealer {}, "Dealer" }
                }
                if state.user.as_ref().is_some_and(|u| u.role == store::Role::Admin) {
                    Link { to: Route::Admin {}, "Admin" }
                }
            }
            div { class: "navbar__session",
                ConnectionIndicator {}
                if let Some(user) = &state.user {
                    Bell {}
                    Link { class: "navbar__profile", to: Route::Profile {}, "{user.display_name()}" }
                } else {
                    Link { class: "navbar__login", to: Route::Login {}, "Sign in" }
                }
            }
        }
        main { class: "page",
            Outlet::<Route> {}
        }
        ToastList {}
    }
}
