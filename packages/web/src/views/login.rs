use dioxus::prelude::*;
use store::Severity;
use ui::{push_toast, sign_in, use_client, use_session, use_toasts};

use crate::Route;

/// Profile lookup by email.
///
/// There is no password flow here: accounts live in the hosted profile
/// table and the backend enforces what an anonymous key may read.
#[component]
pub fn Login() -> Element {
    let session = use_session();
    let client = use_client();
    let mut toasts = use_toasts();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut loading = use_signal(|| false);

    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let Some(client) = client.clone() else {
            push_toast(&mut toasts, Severity::Error, "Backend is not configured.");
            return;
        };
        let address = email().trim().to_lowercase();
        if address.is_empty() {
            return;
        }

        loading.set(true);
        spawn(async move {
            match client.get_profile_by_email(&address).await {
                Ok(Some(profile)) => {
                    let name = profile.display_name().to_string();
                    sign_in(session, profile);
                    push_toast(&mut toasts, Severity::Success, &format!("Welcome back, {name}!"));
                    nav.push(Route::Home {});
                }
                Ok(None) => {
                    push_toast(
                        &mut toasts,
                        Severity::Warning,
                        "No account found for that email.",
                    );
                }
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Sign-in failed: {err}"));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        form { class: "login", onsubmit,
            h1 { "Sign in" }
            input {
                r#type: "email",
                placeholder: "you@example.com",
                value: "{email}",
                oninput: move |e| email.set(e.value()),
            }
            button { r#type: "submit", disabled: loading(),
                if loading() { "Signing in…" } else { "Sign in" }
            }
        }
    }
}
