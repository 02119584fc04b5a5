use api::ProfilePatch;
use dioxus::prelude::*;
use store::{Severity, UserProfile};
use ui::{push_toast, sign_out, use_cache, use_client, use_notices, use_session, use_toasts};

use crate::Route;

/// View and edit the signed-in profile; sign out from here.
#[component]
pub fn Profile() -> Element {
    let session = use_session();

    match session().user {
        Some(user) => rsx! {
            ProfileForm { user }
        },
        None => rsx! {
            p { class: "page__signin-prompt",
                "Sign in to manage your profile. "
                Link { to: Route::Login {}, "Sign in" }
            }
        },
    }
}

#[component]
fn ProfileForm(user: UserProfile) -> Element {
    let session = use_session();
    let cache = use_cache();
    let notices = use_notices();
    let client = use_client();
    let mut toasts = use_toasts();
    let nav = use_navigator();

    let mut name = use_signal(|| user.name.clone().unwrap_or_default());
    let mut phone = use_signal(|| user.phone.clone().unwrap_or_default());
    let mut saving = use_signal(|| false);

    let user_id = user.id.clone();
    let onsubmit = move |event: FormEvent| {
        event.prevent_default();
        let Some(client) = client.clone() else {
            return;
        };
        let id = user_id.clone();
        let patch = ProfilePatch {
            name: Some(name().trim().to_string()).filter(|s| !s.is_empty()),
            phone: Some(phone().trim().to_string()).filter(|s| !s.is_empty()),
            ..ProfilePatch::default()
        };

        saving.set(true);
        spawn(async move {
            let mut session = session;
            match client.update_profile(&id, &patch).await {
                Ok(updated) => {
                    session.write().user = Some(updated);
                    push_toast(&mut toasts, Severity::Success, "Profile saved.");
                }
                Err(err) => {
                    push_toast(&mut toasts, Severity::Error, &format!("Save failed: {err}"));
                }
            }
            saving.set(false);
        });
    };

    let on_sign_out = move |_| {
        sign_out(session, &cache, notices);
        nav.push(Route::Home {});
    };

    rsx! {
        section { class: "profile",
            h1 { "Your profile" }
            p { class: "profile__email", "{user.email}" }
            p { class: "profile__role", "Account type: {user.role:?}" }
            form { class: "profile__form", onsubmit,
                label {
                    "Name"
                    input {
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                    }
                }
                label {
                    "Phone"
                    input {
                        value: "{phone}",
                        oninput: move |e| phone.set(e.value()),
                    }
                }
                button { r#type: "submit", disabled: saving(), "Save" }
            }
            button { class: "profile__signout", onclick: on_sign_out, "Sign out" }
        }
    }
}
