use dioxus::prelude::*;
use store::Severity;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub timestamp: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    pub entries: Vec<Toast>,
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

pub fn push_toast(log: &mut Signal<Toasts>, severity: Severity, message: &str) {
    let ts = current_time();
    log.write().entries.push(Toast {
        timestamp: ts,
        severity,
        message: message.to_string(),
    });
}

fn severity_class(severity: &Severity) -> &'static str {
    match severity {
        Severity::Info => "toast--info",
        Severity::Success => "toast--success",
        Severity::Warning => "toast--warning",
        Severity::Error => "toast--error",
    }
}

/// Stacked transient messages, newest at the bottom. Each toast carries
/// a dismiss button; nothing here is persisted.
#[component]
pub fn ToastList() -> Element {
    let mut toasts = use_toasts();
    let list = toasts();

    rsx! {
        div { class: "toast-list",
            for (index, toast) in list.entries.iter().enumerate() {
                div {
                    key: "{toast.timestamp}-{index}",
                    class: "toast {severity_class(&toast.severity)}",
                    span { class: "toast__time", "{toast.timestamp}" }
                    span { class: "toast__message", "{toast.message}" }
                    button {
                        class: "toast__dismiss",
                        onclick: move |_| {
                            toasts.write().entries.remove(index);
                        },
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
