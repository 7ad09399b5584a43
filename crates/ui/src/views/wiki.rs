use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::WikiVm;

#[component]
pub fn WikiView(topic: String) -> Element {
    let navigator = use_navigator();
    let mut query = use_signal(|| topic.clone());

    rsx! {
        div { class: "page",
            h2 { "Explore" }
            form {
                class: "wiki-search",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    let topic = query.read().trim().to_string();
                    navigator.push(Route::Wiki { topic });
                },
                input {
                    r#type: "search",
                    placeholder: "Search Wikipedia…",
                    value: "{query}",
                    oninput: move |evt| query.set(evt.value()),
                }
                button { class: "btn", r#type: "submit", "Search" }
            }
            if !topic.trim().is_empty() {
                WikiSummaryPanel { key: "{topic}", topic: topic.clone() }
            }
        }
    }
}

#[component]
fn WikiSummaryPanel(topic: String) -> Element {
    let ctx = use_context::<AppContext>();
    let wiki = ctx.wiki();

    let resource = use_resource(move || {
        let wiki = wiki.clone();
        let topic = topic.clone();
        async move {
            let summary = wiki.summary(&topic).await.map_err(|_| ViewError::Unknown)?;
            Ok::<WikiVm, ViewError>(WikiVm::from(&summary))
        }
    });

    match view_state_from_resource(&resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading..." }
        },
        ViewState::Ready(vm) => rsx! {
            article { class: "wiki-summary",
                h3 { "{vm.title}" }
                if let Some(image) = vm.image.as_ref() {
                    img { src: "{image}", alt: "{vm.title}" }
                }
                p { "{vm.extract}" }
                a { href: "{vm.url}", target: "_blank", rel: "noopener", "Open on Wikipedia" }
            }
        },
        ViewState::Error(_) => rsx! {
            p { "We couldn't find a summary for that topic." }
        },
    }
}
