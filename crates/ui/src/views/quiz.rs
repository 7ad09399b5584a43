use dioxus::prelude::*;
use dioxus_router::Link;
use services::Topic;
use wonder_core::model::{Category, CategoryId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{FactsVm, QuizPhase, QuizVm};

#[component]
pub fn QuizView(category_id: u32) -> Element {
    let Some(category) = Category::find(CategoryId::new(category_id)) else {
        return rsx! {
            div { class: "page",
                h2 { "Quiz" }
                p { "Pick a category first." }
                Link { class: "btn", to: Route::Home {}, "Go to Categories" }
            }
        };
    };
    let topic = Topic::category(category);

    rsx! {
        div { class: "page",
            SessionPanel { key: "{category_id}", topic }
        }
    }
}

#[component]
pub fn NatureLabView() -> Element {
    rsx! {
        div { class: "page",
            SessionPanel { topic: Topic::NatureLab }
        }
    }
}

/// Owns one session runner for as long as it is mounted.
#[component]
fn SessionPanel(topic: Topic) -> Element {
    let ctx = use_context::<AppContext>();
    let mut vm = use_signal(|| QuizVm::new(&topic));
    let control = use_hook(|| {
        let (control, mut events) = ctx.start_session(topic.clone()).split();
        spawn(async move {
            while let Some(event) = events.next_event().await {
                vm.write().apply(event);
            }
        });
        control
    });
    use_drop({
        let control = control.clone();
        move || {
            let _ = control.cancel();
        }
    });

    let state = vm.read().clone();
    let options = state.options();

    rsx! {
        header { class: "quiz-header",
            h2 { "{state.title()}" }
            if let Some(progress) = state.progress_label() {
                span { class: "quiz-progress", "{progress}" }
            }
            if matches!(state.phase(), QuizPhase::Question | QuizPhase::Feedback) {
                span { class: "quiz-timer", "⏱ {state.remaining()}s" }
                span { class: "quiz-score", "Score: {state.score()}" }
            }
        }

        match state.phase() {
            QuizPhase::Loading => rsx! {
                p { class: "quiz-loading", "Loading questions…" }
            },
            QuizPhase::Empty => rsx! {
                p { class: "quiz-error", "{state.empty_message().unwrap_or_default()}" }
                Link { class: "btn", to: Route::Home {}, "Go to Categories" }
            },
            QuizPhase::Finished => rsx! {
                section { class: "quiz-summary",
                    h3 { "Great job! Here are your results:" }
                    p { "{state.summary_line().unwrap_or_default()}" }
                    p { class: "quiz-saved", "{state.saved_line().unwrap_or_default()}" }
                    Link { class: "btn", to: Route::Home {}, "Go to Categories" }
                    Link { class: "btn secondary", to: Route::Dashboard {}, "View Dashboard" }
                }
            },
            QuizPhase::Question | QuizPhase::Feedback => rsx! {
                if let Some(specimen) = state.specimen() {
                    img {
                        class: "specimen",
                        src: "{specimen.image_path}",
                        alt: "Mystery animal",
                    }
                }
                p { class: "quiz-question", "{state.prompt().unwrap_or_default()}" }
                div { class: "quiz-options",
                    for option in options {
                        button {
                            key: "{option.label}",
                            class: option.class(),
                            r#type: "button",
                            disabled: option.disabled,
                            onclick: {
                                let control = control.clone();
                                let label = option.label.clone();
                                move |_| {
                                    let _ = control.select(label.clone());
                                }
                            },
                            "{option.label}"
                        }
                    }
                }
                if let Some(notice) = state.notice() {
                    p { class: "quiz-notice", "{notice}" }
                }
                if let Some(feedback) = state.feedback() {
                    div { class: "quiz-feedback",
                        p { "{feedback}" }
                        if let Some(subject) = state.facts_subject() {
                            FactsPanel { key: "{subject}", name: subject.to_string() }
                            Link {
                                class: "wiki-link",
                                to: Route::Wiki { topic: subject.to_string() },
                                "Read more on Wikipedia"
                            }
                        }
                        button {
                            class: "btn",
                            r#type: "button",
                            onclick: {
                                let control = control.clone();
                                move |_| {
                                    let _ = control.advance();
                                }
                            },
                            "{state.next_label()}"
                        }
                    }
                }
            },
        }
    }
}

#[component]
fn FactsPanel(name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let facts = ctx.facts();
    let resource = use_resource(move || {
        let facts = facts.clone();
        let name = name.clone();
        async move { FactsVm::from(&facts.describe(&name).await) }
    });
    let content = resource.read().clone().unwrap_or_else(FactsVm::loading);

    rsx! {
        div { class: "fact-card",
            match content {
                FactsVm::Lines(lines) => rsx! {
                    ul {
                        for line in lines {
                            li { "{line}" }
                        }
                    }
                },
                FactsVm::Placeholder(text) => rsx! {
                    p { "{text}" }
                },
            }
        }
    }
}
