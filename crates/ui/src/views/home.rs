use dioxus::prelude::*;
use dioxus_router::Link;
use wonder_core::model::Category;

use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let mut query = use_signal(String::new);
    let matches = Category::search(&query.read());

    rsx! {
        div { class: "page",
            h2 { "Pick a category" }
            p { class: "lede", "Ten questions, thirty seconds each. Your results land on the dashboard." }
            input {
                class: "category-search",
                r#type: "search",
                placeholder: "Search subjects",
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }
            if matches.is_empty() {
                p { class: "muted", "No subjects match \"{query}\"." }
            }
            ul { class: "category-grid",
                for category in matches {
                    li { key: "{category.id}", class: "category-card",
                        Link { to: Route::Quiz { category_id: category.id.value() },
                            h3 { "{category.name}" }
                            p { "{category.description}" }
                        }
                    }
                }
                li { class: "category-card nature",
                    Link { to: Route::NatureLab {},
                        h3 { "Nature Lab" }
                        p { "Guess the animal from its photo." }
                    }
                }
            }
        }
    }
}
