use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DashboardView, HomeView, NatureLabView, QuizView, WikiView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quiz/:category_id", QuizView)] Quiz { category_id: u32 },
        #[route("/nature-lab", NatureLabView)] NatureLab {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/wiki?:topic", WikiView)] Wiki { topic: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Wonder Learning" }
            ul {
                li { Link { to: Route::Home {}, "Categories" } }
                li { Link { to: Route::NatureLab {}, "Nature Lab" } }
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::Wiki { topic: String::new() }, "Explore" } }
            }
        }
    }
}
