use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{DashboardVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(move || {
        let history = history.clone();
        async move {
            let items = history.list_items().await.map_err(|_| ViewError::Storage)?;
            let stats = history.dashboard().await.map_err(|_| ViewError::Storage)?;
            Ok::<DashboardVm, ViewError>(map_dashboard(&stats, &items))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Dashboard" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.is_empty {
                        p { "No sessions yet. Finish a quiz to see your stats." }
                        Link { class: "btn", to: Route::Home {}, "Start a quiz" }
                    } else {
                        Dashboard { data }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn Dashboard(data: DashboardVm) -> Element {
    rsx! {
        section { class: "stat-tiles",
            for tile in data.tiles {
                div { key: "{tile.label}", class: "stat-tile",
                    span { class: "stat-label", "{tile.label}" }
                    strong { class: "stat-value", "{tile.value}" }
                }
            }
        }

        section { class: "breakdown",
            for group in data.breakdown {
                div { key: "{group.activity}", class: "breakdown-group",
                    h3 { "{group.activity}" }
                    for row in group.rows {
                        div { key: "{row.category}", class: "breakdown-row",
                            span { "{row.category}" }
                            span { "{row.score_str}" }
                            div { class: "bar",
                                div { class: "bar-fill", style: "width: {row.percent}%" }
                            }
                        }
                    }
                }
            }
        }

        table { class: "history",
            thead {
                tr {
                    th { "When" }
                    th { "Activity" }
                    th { "Category" }
                    th { "Score" }
                    th { "%" }
                }
            }
            tbody {
                for row in data.rows {
                    tr {
                        td { "{row.completed_at_str}" }
                        td { "{row.activity}" }
                        td { "{row.category}" }
                        td { "{row.score_str}" }
                        td { "{row.percent_str}" }
                    }
                }
            }
        }
    }
}
