use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    Clock, FactsService, HistoryService, QuestionSource, QuizLoopService, SessionHandle,
    StaticQuestionSource, Topic, WikiService, spawn_session,
};
use storage::repository::Storage;
use wonder_core::SiteBase;
use wonder_core::model::Question;
use wonder_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::{DashboardView, HomeView, NatureLabView, QuizView};

#[derive(Clone)]
struct TestApp {
    history: Arc<HistoryService>,
    quiz_loop: Arc<QuizLoopService>,
    source: Arc<dyn QuestionSource>,
}

impl UiApp for TestApp {
    fn site_base(&self) -> SiteBase {
        SiteBase::default()
    }

    fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    fn facts(&self) -> Arc<FactsService> {
        Arc::new(FactsService::disabled())
    }

    fn wiki(&self) -> Arc<WikiService> {
        Arc::new(WikiService::default())
    }

    fn start_session(&self, topic: Topic) -> SessionHandle {
        spawn_session(Arc::clone(&self.quiz_loop), Arc::clone(&self.source), topic)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Dashboard,
    Quiz(u32),
    NatureLab,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Quiz(category_id) => rsx! { QuizView { category_id } },
        ViewKind::NatureLab => rsx! { NatureLabView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(format!("Question {i}?"), "Yes", vec!["Yes".into(), "No".into()])
                .expect("valid question")
        })
        .collect()
}

pub fn setup_view_harness(view: ViewKind, questions: Vec<Question>) -> ViewHarness {
    let storage = Storage::in_memory();
    let clock = Clock::fixed(fixed_now());
    let app = Arc::new(TestApp {
        history: Arc::new(HistoryService::new(Arc::clone(&storage.history))),
        quiz_loop: Arc::new(QuizLoopService::new(clock, Arc::clone(&storage.history))),
        source: Arc::new(StaticQuestionSource::new(questions)),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, storage }
}
