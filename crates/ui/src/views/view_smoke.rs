use storage::repository::HistoryRepository;
use wonder_core::model::{ActivityType, QuizResult};
use wonder_core::time::fixed_now;

use super::test_harness::{ViewKind, sample_questions, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn home_view_lists_categories_and_nature_lab() {
    let mut harness = setup_view_harness(ViewKind::Home, Vec::new());
    harness.rebuild();
    let html = harness.render();
    for name in ["Science", "Math", "History", "Animals", "Geography", "General Knowledge"] {
        assert!(html.contains(name), "missing {name} in {html}");
    }
    assert!(html.contains("Nature Lab"), "missing nature lab card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_renders_stats() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, Vec::new());
    let math = QuizResult::new(ActivityType::CategoryQuiz, "Math", 7, 10, fixed_now()).unwrap();
    let nature = QuizResult::new(ActivityType::NatureLab, "Nature Lab", 5, 5, fixed_now()).unwrap();
    harness.storage.history.record(&math).await.expect("record");
    harness.storage.history.record(&nature).await.expect("record");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Average score"), "missing tiles in {html}");
    assert!(html.contains("85%"), "missing average in {html}");
    assert!(html.contains("7/10"), "missing history row in {html}");
    assert!(html.contains("2023-11-14 22:13"), "missing timestamp in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, Vec::new());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No sessions yet"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_presents_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz(19), sample_questions(3));
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Math"), "missing category title in {html}");
    assert!(html.contains("Question 1 of 3"), "missing progress in {html}");
    assert!(html.contains("Question 0?"), "missing prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_unknown_category() {
    let mut harness = setup_view_harness(ViewKind::Quiz(9999), Vec::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Pick a category first."), "missing fallback in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn nature_lab_with_no_rounds_shows_load_failure() {
    let mut harness = setup_view_harness(ViewKind::NatureLab, Vec::new());
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Failed to load questions"), "missing failure text in {html}");
}
