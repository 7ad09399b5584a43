use chrono::Duration;
use storage::repository::{HistoryRepository, Storage};
use storage::sqlite::SqliteRepository;
use wonder_core::model::{ActivityType, QuizResult};
use wonder_core::time::fixed_now;

fn result(kind: ActivityType, label: &str, score: u32, total: u32, minutes: i64) -> QuizResult {
    QuizResult::new(kind, label, score, total, fixed_now() + Duration::minutes(minutes)).unwrap()
}

#[tokio::test]
async fn sqlite_history_is_most_recent_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history_order?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.record(&result(ActivityType::CategoryQuiz, "Science", 10, 10, 0))
        .await
        .unwrap();
    repo.record(&result(ActivityType::NatureLab, "Nature Lab", 0, 5, 5))
        .await
        .unwrap();

    let entries = repo.list().await.expect("list");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].activity_type(), Some(ActivityType::NatureLab));
    assert_eq!(entries[0].score, Some(0));
    assert_eq!(entries[0].total, Some(5));
    assert_eq!(
        entries[0].timestamp_utc(),
        Some(fixed_now() + Duration::minutes(5))
    );
    assert_eq!(entries[1].category_label.as_deref(), Some("Science"));
    assert_eq!(entries[1].to_result().unwrap().percent(), 100);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.record(&result(ActivityType::CategoryQuiz, "Math", 3, 10, 0))
        .await
        .unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn storage_sqlite_appends_without_touching_prior_rows() {
    let storage = Storage::sqlite("sqlite:file:memdb_history_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage
        .history
        .record(&result(ActivityType::CategoryQuiz, "History", 6, 10, 0))
        .await
        .unwrap();
    let before = storage.history.list().await.unwrap();

    storage
        .history
        .record(&result(ActivityType::CategoryQuiz, "Geography", 8, 10, 1))
        .await
        .unwrap();
    let after = storage.history.list().await.unwrap();

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after[0].category_label.as_deref(), Some("Geography"));
    assert_eq!(&after[1..], &before[..]);
}
