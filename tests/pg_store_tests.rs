// tests/pg_store_tests.rs
//
// Run against a scratch database:
//   DATABASE_URL=postgres://... cargo test --test pg_store_tests -- --ignored

use chrono::{Duration, Utc};
use exam_service::{
    models::{
        exam::{ExamPayload, ExamQuery},
        question::{NewOption, NewQuestion, QuestionKind},
    },
    store::{ExamStore, PgExamStore},
};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> PgExamStore {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for pg tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to Postgres");
    let store = PgExamStore::new(pool);
    store.migrate().await.expect("Failed to migrate");
    store
}

fn payload(name: &str) -> ExamPayload {
    ExamPayload {
        name: name.to_string(),
        total_questions: 3,
        questions_in_exam: 2,
        passing_percentage: 60,
        start_date: Utc::now() + Duration::days(3),
    }
}

fn question(number: i32) -> NewQuestion {
    NewQuestion {
        number,
        text: format!("Question {}", number),
        kind: QuestionKind::Single,
        options: vec![
            NewOption { text: "yes".to_string(), is_correct: true },
            NewOption { text: "no".to_string(), is_correct: false },
        ],
    }
}

fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn pg_replace_pool_replaces_everything() {
    let store = connect().await;
    let exam = store.create_exam(&payload(&unique("pool"))).await.unwrap();

    let first = store
        .replace_pool(exam.id, vec![question(1), question(2), question(3)])
        .await
        .unwrap();
    let second = store
        .replace_pool(exam.id, vec![question(4), question(5), question(6)])
        .await
        .unwrap();

    let loaded = store.load_pool(exam.id).await.unwrap();
    assert_eq!(loaded, second);
    assert!(loaded.iter().all(|q| first.iter().all(|f| f.id != q.id)));
    assert!(loaded.iter().all(|q| q.options.len() == 2));
}

#[tokio::test]
#[ignore]
async fn pg_list_filters_by_name() {
    let store = connect().await;
    let tag = uuid::Uuid::new_v4().to_string();
    store.create_exam(&payload(&format!("alpha {}", tag))).await.unwrap();
    store.create_exam(&payload(&format!("beta {}", tag))).await.unwrap();

    let query = ExamQuery {
        name: Some(tag.clone()),
        limit: 10,
        ..Default::default()
    };
    let (items, total) = store.list_exams(&query).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
}

#[tokio::test]
#[ignore]
async fn pg_ensure_user_is_idempotent() {
    let store = connect().await;
    let email = format!("{}@example.com", uuid::Uuid::new_v4());

    let a = store.ensure_user(&email).await.unwrap();
    let b = store.ensure_user(&email).await.unwrap();
    assert_eq!(a.id, b.id);
}
