// src/store/mod.rs

//! Storage collaborator for exams, question pools and users.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamPayload, ExamQuery},
        question::{NewQuestion, Question},
        user::User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryExamStore;
pub use postgres::PgExamStore;

/// Shared handle used in application state.
pub type DynExamStore = Arc<dyn ExamStore>;

/// Read/write access to exams and their question pools.
///
/// Implementations must make `replace_pool` all-or-nothing: readers see either
/// the old pool or the new one, never a mix. Concurrent replacements of the same
/// exam are last-write-wins.
#[async_trait]
pub trait ExamStore: Send + Sync {
    /// Returns one page of exams plus the total number matching the filters.
    async fn list_exams(&self, query: &ExamQuery) -> Result<(Vec<Exam>, i64), AppError>;

    async fn create_exam(&self, payload: &ExamPayload) -> Result<Exam, AppError>;

    /// `None` when no exam has this id.
    async fn update_exam(&self, id: i64, payload: &ExamPayload) -> Result<Option<Exam>, AppError>;

    async fn find_exam(&self, id: i64) -> Result<Option<Exam>, AppError>;

    /// The exam's pool: questions by ascending id, options by ascending id.
    async fn load_pool(&self, exam_id: i64) -> Result<Vec<Question>, AppError>;

    /// Drops the current pool and stores `questions` in its place, atomically.
    async fn replace_pool(
        &self,
        exam_id: i64,
        questions: Vec<NewQuestion>,
    ) -> Result<Vec<Question>, AppError>;

    /// Returns the user with this key, creating it on first sight.
    async fn ensure_user(&self, email: &str) -> Result<User, AppError>;
}
