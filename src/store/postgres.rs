// src/store/postgres.rs

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, migrate::Migrator};

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamPayload, ExamQuery},
        question::{AnswerOption, NewQuestion, Question, QuestionKind},
        user::User,
    },
};

use super::ExamStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const EXAM_COLUMNS: &str =
    "id, name, total_questions, questions_in_exam, passing_percentage, start_date, created_at";

/// Helper struct for reading a pool in one statement: one row per option,
/// or one row with empty option columns for a question without options.
#[derive(Debug, sqlx::FromRow)]
struct PoolRow {
    question_id: i64,
    exam_id: i64,
    number: i32,
    question_text: String,
    question_type: String,
    option_id: Option<i64>,
    option_text: Option<String>,
    is_correct: Option<bool>,
}

/// Postgres-backed [`ExamStore`].
#[derive(Clone)]
pub struct PgExamStore {
    pool: PgPool,
}

impl PgExamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }
}

/// Escapes LIKE wildcards so the name filter is a plain substring match.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ExamQuery) {
    builder.push(" WHERE TRUE");

    if let Some(name) = &query.name {
        builder.push(" AND name ILIKE ");
        builder.push_bind(like_pattern(name));
    }

    if let Some(start_gte) = query.start_gte {
        builder.push(" AND start_date >= ");
        builder.push_bind(start_gte);
    }

    if let Some(start_lte) = query.start_lte {
        builder.push(" AND start_date <= ");
        builder.push_bind(start_lte);
    }
}

/// Groups joined rows back into questions. Rows must arrive ordered by
/// question id, then option id.
fn group_pool(rows: Vec<PoolRow>) -> Result<Vec<Question>, AppError> {
    let mut questions: Vec<Question> = Vec::new();

    for row in rows {
        let starts_new = questions.last().is_none_or(|q| q.id != row.question_id);
        if starts_new {
            let kind = QuestionKind::from_str(&row.question_type).map_err(|e| {
                tracing::error!("Corrupt question {}: {}", row.question_id, e);
                AppError::InternalServerError(e)
            })?;
            questions.push(Question {
                id: row.question_id,
                exam_id: row.exam_id,
                number: row.number,
                text: row.question_text,
                kind,
                options: Vec::new(),
            });
        }

        if let (Some(id), Some(text), Some(is_correct), Some(question)) =
            (row.option_id, row.option_text, row.is_correct, questions.last_mut())
        {
            question.options.push(AnswerOption {
                id,
                text,
                is_correct,
            });
        }
    }

    Ok(questions)
}

#[async_trait]
impl ExamStore for PgExamStore {
    async fn list_exams(&self, query: &ExamQuery) -> Result<(Vec<Exam>, i64), AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM exams");
        push_filters(&mut count_query, query);

        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count exams: {:?}", e);
                AppError::from(e)
            })?;

        let mut list_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM exams", EXAM_COLUMNS));
        push_filters(&mut list_query, query);

        // Sort column and direction come from closed enums, never from raw input.
        let direction = query.order.keyword();
        list_query.push(format!(
            " ORDER BY {} {}, id {}",
            query.sort_by.column(),
            direction,
            direction
        ));
        list_query.push(" LIMIT ");
        list_query.push_bind(query.limit);
        list_query.push(" OFFSET ");
        list_query.push_bind(query.offset);

        let exams = list_query
            .build_query_as::<Exam>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list exams: {:?}", e);
                AppError::from(e)
            })?;

        Ok((exams, total))
    }

    async fn create_exam(&self, payload: &ExamPayload) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            r#"
            INSERT INTO exams (name, total_questions, questions_in_exam, passing_percentage, start_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EXAM_COLUMNS
        ))
        .bind(&payload.name)
        .bind(payload.total_questions)
        .bind(payload.questions_in_exam)
        .bind(payload.passing_percentage)
        .bind(payload.start_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create exam: {:?}", e);
            AppError::from(e)
        })?;

        Ok(exam)
    }

    async fn update_exam(&self, id: i64, payload: &ExamPayload) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            r#"
            UPDATE exams SET
                name = $1,
                total_questions = $2,
                questions_in_exam = $3,
                passing_percentage = $4,
                start_date = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            EXAM_COLUMNS
        ))
        .bind(&payload.name)
        .bind(payload.total_questions)
        .bind(payload.questions_in_exam)
        .bind(payload.passing_percentage)
        .bind(payload.start_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update exam {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(exam)
    }

    async fn find_exam(&self, id: i64) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            "SELECT {} FROM exams WHERE id = $1",
            EXAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exam)
    }

    async fn load_pool(&self, exam_id: i64) -> Result<Vec<Question>, AppError> {
        // Single statement, so a concurrent replacement is seen entirely or not at all.
        let rows = sqlx::query_as::<_, PoolRow>(
            r#"
            SELECT
                q.id AS question_id,
                q.exam_id,
                q.number,
                q.text AS question_text,
                q.type AS question_type,
                o.id AS option_id,
                o.text AS option_text,
                o.is_correct
            FROM questions q
            LEFT JOIN options o ON o.question_id = q.id
            WHERE q.exam_id = $1
            ORDER BY q.id, o.id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load pool for exam {}: {:?}", exam_id, e);
            AppError::from(e)
        })?;

        group_pool(rows)
    }

    async fn replace_pool(
        &self,
        exam_id: i64,
        questions: Vec<NewQuestion>,
    ) -> Result<Vec<Question>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes replacements of the same exam.
        sqlx::query("SELECT id FROM exams WHERE id = $1 FOR UPDATE")
            .bind(exam_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Exam not found".to_string()))?;

        // Options go with their questions (ON DELETE CASCADE).
        sqlx::query("DELETE FROM questions WHERE exam_id = $1")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(questions.len());
        for q in questions {
            let question_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO questions (exam_id, number, text, type)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(exam_id)
            .bind(q.number)
            .bind(&q.text)
            .bind(q.kind.as_str())
            .fetch_one(&mut *tx)
            .await?;

            let mut options = Vec::with_capacity(q.options.len());
            for o in q.options {
                let option_id: i64 = sqlx::query_scalar(
                    "INSERT INTO options (question_id, text, is_correct) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(question_id)
                .bind(&o.text)
                .bind(o.is_correct)
                .fetch_one(&mut *tx)
                .await?;

                options.push(AnswerOption {
                    id: option_id,
                    text: o.text,
                    is_correct: o.is_correct,
                });
            }

            created.push(Question {
                id: question_id,
                exam_id,
                number: q.number,
                text: q.text,
                kind: q.kind,
                options,
            });
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit pool for exam {}: {:?}", exam_id, e);
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn ensure_user(&self, email: &str) -> Result<User, AppError> {
        let inserted = sqlx::query("INSERT INTO users (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
            .bind(email)
            .execute(&self.pool)
            .await?;

        if inserted.rows_affected() > 0 {
            tracing::debug!("Created user {}", email);
        }

        let user = sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(question_id: i64, option: Option<(i64, bool)>) -> PoolRow {
        PoolRow {
            question_id,
            exam_id: 1,
            number: question_id as i32,
            question_text: format!("Q{}", question_id),
            question_type: "SINGLE".to_string(),
            option_id: option.map(|(id, _)| id),
            option_text: option.map(|(id, _)| format!("O{}", id)),
            is_correct: option.map(|(_, c)| c),
        }
    }

    #[test]
    fn test_group_pool_keeps_order() {
        let rows = vec![
            row(1, Some((10, true))),
            row(1, Some((11, false))),
            row(2, None),
            row(3, Some((30, true))),
        ];
        let pool = group_pool(rows).unwrap();

        assert_eq!(pool.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pool[0].options.iter().map(|o| o.id).collect::<Vec<_>>(), vec![10, 11]);
        assert!(pool[1].options.is_empty());
        assert!(pool[2].options[0].is_correct);
    }

    #[test]
    fn test_group_pool_rejects_unknown_type() {
        let mut bad = row(1, None);
        bad.question_type = "ESSAY".to_string();
        assert!(matches!(
            group_pool(vec![bad]),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_\\"), "%100\\%\\_\\\\%");
    }
}
