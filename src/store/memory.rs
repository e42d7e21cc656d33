// src/store/memory.rs

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamPayload, ExamQuery, ExamSortField, SortOrder},
        question::{AnswerOption, NewQuestion, Question},
        user::User,
    },
};

use super::ExamStore;

#[derive(Default)]
struct Tables {
    exams: Vec<Exam>,
    /// Pool per exam id, kept in ascending question id order.
    pools: HashMap<i64, Vec<Question>>,
    users: HashMap<String, User>,
    next_exam_id: i64,
    next_question_id: i64,
    next_option_id: i64,
    next_user_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// [`ExamStore`] kept in process memory.
///
/// Every operation takes one lock for its whole duration, which makes
/// `replace_pool` atomic with respect to readers.
#[derive(Default)]
pub struct InMemoryExamStore {
    tables: Mutex<Tables>,
}

impl InMemoryExamStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::InternalServerError("exam store lock poisoned".to_string()))
    }
}

fn exam_matches(exam: &Exam, query: &ExamQuery) -> bool {
    let name_ok = query.name.as_ref().is_none_or(|needle| {
        exam.name.to_lowercase().contains(&needle.to_lowercase())
    });
    let gte_ok = query.start_gte.is_none_or(|t| exam.start_date >= t);
    let lte_ok = query.start_lte.is_none_or(|t| exam.start_date <= t);
    name_ok && gte_ok && lte_ok
}

fn compare(a: &Exam, b: &Exam, field: ExamSortField) -> Ordering {
    let primary = match field {
        ExamSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ExamSortField::Name => a.name.cmp(&b.name),
        ExamSortField::StartDate => a.start_date.cmp(&b.start_date),
        ExamSortField::TotalQuestions => a.total_questions.cmp(&b.total_questions),
        ExamSortField::QuestionsInExam => a.questions_in_exam.cmp(&b.questions_in_exam),
        ExamSortField::PassingPercentage => a.passing_percentage.cmp(&b.passing_percentage),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl ExamStore for InMemoryExamStore {
    async fn list_exams(&self, query: &ExamQuery) -> Result<(Vec<Exam>, i64), AppError> {
        let tables = self.lock()?;

        let mut hits: Vec<Exam> = tables
            .exams
            .iter()
            .filter(|e| exam_matches(e, query))
            .cloned()
            .collect();
        hits.sort_by(|a, b| match query.order {
            SortOrder::Asc => compare(a, b, query.sort_by),
            SortOrder::Desc => compare(b, a, query.sort_by),
        });

        let total = hits.len() as i64;
        let page = hits
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .collect();

        Ok((page, total))
    }

    async fn create_exam(&self, payload: &ExamPayload) -> Result<Exam, AppError> {
        let mut tables = self.lock()?;

        let exam = Exam {
            id: next_id(&mut tables.next_exam_id),
            name: payload.name.clone(),
            total_questions: payload.total_questions,
            questions_in_exam: payload.questions_in_exam,
            passing_percentage: payload.passing_percentage,
            start_date: payload.start_date,
            created_at: Utc::now(),
        };
        tables.exams.push(exam.clone());

        Ok(exam)
    }

    async fn update_exam(&self, id: i64, payload: &ExamPayload) -> Result<Option<Exam>, AppError> {
        let mut tables = self.lock()?;

        let Some(exam) = tables.exams.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        exam.name = payload.name.clone();
        exam.total_questions = payload.total_questions;
        exam.questions_in_exam = payload.questions_in_exam;
        exam.passing_percentage = payload.passing_percentage;
        exam.start_date = payload.start_date;

        Ok(Some(exam.clone()))
    }

    async fn find_exam(&self, id: i64) -> Result<Option<Exam>, AppError> {
        let tables = self.lock()?;
        Ok(tables.exams.iter().find(|e| e.id == id).cloned())
    }

    async fn load_pool(&self, exam_id: i64) -> Result<Vec<Question>, AppError> {
        let tables = self.lock()?;
        Ok(tables.pools.get(&exam_id).cloned().unwrap_or_default())
    }

    async fn replace_pool(
        &self,
        exam_id: i64,
        questions: Vec<NewQuestion>,
    ) -> Result<Vec<Question>, AppError> {
        let mut tables = self.lock()?;

        if !tables.exams.iter().any(|e| e.id == exam_id) {
            return Err(AppError::NotFound("Exam not found".to_string()));
        }

        let mut created = Vec::with_capacity(questions.len());
        for q in questions {
            let id = next_id(&mut tables.next_question_id);
            let options = q
                .options
                .into_iter()
                .map(|o| AnswerOption {
                    id: next_id(&mut tables.next_option_id),
                    text: o.text,
                    is_correct: o.is_correct,
                })
                .collect();

            created.push(Question {
                id,
                exam_id,
                number: q.number,
                text: q.text,
                kind: q.kind,
                options,
            });
        }

        tables.pools.insert(exam_id, created.clone());
        Ok(created)
    }

    async fn ensure_user(&self, email: &str) -> Result<User, AppError> {
        let mut tables = self.lock()?;

        if let Some(user) = tables.users.get(email) {
            return Ok(user.clone());
        }

        let user = User {
            id: next_id(&mut tables.next_user_id),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(email.to_string(), user.clone());
        tracing::debug!("Created user {}", email);

        Ok(user)
    }
}
