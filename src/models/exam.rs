// src/models/exam.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{error::AppError, models::question::PublicQuestion};

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,

    pub name: String,

    /// Intended size of the full question pool.
    pub total_questions: i32,

    /// How many questions each user is served out of the pool.
    pub questions_in_exam: i32,

    /// Minimum score percentage (0..=100) for a PASS verdict.
    pub passing_percentage: i32,

    pub start_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// DTO for creating or updating an exam.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamPayload {
    #[validate(length(min = 1, max = 200, message = "Exam name must be between 1 and 200 characters."))]
    pub name: String,
    #[validate(range(min = 1, message = "No of Questions must be greater than 0"))]
    pub total_questions: i32,
    #[validate(range(min = 1, message = "No of Questions must be greater than 0"))]
    pub questions_in_exam: i32,
    #[validate(range(min = 0, max = 100, message = "Passing percentage must be between 0 and 100."))]
    pub passing_percentage: i32,
    pub start_date: DateTime<Utc>,
}

impl ExamPayload {
    /// Runs the field-level rules, then the rules that span fields.
    ///
    /// `now` is passed in so the future-date rule is testable.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Err(validation_errors) = self.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        if self.start_date <= now {
            return Err(AppError::BadRequest(
                "Exam Start Date must be a future date".to_string(),
            ));
        }

        if self.total_questions <= self.questions_in_exam {
            return Err(AppError::BadRequest(
                "Total No of Questions must be greater than No of questions in Exam".to_string(),
            ));
        }

        Ok(())
    }
}

/// Columns an exam listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExamSortField {
    #[default]
    CreatedAt,
    Name,
    StartDate,
    TotalQuestions,
    QuestionsInExam,
    PassingPercentage,
}

impl ExamSortField {
    pub fn column(&self) -> &'static str {
        match self {
            ExamSortField::CreatedAt => "created_at",
            ExamSortField::Name => "name",
            ExamSortField::StartDate => "start_date",
            ExamSortField::TotalQuestions => "total_questions",
            ExamSortField::QuestionsInExam => "questions_in_exam",
            ExamSortField::PassingPercentage => "passing_percentage",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for listing exams.
///
/// `page` and `limit` are kept as raw strings and normalized by
/// [`crate::utils::pagination::Pagination::from_params`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExamListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(default)]
    pub sort_by: ExamSortField,
    #[serde(default)]
    pub order: SortOrder,
    /// Case-insensitive substring of the exam name.
    pub name: Option<String>,
    pub start_gte: Option<DateTime<Utc>>,
    pub start_lte: Option<DateTime<Utc>>,
}

/// Filters, ordering and window handed to the store.
#[derive(Debug, Clone, Default)]
pub struct ExamQuery {
    pub name: Option<String>,
    pub start_gte: Option<DateTime<Utc>>,
    pub start_lte: Option<DateTime<Utc>>,
    pub sort_by: ExamSortField,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

/// Paginated listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExamPage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub items: Vec<Exam>,
}

/// What a user sees when opening an exam: metadata plus their own questions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServedExam {
    pub id: i64,
    pub name: String,
    pub questions_in_exam: i32,
    pub passing_percentage: i32,
    pub start_date: DateTime<Utc>,
    pub questions: Vec<PublicQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload() -> ExamPayload {
        ExamPayload {
            name: "Rust basics".to_string(),
            total_questions: 10,
            questions_in_exam: 5,
            passing_percentage: 60,
            start_date: Utc::now() + Duration::days(1),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(payload().check(Utc::now()).is_ok());
    }

    #[test]
    fn test_past_start_date_rejected() {
        let mut p = payload();
        p.start_date = Utc::now() - Duration::minutes(1);
        let err = p.check(Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("future")));
    }

    #[test]
    fn test_total_must_exceed_subset() {
        let mut p = payload();
        p.total_questions = 5;
        let err = p.check(Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("greater than")));
    }

    #[test]
    fn test_field_rules() {
        let mut p = payload();
        p.passing_percentage = 101;
        assert!(p.check(Utc::now()).is_err());

        let mut p = payload();
        p.name = String::new();
        assert!(p.check(Utc::now()).is_err());

        let mut p = payload();
        p.questions_in_exam = 0;
        assert!(p.check(Utc::now()).is_err());
    }

    #[test]
    fn test_sort_field_parses_camel_case() {
        let f: ExamSortField = serde_json::from_str("\"startDate\"").unwrap();
        assert_eq!(f.column(), "start_date");
        let o: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(o.keyword(), "ASC");
    }
}
