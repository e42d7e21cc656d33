// src/models/submission.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One answered question in a submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[serde(default)]
    pub selected_option_ids: Vec<i64>,
}

/// DTO for submitting an exam attempt.
///
/// `answers` is optional at the wire level so an absent list reaches the
/// scorer and is reported the same way as an empty one.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitExamRequest {
    #[serde(default)]
    pub answers: Option<Vec<SubmittedAnswer>>,
}

/// Outcome of comparing a score against the exam's passing threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Result of scoring one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamScore {
    pub correct_count: u32,
    pub score_percent: u32,
    pub verdict: Verdict,
}

/// Response of `POST /user/exams/{id}/submit`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// Human readable, e.g. "50 of 100".
    pub score: String,
    pub right_questions: u32,
    pub status: Verdict,
    #[serde(rename = "scorePercent")]
    pub score_percent: u32,
    #[serde(rename = "correctCount")]
    pub correct_count: u32,
}

impl From<ExamScore> for SubmissionResponse {
    fn from(score: ExamScore) -> Self {
        Self {
            score: format!("{} of 100", score.score_percent),
            right_questions: score.correct_count,
            status: score.verdict,
            score_percent: score.score_percent,
            correct_count: score.correct_count,
        }
    }
}
