// src/models/question.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two kinds of question an exam can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    /// Exactly one correct option.
    Single,
    /// Two or more correct options, all of which must be selected.
    Multi,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Single => "SINGLE",
            QuestionKind::Multi => "MULTI",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINGLE" => Ok(QuestionKind::Single),
            "MULTI" => Ok(QuestionKind::Multi),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// A persisted answer option.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// A persisted question with its options, as held in an exam's pool.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub exam_id: i64,
    pub number: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Ids of the options flagged correct.
    pub fn correct_option_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.options.iter().filter(|o| o.is_correct).map(|o| o.id)
    }
}

/// Option as served to a taking user. Never carries correctness.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

/// Question as served to a taking user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicQuestion {
    pub id: i64,
    pub number: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<PublicOption>,
}

/// Candidate option submitted by an administrator.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionDraft {
    #[serde(default)]
    pub text: String,
    /// Absent flags are reported by the pool validator, not by the decoder.
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// Candidate question submitted by an administrator.
///
/// `question_type` stays a raw string here; the pool validator turns it into a
/// [`QuestionKind`] and reports unknown tags against the question number.
/// Missing fields decode to empty values so the validator can name the rule
/// they break.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionDraft {
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

/// A candidate question that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub number: i32,
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<NewOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOption {
    pub text: String,
    pub is_correct: bool,
}

/// Body of `POST /admin/exams/{id}/questions`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveQuestionsRequest {
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

/// Response of a successful pool replacement.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedPool {
    pub exam_id: i64,
    pub questions: Vec<Question>,
}
