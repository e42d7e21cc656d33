// src/engine/validate.rs

//! Write-time guard for question pools.
//!
//! A pool is only ever stored as a whole, and only after every rule below holds.
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. shape of each question and option
//! 2. unique question numbers
//! 3. correct-option count matching the question type
//! 4. pool strictly larger than the served subset
//! 5. pool size equal to the declared total, when one is declared

use std::collections::HashSet;

use thiserror::Error;

use crate::models::question::{NewOption, NewQuestion, QuestionDraft, QuestionKind};

pub const MIN_OPTIONS: usize = 2;

/// A broken pool rule, with the offending question number where one applies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolViolation {
    #[error("At least one question is required")]
    Empty,

    #[error("Question {number}: number must be a positive integer")]
    InvalidNumber { number: i32 },

    #[error("Question {number}: text must not be empty")]
    EmptyText { number: i32 },

    #[error("Question {number}: unknown question type '{found}', expected SINGLE or MULTI")]
    UnknownType { number: i32, found: String },

    #[error("Question {number}: at least {min} options are required, got {found}", min = MIN_OPTIONS)]
    TooFewOptions { number: i32, found: usize },

    #[error("Question {number}: option text must not be empty")]
    EmptyOptionText { number: i32 },

    #[error("Question {number}: every option needs an isCorrect flag")]
    MissingCorrectFlag { number: i32 },

    #[error("Question number must be unique within exam (duplicate {number})")]
    DuplicateNumber { number: i32 },

    #[error("Question {number}: SINGLE must have exactly one correct answer, got {found}")]
    SingleCorrectCount { number: i32, found: usize },

    #[error("Question {number}: MULTI must have more than one correct answer, got {found}")]
    MultiCorrectCount { number: i32, found: usize },

    #[error(
        "Total questions created should be greater than No of questions configured for exam ({pool_size} <= {questions_in_exam})"
    )]
    PoolTooSmall {
        pool_size: usize,
        questions_in_exam: i32,
    },

    #[error(
        "Total No of Questions must equal the number of questions created ({pool_size} != {declared})"
    )]
    TotalMismatch { pool_size: usize, declared: i32 },
}

impl PoolViolation {
    /// Stable machine-readable name of the broken rule.
    pub fn rule(&self) -> &'static str {
        match self {
            PoolViolation::Empty => "empty_pool",
            PoolViolation::InvalidNumber { .. } => "invalid_number",
            PoolViolation::EmptyText { .. } => "empty_text",
            PoolViolation::UnknownType { .. } => "unknown_type",
            PoolViolation::TooFewOptions { .. } => "too_few_options",
            PoolViolation::EmptyOptionText { .. } => "empty_option_text",
            PoolViolation::MissingCorrectFlag { .. } => "missing_is_correct",
            PoolViolation::DuplicateNumber { .. } => "duplicate_number",
            PoolViolation::SingleCorrectCount { .. } => "single_correct_count",
            PoolViolation::MultiCorrectCount { .. } => "multi_correct_count",
            PoolViolation::PoolTooSmall { .. } => "pool_too_small",
            PoolViolation::TotalMismatch { .. } => "total_mismatch",
        }
    }

    /// Number of the question that triggered the violation, for per-question rules.
    pub fn question_number(&self) -> Option<i32> {
        match self {
            PoolViolation::InvalidNumber { number }
            | PoolViolation::EmptyText { number }
            | PoolViolation::UnknownType { number, .. }
            | PoolViolation::TooFewOptions { number, .. }
            | PoolViolation::EmptyOptionText { number }
            | PoolViolation::MissingCorrectFlag { number }
            | PoolViolation::DuplicateNumber { number }
            | PoolViolation::SingleCorrectCount { number, .. }
            | PoolViolation::MultiCorrectCount { number, .. } => Some(*number),
            PoolViolation::Empty
            | PoolViolation::PoolTooSmall { .. }
            | PoolViolation::TotalMismatch { .. } => None,
        }
    }
}

/// Validates a candidate pool and returns it, typed, in the order given.
///
/// Pure: nothing is read or written. `declared_total` is the exam's
/// `total_questions` when the caller wants exact-size enforcement.
pub fn validate_pool(
    candidates: Vec<QuestionDraft>,
    questions_in_exam: i32,
    declared_total: Option<i32>,
) -> Result<Vec<NewQuestion>, PoolViolation> {
    if candidates.is_empty() {
        return Err(PoolViolation::Empty);
    }

    let questions = candidates
        .into_iter()
        .map(check_shape)
        .collect::<Result<Vec<_>, _>>()?;

    let mut numbers = HashSet::with_capacity(questions.len());
    for q in &questions {
        if !numbers.insert(q.number) {
            return Err(PoolViolation::DuplicateNumber { number: q.number });
        }
    }

    for q in &questions {
        check_correct_count(q)?;
    }

    let pool_size = questions.len();
    if i64::try_from(pool_size).unwrap_or(i64::MAX) <= i64::from(questions_in_exam) {
        return Err(PoolViolation::PoolTooSmall {
            pool_size,
            questions_in_exam,
        });
    }

    if let Some(declared) = declared_total {
        if i64::try_from(pool_size).ok() != Some(i64::from(declared)) {
            return Err(PoolViolation::TotalMismatch {
                pool_size,
                declared,
            });
        }
    }

    Ok(questions)
}

fn check_shape(draft: QuestionDraft) -> Result<NewQuestion, PoolViolation> {
    let number = draft.number;

    if number <= 0 {
        return Err(PoolViolation::InvalidNumber { number });
    }
    if draft.text.trim().is_empty() {
        return Err(PoolViolation::EmptyText { number });
    }

    let kind: QuestionKind = draft
        .question_type
        .parse()
        .map_err(|_| PoolViolation::UnknownType {
            number,
            found: draft.question_type.clone(),
        })?;

    if draft.options.len() < MIN_OPTIONS {
        return Err(PoolViolation::TooFewOptions {
            number,
            found: draft.options.len(),
        });
    }
    if draft.options.iter().any(|o| o.text.trim().is_empty()) {
        return Err(PoolViolation::EmptyOptionText { number });
    }

    let options = draft
        .options
        .into_iter()
        .map(|o| {
            o.is_correct
                .map(|is_correct| NewOption { text: o.text, is_correct })
                .ok_or(PoolViolation::MissingCorrectFlag { number })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewQuestion {
        number,
        text: draft.text,
        kind,
        options,
    })
}

fn check_correct_count(q: &NewQuestion) -> Result<(), PoolViolation> {
    let found = q.options.iter().filter(|o| o.is_correct).count();
    match q.kind {
        QuestionKind::Single if found != 1 => Err(PoolViolation::SingleCorrectCount {
            number: q.number,
            found,
        }),
        QuestionKind::Multi if found < 2 => Err(PoolViolation::MultiCorrectCount {
            number: q.number,
            found,
        }),
        QuestionKind::Single | QuestionKind::Multi => Ok(()),
    }
}
