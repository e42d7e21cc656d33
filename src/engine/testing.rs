// src/engine/testing.rs

//! Fixtures for engine unit tests.
//!
//! Option ids are derived from the question id: question 3 has options 31, 32, ...
//! Correct options always come first.

use chrono::{TimeZone, Utc};

use crate::models::{
    exam::Exam,
    question::{AnswerOption, Question, QuestionKind},
};

pub fn exam(id: i64, questions_in_exam: i32, passing_percentage: i32) -> Exam {
    Exam {
        id,
        name: format!("Exam {}", id),
        total_questions: questions_in_exam + 1,
        questions_in_exam,
        passing_percentage,
        start_date: Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
    }
}

fn question(id: i64, exam_id: i64, number: i32, kind: QuestionKind, flags: &[bool]) -> Question {
    Question {
        id,
        exam_id,
        number,
        text: format!("Question {}", number),
        kind,
        options: flags
            .iter()
            .enumerate()
            .map(|(i, &is_correct)| AnswerOption {
                id: id * 10 + i as i64 + 1,
                text: format!("Option {}.{}", number, i + 1),
                is_correct,
            })
            .collect(),
    }
}

/// Three options, the first correct.
pub fn single_question(id: i64, exam_id: i64, number: i32) -> Question {
    question(id, exam_id, number, QuestionKind::Single, &[true, false, false])
}

/// Four options, the first two correct.
pub fn multi_question(id: i64, exam_id: i64, number: i32) -> Question {
    question(id, exam_id, number, QuestionKind::Multi, &[true, true, false, false])
}

/// `size` questions with ids and numbers 1..=size, alternating SINGLE and MULTI.
pub fn pool(exam_id: i64, size: i64) -> Vec<Question> {
    (1..=size)
        .map(|id| {
            if id % 2 == 0 {
                multi_question(id, exam_id, id as i32)
            } else {
                single_question(id, exam_id, id as i32)
            }
        })
        .collect()
}
