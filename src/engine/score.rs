// src/engine/score.rs

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::models::{
    exam::Exam,
    question::{Question, QuestionKind},
    submission::{ExamScore, SubmittedAnswer, Verdict},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("answers array is required")]
    NoAnswers,
}

/// Whether `selected` is a fully correct answer to `question`. No partial credit.
pub fn is_answer_correct(question: &Question, selected: &BTreeSet<i64>) -> bool {
    match question.kind {
        QuestionKind::Single => {
            selected.len() == 1
                && question.correct_option_ids().next() == selected.iter().next().copied()
        }
        QuestionKind::Multi => {
            let correct: BTreeSet<i64> = question.correct_option_ids().collect();
            &correct == selected
        }
    }
}

/// Scores a submission against the canonical pool.
///
/// * Answers naming a question outside `pool` are skipped.
/// * `correct_count` is every answer judged correct, repeats included.
/// * The denominator is always `exam.questions_in_exam`, so unanswered
///   questions count as wrong. The percentage never exceeds 100.
pub fn score_submission(
    exam: &Exam,
    pool: &[Question],
    answers: Option<&[SubmittedAnswer]>,
) -> Result<ExamScore, ScoreError> {
    let answers = match answers {
        Some(answers) if !answers.is_empty() => answers,
        _ => return Err(ScoreError::NoAnswers),
    };

    let by_id: HashMap<i64, &Question> = pool.iter().map(|q| (q.id, q)).collect();
    let mut correct_count: u32 = 0;

    for answer in answers {
        let Some(question) = by_id.get(&answer.question_id) else {
            continue;
        };
        let selected: BTreeSet<i64> = answer.selected_option_ids.iter().copied().collect();
        if is_answer_correct(question, &selected) {
            correct_count += 1;
        }
    }

    let denominator = u32::try_from(exam.questions_in_exam).unwrap_or(0);
    let score_percent = percentage(correct_count, denominator).min(100);
    let verdict = if i64::from(score_percent) >= i64::from(exam.passing_percentage) {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    Ok(ExamScore {
        correct_count,
        score_percent,
        verdict,
    })
}

/// `round(correct / total * 100)`, half rounding up; 0 when `total` is 0.
fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(correct) / f64::from(total)) * 100.0).round() as u32
}
