// src/engine/assemble.rs

use crate::models::{
    exam::{Exam, ServedExam},
    question::{PublicOption, PublicQuestion, Question},
};

use super::shuffle::seeded_shuffle;

/// Seed shared by every shuffle done for one user in one exam.
pub fn base_seed(user_key: &str, exam_id: i64) -> String {
    format!("{}|{}", user_key, exam_id)
}

/// Seed for the option order of a single question.
pub fn option_seed(base_seed: &str, question_id: i64) -> String {
    format!("{}|{}", base_seed, question_id)
}

/// Builds the exam as seen by `user_key`.
///
/// The pool is shuffled with the user's base seed and cut to `questions_in_exam`,
/// then every kept question gets its own option shuffle. Correctness flags do
/// not survive the conversion to [`PublicQuestion`].
///
/// Identical inputs give identical output, across processes, as long as `pool`
/// keeps the same contents and order.
pub fn assemble_for_user(exam: &Exam, pool: &[Question], user_key: &str) -> ServedExam {
    let seed = base_seed(user_key, exam.id);
    let take = usize::try_from(exam.questions_in_exam).unwrap_or(0);

    let questions = seeded_shuffle(pool, &seed)
        .into_iter()
        .take(take)
        .map(|q| serve_question(q, &seed))
        .collect();

    ServedExam {
        id: exam.id,
        name: exam.name.clone(),
        questions_in_exam: exam.questions_in_exam,
        passing_percentage: exam.passing_percentage,
        start_date: exam.start_date,
        questions,
    }
}

fn serve_question(question: Question, base_seed: &str) -> PublicQuestion {
    let options = seeded_shuffle(&question.options, &option_seed(base_seed, question.id))
        .into_iter()
        .map(|o| PublicOption { id: o.id, text: o.text })
        .collect();

    PublicQuestion {
        id: question.id,
        number: question.number,
        text: question.text,
        kind: question.kind,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{exam, pool};

    #[test]
    fn test_seeds_join_with_pipe() {
        let base = base_seed("u@x.com", 1);
        assert_eq!(base, "u@x.com|1");
        assert_eq!(option_seed(&base, 10), "u@x.com|1|10");
    }

    #[test]
    fn test_stable_across_calls() {
        let exam = exam(1, 3, 50);
        let pool = pool(1, 8);

        let first = assemble_for_user(&exam, &pool, "u@x.com");
        let second = assemble_for_user(&exam, &pool, "u@x.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_subset_size_and_membership() {
        let exam = exam(1, 3, 50);
        let pool = pool(1, 8);

        let served = assemble_for_user(&exam, &pool, "u@x.com");
        assert_eq!(served.questions.len(), 3);

        for q in &served.questions {
            let source = pool.iter().find(|p| p.id == q.id).expect("served unknown question");
            assert_eq!(q.options.len(), source.options.len());
            for o in &q.options {
                assert!(source.options.iter().any(|s| s.id == o.id && s.text == o.text));
            }
        }
    }

    #[test]
    fn test_order_follows_seeded_shuffle() {
        let exam = exam(1, 4, 50);
        let pool = pool(1, 10);

        let served = assemble_for_user(&exam, &pool, "u@x.com");
        let expected: Vec<i64> = seeded_shuffle(&pool, "u@x.com|1")
            .iter()
            .take(4)
            .map(|q| q.id)
            .collect();
        let got: Vec<i64> = served.questions.iter().map(|q| q.id).collect();
        assert_eq!(got, expected);

        let first = &served.questions[0];
        let source = pool.iter().find(|p| p.id == first.id).unwrap();
        let expected_opts: Vec<i64> = seeded_shuffle(&source.options, &format!("u@x.com|1|{}", first.id))
            .iter()
            .map(|o| o.id)
            .collect();
        let got_opts: Vec<i64> = first.options.iter().map(|o| o.id).collect();
        assert_eq!(got_opts, expected_opts);
    }

    #[test]
    fn test_users_get_different_papers() {
        let exam = exam(1, 5, 50);
        let pool = pool(1, 20);

        let users = ["a@x.com", "b@x.com", "c@x.com", "d@x.com"];
        let papers: Vec<Vec<i64>> = users
            .iter()
            .map(|u| {
                assemble_for_user(&exam, &pool, u)
                    .questions
                    .iter()
                    .map(|q| q.id)
                    .collect()
            })
            .collect();
        assert!(papers.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_small_pool_serves_everything() {
        let exam = exam(1, 5, 50);
        let pool = pool(1, 3);
        assert_eq!(assemble_for_user(&exam, &pool, "u@x.com").questions.len(), 3);
    }

    #[test]
    fn test_correctness_never_serialized() {
        let exam = exam(1, 3, 50);
        let pool = pool(1, 5);
        let json = serde_json::to_string(&assemble_for_user(&exam, &pool, "u@x.com")).unwrap();
        assert!(!json.contains("isCorrect"));
        assert!(!json.contains("is_correct"));
    }
}
