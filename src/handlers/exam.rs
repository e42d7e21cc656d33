// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};

use crate::{
    engine::{ScoreError, assemble_for_user, score_submission},
    error::AppError,
    handlers::admin::check_exam_id,
    models::{
        exam::{Exam, ServedExam},
        question::Question,
        submission::{SubmissionResponse, SubmitExamRequest},
    },
    store::DynExamStore,
    utils::user_key::UserKey,
};

/// Loads an exam and its pool on behalf of `user`, creating the user on first sight.
async fn load_exam_for(
    store: &DynExamStore,
    user: &UserKey,
    id: i64,
) -> Result<(Exam, Vec<Question>), AppError> {
    let id = check_exam_id(id)?;
    store.ensure_user(user.as_str()).await?;

    let exam = store
        .find_exam(id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;
    let pool = store.load_pool(id).await?;

    Ok((exam, pool))
}

/// Returns the user's personal paper for an exam.
///
/// Question subset, question order and option order are derived from the
/// user key and exam id, so reloading shows the same paper.
#[utoipa::path(
    get,
    path = "/user/exams/{id}",
    params(
        ("id" = i64, Path, description = "Exam id"),
        ("x-user-email" = String, Header, description = "User key")
    ),
    responses(
        (status = 200, description = "The user's paper", body = ServedExam),
        (status = 400, description = "Missing user header or invalid id"),
        (status = 404, description = "Exam not found")
    ),
    tag = "user"
)]
pub async fn get_exam_for_user(
    State(store): State<DynExamStore>,
    Extension(user): Extension<UserKey>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (exam, pool) = load_exam_for(&store, &user, id).await?;

    let served = assemble_for_user(&exam, &pool, user.as_str());
    tracing::debug!(
        "Served {} of {} questions of exam {} to {}",
        served.questions.len(),
        pool.len(),
        exam.id,
        user.as_str()
    );

    Ok(Json(served))
}

/// Scores a submitted attempt against the stored pool.
#[utoipa::path(
    post,
    path = "/user/exams/{id}/submit",
    params(
        ("id" = i64, Path, description = "Exam id"),
        ("x-user-email" = String, Header, description = "User key")
    ),
    request_body = SubmitExamRequest,
    responses(
        (status = 200, description = "Score and verdict", body = SubmissionResponse),
        (status = 400, description = "Missing answers, missing user header or invalid id"),
        (status = 404, description = "Exam not found")
    ),
    tag = "user"
)]
pub async fn submit_exam(
    State(store): State<DynExamStore>,
    Extension(user): Extension<UserKey>,
    Path(id): Path<i64>,
    req: Result<Json<SubmitExamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let (exam, pool) = load_exam_for(&store, &user, id).await?;

    // A missing body or an `answers` value that is not a list of answers
    // counts as no answers at all.
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!("Unreadable submission for exam {}: {}", exam.id, rejection.body_text());
            return Err(ScoreError::NoAnswers.into());
        }
    };

    let score = score_submission(&exam, &pool, req.answers.as_deref())?;
    tracing::info!(
        "Exam {} submitted by {}: {} correct, {}%, {:?}",
        exam.id,
        user.as_str(),
        score.correct_count,
        score.score_percent,
        score.verdict
    );

    Ok(Json(SubmissionResponse::from(score)))
}
