// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    engine::validate_pool,
    error::AppError,
    models::{
        exam::{Exam, ExamListParams, ExamPage, ExamPayload, ExamQuery},
        question::{SaveQuestionsRequest, SavedPool},
    },
    store::DynExamStore,
    utils::pagination::Pagination,
};

/// Rejects ids that cannot name a stored exam.
pub fn check_exam_id(id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest("Invalid exam id".to_string()));
    }
    Ok(id)
}

/// Lists exams with filtering, sorting and pagination.
#[utoipa::path(
    get,
    path = "/admin/exams",
    params(ExamListParams),
    responses((status = 200, description = "One page of exams", body = ExamPage)),
    tag = "admin"
)]
pub async fn list_exams(
    State(store): State<DynExamStore>,
    Query(params): Query<ExamListParams>,
) -> Result<impl IntoResponse, AppError> {
    let window = Pagination::from_params(params.page.as_deref(), params.limit.as_deref());

    let query = ExamQuery {
        name: params.name.filter(|n| !n.is_empty()),
        start_gte: params.start_gte,
        start_lte: params.start_lte,
        sort_by: params.sort_by,
        order: params.order,
        limit: window.limit,
        offset: window.offset,
    };

    let (items, total) = store.list_exams(&query).await?;

    Ok(Json(ExamPage {
        page: window.page,
        limit: window.limit,
        total,
        items,
    }))
}

/// Creates a new exam.
#[utoipa::path(
    post,
    path = "/admin/exams",
    request_body = ExamPayload,
    responses(
        (status = 201, description = "Exam created", body = Exam),
        (status = 400, description = "Invalid exam payload")
    ),
    tag = "admin"
)]
pub async fn create_exam(
    State(store): State<DynExamStore>,
    payload: Result<Json<ExamPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.check(Utc::now())?;

    let exam = store.create_exam(&payload).await?;
    tracing::info!("Created exam {} ({})", exam.id, exam.name);

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Replaces an exam's settings.
///
/// The stored pool is not re-checked against the new counts; the next pool
/// replacement is validated against them.
#[utoipa::path(
    put,
    path = "/admin/exams/{id}",
    params(("id" = i64, Path, description = "Exam id")),
    request_body = ExamPayload,
    responses(
        (status = 200, description = "Exam updated", body = Exam),
        (status = 400, description = "Invalid exam payload"),
        (status = 404, description = "Exam not found")
    ),
    tag = "admin"
)]
pub async fn update_exam(
    State(store): State<DynExamStore>,
    Path(id): Path<i64>,
    payload: Result<Json<ExamPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = check_exam_id(id)?;
    let Json(payload) = payload?;
    payload.check(Utc::now())?;

    let exam = store
        .update_exam(id, &payload)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(exam))
}

/// Replaces the exam's whole question pool.
///
/// The candidate pool is validated against the exam's counts first; on any
/// violation nothing is written.
#[utoipa::path(
    post,
    path = "/admin/exams/{id}/questions",
    params(("id" = i64, Path, description = "Exam id")),
    request_body = SaveQuestionsRequest,
    responses(
        (status = 201, description = "Pool replaced", body = SavedPool),
        (status = 400, description = "Pool violates a rule"),
        (status = 404, description = "Exam not found")
    ),
    tag = "admin"
)]
pub async fn save_questions(
    State(store): State<DynExamStore>,
    Path(id): Path<i64>,
    req: Result<Json<SaveQuestionsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = check_exam_id(id)?;
    let Json(req) = req?;

    let exam = store
        .find_exam(id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let questions = validate_pool(req.questions, exam.questions_in_exam, Some(exam.total_questions))
        .inspect_err(|v| tracing::warn!("Rejected pool for exam {}: {}", id, v))?;

    let created = store.replace_pool(id, questions).await?;
    tracing::info!("Replaced pool for exam {} with {} questions", id, created.len());

    Ok((
        StatusCode::CREATED,
        Json(SavedPool {
            exam_id: id,
            questions: created,
        }),
    ))
}
