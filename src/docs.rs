// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::handlers::{admin, exam};

#[derive(OpenApi)]
#[openapi(
    paths(
        admin::list_exams,
        admin::create_exam,
        admin::update_exam,
        admin::save_questions,
        exam::get_exam_for_user,
        exam::submit_exam,
    ),
    tags(
        (name = "admin", description = "Exam and question pool administration"),
        (name = "user", description = "Taking exams")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
