// src/routes.rs

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    docs,
    error::AppError,
    handlers::{admin, exam},
    state::AppState,
    utils::user_key::{USER_EMAIL_HEADER, require_user_key},
};

/// Assembles the main application router.
///
/// * Merges the admin and user sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (exam store, config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_EMAIL_HEADER),
        ]);

    let admin_routes: Router<AppState> = Router::new()
        .route("/exams", get(admin::list_exams).post(admin::create_exam))
        .route("/exams/{id}", put(admin::update_exam))
        .route("/exams/{id}/questions", post(admin::save_questions));

    // Every user route needs the x-user-email key
    let user_routes: Router<AppState> = Router::new()
        .route("/exams/{id}", get(exam::get_exam_for_user))
        .route("/exams/{id}/submit", post(exam::submit_exam))
        .layer(middleware::from_fn(require_user_key));

    Router::new()
        .nest("/admin", admin_routes)
        .nest("/user", user_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .fallback(not_found)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, store::InMemoryExamStore};

    fn app() -> Router {
        create_router(AppState {
            store: Arc::new(InMemoryExamStore::new()),
            config: Config {
                database_url: String::new(),
                rust_log: "error".to_string(),
                port: 0,
                log_dir: "logs".to_string(),
                cors_origins: vec!["http://localhost:3000".to_string(), "not a header\n".to_string()],
            },
        })
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let resp = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_routes_require_key() {
        let resp = app()
            .oneshot(Request::get("/user/exams/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let resp = app()
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
