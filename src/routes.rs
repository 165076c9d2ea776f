// src/routes.rs

use std::time::Duration;

use axum::{
    Router, http::Method,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{health, quiz, stats, submission, theme},
    state::AppState,
};

/// Every store and generation call runs under this request deadline; a timed
/// out request is dropped, which rolls back any in-flight transaction.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(240);

/// Assembles the main application router.
///
/// * Mounts the API surface under /api/v1.
/// * Applies global middleware (Trace, CORS, request timeout).
/// * Injects global state (database pool, config, generation client).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/quiz/create", post(quiz::create_quiz))
        .route("/quiz/submit", post(submission::submit_answers))
        .route("/quiz/submission", get(submission::get_submission_details))
        .route("/quiz/deactivate", put(quiz::deactivate_quiz))
        .route("/quizzes", get(quiz::list_quizzes_by_theme))
        .route("/themes", get(theme::list_themes))
        .route("/users/stats", get(stats::get_user_stats))
        .route("/users/submissions", get(stats::get_user_submissions));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
