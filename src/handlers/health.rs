// src/handlers/health.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;

/// Liveness probe that also reports dependency health.
/// Returns 503 when the database cannot be reached.
pub async fn health_check(State(pool): State<PgPool>) -> impl IntoResponse {
    let database_up = sqlx::query("SELECT 1").execute(&pool).await.is_ok();

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if database_up { "UP" } else { "DOWN" },
            "dependencies": {
                "database": if database_up { "UP" } else { "DOWN" },
            }
        })),
    )
}
