// src/handlers/stats.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{error::AppError, store::stats_repo};

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

/// Returns aggregate performance counters for a user.
/// A user with no submissions gets all-zero statistics, not a 404.
pub async fn get_user_stats(
    State(pool): State<PgPool>,
    Query(params): Query<UserParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id: i32 = params
        .user_id
        .parse()
        .map_err(|_| AppError::BadRequest("'user_id' must be a numeric id".to_string()))?;

    let stats = stats_repo::fetch_user_stats(&pool, user_id).await?;

    Ok(Json(stats))
}

/// Returns a user's submission history, newest first.
pub async fn get_user_submissions(
    State(pool): State<PgPool>,
    Query(params): Query<UserParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id: i32 = params
        .user_id
        .parse()
        .map_err(|_| AppError::BadRequest("'user_id' must be a numeric id".to_string()))?;

    let history = stats_repo::fetch_user_submissions(&pool, user_id).await?;

    Ok(Json(history))
}
