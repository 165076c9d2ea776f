// src/handlers/theme.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{error::AppError, store::theme_repo};

/// Lists every active theme.
pub async fn list_themes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let themes = theme_repo::all_active_themes(&pool).await?;

    Ok(Json(themes))
}
