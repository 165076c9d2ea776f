// src/store/theme_repo.rs

use sqlx::PgPool;

use crate::{error::AppError, models::theme::Theme};

/// Lists every active theme, alphabetically. No themes is an empty list.
pub async fn all_active_themes(pool: &PgPool) -> Result<Vec<Theme>, AppError> {
    let themes = sqlx::query_as::<_, Theme>(
        "SELECT id, name, description, created_at, active FROM themes WHERE active = TRUE ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(themes)
}
