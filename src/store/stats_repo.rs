// src/store/stats_repo.rs

use sqlx::{FromRow, PgPool};

use crate::{
    error::AppError,
    models::{stats::UserStatsResponse, submission::SubmissionHistoryEntry},
};

/// The single aggregate row. With no submissions the aggregates come back as
/// one row of zero counts and NULL AVG/SUM, which is the valid zero state.
#[derive(Debug, FromRow)]
struct UserStatsRow {
    total_quizzes: i64,
    avg_score: Option<f64>,
    total_answered: i64,
    total_correct: Option<i64>,
}

/// Computes aggregate performance counters for a user in one query.
pub async fn fetch_user_stats(pool: &PgPool, user_id: i32) -> Result<UserStatsResponse, AppError> {
    let row = sqlx::query_as::<_, UserStatsRow>(
        r#"
        SELECT
            COUNT(DISTINCT s.id) AS total_quizzes,
            AVG(s.score) AS avg_score,
            COUNT(ga.id) AS total_answered,
            SUM(CASE WHEN ga.was_correct = TRUE THEN 1 ELSE 0 END) AS total_correct
        FROM submissions s
        LEFT JOIN given_answers ga ON s.id = ga.submission_id
        WHERE s.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(derive_user_stats(user_id, row))
}

/// Derives the error count and accuracy percentage from the raw aggregates.
fn derive_user_stats(user_id: i32, row: UserStatsRow) -> UserStatsResponse {
    let total_correct = row.total_correct.unwrap_or(0);
    let total_answered = row.total_answered;

    let accuracy = if total_answered > 0 {
        (total_correct as f64 / total_answered as f64) * 100.0
    } else {
        0.0
    };

    UserStatsResponse {
        user_id: user_id.to_string(),
        total_quizzes: row.total_quizzes,
        total_answered,
        total_correct,
        total_errors: total_answered - total_correct,
        accuracy,
        average_score: row.avg_score.unwrap_or(0.0),
    }
}

/// Lists a user's submission history, newest first, with quiz and theme names.
pub async fn fetch_user_submissions(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<SubmissionHistoryEntry>, AppError> {
    let history = sqlx::query_as::<_, SubmissionHistoryEntry>(
        r#"
        SELECT
            s.id AS submission_id,
            s.quiz_id,
            q.name AS quiz_name,
            t.name AS theme_name,
            s.score,
            s.submitted_at
        FROM submissions s
        JOIN quizzes q ON s.quiz_id = q.id
        JOIN themes t ON q.theme_id = t.id
        WHERE s.user_id = $1
        ORDER BY s.submitted_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}
