// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    grading,
    models::submission::{SubmissionDraft, SubmissionRequest, SubmissionResponse},
    store::submission_repo,
};

/// Grades a batch of submitted answers and persists the result.
///
/// Builds the answer key fresh from storage, grades against it, then writes
/// the submission with its given answers and difficulty marks as one
/// transaction. The request deadline applied by the router bounds every
/// store call; an aborted request drops the transaction, which rolls back.
pub async fn submit_answers(
    State(pool): State<PgPool>,
    Json(req): Json<SubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let quiz_id: i32 = req
        .quiz_id
        .parse()
        .map_err(|_| AppError::BadRequest("'quiz_id' must be a numeric id".to_string()))?;
    let user_id: i32 = req
        .user_id
        .parse()
        .map_err(|_| AppError::BadRequest("'user_id' must be a numeric id".to_string()))?;

    // Key read and result write share one transaction, so the graded rows
    // are always consistent with the key they were graded against.
    let mut tx = pool.begin().await?;

    let key = submission_repo::fetch_answer_key(&mut *tx, quiz_id).await?;
    if key.is_empty() {
        return Err(AppError::NotFound(format!(
            "quiz {} not found or has no answer key",
            quiz_id
        )));
    }

    let graded = grading::grade_answers(&key, &req.answers);

    let draft = SubmissionDraft {
        submitted_at: Utc::now(),
        score: graded.score,
        user_id,
        quiz_id,
    };

    let saved =
        submission_repo::save_submission_stats(tx, &draft, &graded.given_answers, &graded.difficulties)
            .await?;

    Ok(Json(SubmissionResponse {
        submission_id: saved.id,
        score: saved.score,
        correct_count: graded.correct_count,
        total_count: graded.total_count,
        message: format!(
            "Submission accepted: {} of {} correct.",
            graded.correct_count, graded.total_count
        ),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SubmissionDetailParams {
    pub submission_id: String,
}

/// Returns the nested per-question detail view of one submission.
pub async fn get_submission_details(
    State(pool): State<PgPool>,
    Query(params): Query<SubmissionDetailParams>,
) -> Result<impl IntoResponse, AppError> {
    let submission_id: i32 = params
        .submission_id
        .parse()
        .map_err(|_| AppError::BadRequest("'submission_id' must be a numeric id".to_string()))?;

    let details = submission_repo::fetch_submission_details(&pool, submission_id).await?;

    Ok(Json(details))
}
