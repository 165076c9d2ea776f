// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    llm::{GeneratedQuestion, LlmClient},
    models::quiz::{CreateQuizRequest, QuestionApi, QuizApiResponse},
    store::quiz_repo,
};

/// Checks the shape of a generated quiz before it touches the database:
/// every question needs at least two options and exactly one option whose
/// text equals the generated correct answer. The grading key silently keeps
/// the last "correct" row it sees, so the invariant has to hold at ingestion.
fn validate_generated(questions: &[GeneratedQuestion]) -> Result<(), AppError> {
    if questions.is_empty() {
        return Err(AppError::InternalServerError(
            "generator returned no questions".to_string(),
        ));
    }

    for question in questions {
        if question.options.len() < 2 {
            return Err(AppError::InternalServerError(format!(
                "generated question '{}' has fewer than two options",
                question.question_text
            )));
        }

        let matches = question
            .options
            .iter()
            .filter(|option| **option == question.correct_answer)
            .count();
        if matches != 1 {
            return Err(AppError::InternalServerError(format!(
                "generated question '{}' has {} options matching its correct answer, expected exactly one",
                question.question_text, matches
            )));
        }
    }

    Ok(())
}

/// Generates a quiz for a theme via the text-generation service and persists
/// it (theme, quiz, questions, options) in one transaction.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    State(llm): State<LlmClient>,
    Json(req): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let generated = llm.generate_quiz(&req.theme, &req.wrong_subjects).await?;
    validate_generated(&generated)?;

    let (quiz, questions) = quiz_repo::save_generated_quiz(&pool, &req.theme, &generated).await?;

    // The stored questions line up index-for-index with the generated ones;
    // the options come from the generation payload, the ids from the database.
    let questions_api = questions
        .iter()
        .zip(generated.iter())
        .map(|(question, item)| QuestionApi {
            id: question.id.to_string(),
            subject: question.subject.clone().unwrap_or_default(),
            question: question.body.clone(),
            options: item.options.clone(),
        })
        .collect();

    Ok(Json(QuizApiResponse {
        quiz_id: quiz.id.to_string(),
        subject: quiz.name,
        questions: questions_api,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DeactivateQuizParams {
    pub quiz_id: String,
}

/// Soft-deletes a quiz (sets active = FALSE).
pub async fn deactivate_quiz(
    State(pool): State<PgPool>,
    Query(params): Query<DeactivateQuizParams>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id: i32 = params
        .quiz_id
        .parse()
        .map_err(|_| AppError::BadRequest("'quiz_id' must be a numeric id".to_string()))?;

    let rows_affected = quiz_repo::deactivate_quiz(&pool, quiz_id).await?;
    if rows_affected == 0 {
        return Err(AppError::NotFound(
            "quiz not found or already inactive".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "message": "Quiz deactivated successfully"
    })))
}

#[derive(Debug, Deserialize)]
pub struct QuizzesByThemeParams {
    pub theme_id: String,
}

/// Lists the active quizzes of a theme.
pub async fn list_quizzes_by_theme(
    State(pool): State<PgPool>,
    Query(params): Query<QuizzesByThemeParams>,
) -> Result<impl IntoResponse, AppError> {
    let theme_id: i32 = params
        .theme_id
        .parse()
        .map_err(|_| AppError::BadRequest("'theme_id' must be a numeric id".to_string()))?;

    let quizzes = quiz_repo::active_quizzes_by_theme(&pool, theme_id).await?;

    Ok(Json(quizzes))
}
