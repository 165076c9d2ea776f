// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
/// This service only ever creates quizzes through generation; grading reads them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i32,
    pub name: String,
    pub theme_id: i32,
    pub active: bool,
}

/// DTO for requesting a generated quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, message = "'user_id' cannot be blank"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "'theme' cannot be blank"))]
    pub theme: String,
    /// Subjects the user previously got wrong; the generator focuses on these.
    #[serde(default)]
    pub wrong_subjects: Vec<String>,
}

/// DTO for returning a freshly generated quiz.
#[derive(Debug, Serialize)]
pub struct QuizApiResponse {
    pub quiz_id: String,
    pub subject: String,
    pub questions: Vec<QuestionApi>,
}

/// One question of a generated quiz, formatted for the JSON response.
/// The correct answer is deliberately absent.
#[derive(Debug, Serialize)]
pub struct QuestionApi {
    pub id: String,
    pub subject: String,
    pub question: String,
    pub options: Vec<String>,
}
