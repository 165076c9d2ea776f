// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i32,

    /// Specific subject within the quiz theme. Questions generated before
    /// subject tagging was introduced carry no subject.
    pub subject: Option<String>,

    /// The text content of the question.
    pub body: String,

    /// Explanation of the correct answer, when the generator supplies one.
    pub explanation: Option<String>,

    pub quiz_id: i32,
}

/// Represents the 'options' table: one selectable answer of a question.
/// Exactly one option per question is expected to carry `correct = true`;
/// this is validated when a generated quiz is ingested.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i32,
    pub body: String,
    pub correct: bool,
    pub question_id: i32,
}
