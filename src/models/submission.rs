// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'submissions' table: one graded attempt at a quiz.
/// Never mutated after insertion.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i32,
    pub submitted_at: DateTime<Utc>,
    /// Percentage in [0, 100].
    pub score: f64,
    pub user_id: i32,
    pub quiz_id: i32,
}

/// A submission row about to be inserted. The id and the stored timestamp
/// come back from the database.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub submitted_at: DateTime<Utc>,
    pub score: f64,
    pub user_id: i32,
    pub quiz_id: i32,
}

/// A 'given_answers' row about to be inserted. `option_id` is None when the
/// submitted option text matched no stored option; the answer is still
/// recorded as given.
#[derive(Debug, Clone, PartialEq)]
pub struct GivenAnswerDraft {
    pub question_id: i32,
    pub option_id: Option<i32>,
    pub was_correct: bool,
}

/// A 'difficulties' row about to be inserted: a subject the user got wrong,
/// kept for later remediation.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyDraft {
    pub subject: Option<String>,
}

/// DTO for submitting quiz answers. Identifiers arrive as strings from the
/// upstream client and are parsed into database ids by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmissionRequest {
    #[validate(length(min = 1, message = "'quiz_id' cannot be blank"))]
    pub quiz_id: String,
    #[validate(length(min = 1, message = "'user_id' cannot be blank"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "'answers' cannot be empty"))]
    pub answers: Vec<UserAnswer>,
}

/// One submitted answer: a question-id token plus the *text* of the chosen option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_option: String,
}

/// DTO returned after grading a submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub submission_id: i32,
    pub score: f64,
    pub correct_count: usize,
    pub total_count: usize,
    pub message: String,
}

/// One entry of a user's submission history (submission x quiz x theme join).
/// Field names follow the wire contract of the consuming client.
#[derive(Debug, FromRow, Serialize)]
pub struct SubmissionHistoryEntry {
    pub submission_id: i32,
    pub quiz_id: i32,
    #[serde(rename = "quiz_nome")]
    pub quiz_name: String,
    #[serde(rename = "tema_nome")]
    pub theme_name: String,
    #[serde(rename = "pontuacao")]
    pub score: f64,
    #[serde(rename = "data_hora")]
    pub submitted_at: DateTime<Utc>,
}

/// Full nested detail view of one submission.
#[derive(Debug, Serialize)]
pub struct SubmissionDetailResponse {
    pub submission_id: i32,
    pub quiz_id: i32,
    #[serde(rename = "quiz_nome")]
    pub quiz_name: String,
    #[serde(rename = "tema_nome")]
    pub theme_name: String,
    #[serde(rename = "pontuacao")]
    pub score: f64,
    #[serde(rename = "data_hora")]
    pub submitted_at: DateTime<Utc>,
    #[serde(rename = "perguntas")]
    pub questions: Vec<QuestionDetail>,
}

/// One question inside the detail view, with its full option list.
#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(rename = "pergunta_id")]
    pub question_id: i32,
    #[serde(rename = "corpo_pergunta")]
    pub body: String,
    #[serde(rename = "assunto", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "opcoes")]
    pub options: Vec<OptionDetail>,
    /// Text of the option the user picked; absent when the user never
    /// answered this question or the chosen option could not be resolved.
    #[serde(rename = "resposta_utilizador", skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    #[serde(rename = "resposta_correta")]
    pub correct_answer: String,
    #[serde(rename = "acertou")]
    pub answered_correctly: bool,
}

/// A single selectable option inside the detail view.
#[derive(Debug, Serialize)]
pub struct OptionDetail {
    #[serde(rename = "resposta_id")]
    pub option_id: i32,
    #[serde(rename = "corpo")]
    pub body: String,
}
