// src/models/stats.rs

use serde::Serialize;

/// Aggregated performance counters for one user.
/// A user who never took a quiz gets all-zero values, not an error.
/// Field names follow the wire contract of the consuming client.
#[derive(Debug, Serialize, PartialEq)]
pub struct UserStatsResponse {
    pub user_id: String,
    #[serde(rename = "total_quizzes_realizados")]
    pub total_quizzes: i64,
    #[serde(rename = "total_perguntas_respondidas")]
    pub total_answered: i64,
    #[serde(rename = "total_acertos")]
    pub total_correct: i64,
    #[serde(rename = "total_erros")]
    pub total_errors: i64,
    #[serde(rename = "percentagem_acerto")]
    pub accuracy: f64,
    #[serde(rename = "pontuacao_media")]
    pub average_score: f64,
}
