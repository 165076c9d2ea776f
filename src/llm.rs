// src/llm.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Generation can take minutes on a local model.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(180);

/// Client for an Ollama-style text-generation endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

/// Payload for the `/api/generate` endpoint (non-streamed).
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

/// The generation response. `response` holds the model's completion, which
/// itself should be a JSON document.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// One question as the generator was asked to produce it.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub subject: String,
    #[serde(rename = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Captures the `{"questions": [...]}` wrapper the prompt asks for.
#[derive(Deserialize)]
struct QuestionsWrapper {
    questions: Vec<GeneratedQuestion>,
}

impl LlmClient {
    pub fn new(endpoint: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model,
        }
    }

    /// Asks the model for a quiz about `theme`, focused on `subjects`.
    /// Parses the completion into question records; a completion that is not
    /// the requested JSON shape is an internal error, never a panic.
    pub async fn generate_quiz(
        &self,
        theme: &str,
        subjects: &[String],
    ) -> Result<Vec<GeneratedQuestion>, AppError> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(theme, subjects),
            stream: false,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting quiz generation");

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(GENERATION_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::InternalServerError(format!("generation request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "generation endpoint returned non-OK status");
            return Err(AppError::InternalServerError(format!(
                "generation endpoint returned status {}",
                status
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            AppError::InternalServerError(format!("failed to decode generation response: {}", e))
        })?;

        let json_text = strip_code_fences(&generated.response);

        let wrapper: QuestionsWrapper = serde_json::from_str(json_text).map_err(|e| {
            tracing::error!(completion = %json_text, "model completion was not valid quiz JSON");
            AppError::InternalServerError(format!("invalid quiz JSON from generator: {}", e))
        })?;

        Ok(wrapper.questions)
    }
}

fn build_prompt(theme: &str, subjects: &[String]) -> String {
    let focus = subjects.join(", ");

    format!(
        "Create a quiz of 10 questions about the main theme '{theme}'.\n\
         The quiz must focus on these topics: {focus}.\n\n\
         RESPONSE FORMAT RULES:\n\
         1. Return ONLY a valid JSON object.\n\
         2. The JSON object must have a single key \"questions\" holding the array of questions. Example: {{\"questions\": [...]}}.\n\
         3. Do NOT include any text before or after the JSON object (no \"Here is your quiz:\" and no ```json markdown).\n\
         4. Each object in the \"questions\" array must have EXACTLY these fields:\n\
            - \"subject\": the specific topic of the question.\n\
            - \"question\": the question text.\n\
            - \"options\": an array of 4 option strings.\n\
            - \"correct_answer\": the exact string of the correct option."
    )
}

/// Models sometimes wrap the JSON in a markdown fence despite the prompt.
fn strip_code_fences(completion: &str) -> &str {
    let trimmed = completion.trim();
    trimmed
        .strip_prefix("```json")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"questions\": []}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"questions\": []}");
    }

    #[test]
    fn leaves_bare_json_alone() {
        let bare = " {\"questions\": []} ";
        assert_eq!(strip_code_fences(bare), "{\"questions\": []}");
    }

    #[test]
    fn parses_wrapped_questions() {
        let completion = r#"```json
        {"questions": [{
            "subject": "cells",
            "question": "What organelle produces ATP?",
            "options": ["Nucleus", "Mitochondrion", "Ribosome", "Golgi"],
            "correct_answer": "Mitochondrion"
        }]}
        ```"#;

        let wrapper: QuestionsWrapper =
            serde_json::from_str(strip_code_fences(completion)).unwrap();
        assert_eq!(wrapper.questions.len(), 1);
        assert_eq!(wrapper.questions[0].correct_answer, "Mitochondrion");
    }

    #[test]
    fn prompt_mentions_theme_and_subjects() {
        let prompt = build_prompt("Physics", &["optics".to_string(), "waves".to_string()]);
        assert!(prompt.contains("'Physics'"));
        assert!(prompt.contains("optics, waves"));
    }
}
