// src/store/quiz_repo.rs

use sqlx::PgPool;

use crate::{
    error::AppError,
    llm::GeneratedQuestion,
    models::{question::Question, quiz::Quiz, theme::Theme},
};

/// Persists a generated quiz as one transaction: find-or-create the active
/// theme by name, insert the quiz, then every question with its options.
/// An option is marked correct when its text equals the generated answer.
pub async fn save_generated_quiz(
    pool: &PgPool,
    theme_name: &str,
    generated: &[GeneratedQuestion],
) -> Result<(Quiz, Vec<Question>), AppError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, Theme>(
        "SELECT id, name, description, created_at, active FROM themes WHERE name = $1 AND active = TRUE",
    )
    .bind(theme_name)
    .fetch_optional(&mut *tx)
    .await?;

    let theme = match existing {
        Some(theme) => theme,
        None => {
            tracing::info!(theme = theme_name, "theme not found, creating");
            sqlx::query_as::<_, Theme>(
                "INSERT INTO themes (name) VALUES ($1) RETURNING id, name, description, created_at, active",
            )
            .bind(theme_name)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let quiz = sqlx::query_as::<_, Quiz>(
        "INSERT INTO quizzes (name, theme_id) VALUES ($1, $2) RETURNING id, name, theme_id, active",
    )
    .bind(theme_name)
    .bind(theme.id)
    .fetch_one(&mut *tx)
    .await?;

    let mut questions = Vec::with_capacity(generated.len());

    for item in generated {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (subject, body, quiz_id)
            VALUES ($1, $2, $3)
            RETURNING id, subject, body, explanation, quiz_id
            "#,
        )
        .bind(&item.subject)
        .bind(&item.question_text)
        .bind(quiz.id)
        .fetch_one(&mut *tx)
        .await?;

        for option in &item.options {
            let correct = option == &item.correct_answer;
            sqlx::query("INSERT INTO options (body, correct, question_id) VALUES ($1, $2, $3)")
                .bind(option)
                .bind(correct)
                .bind(question.id)
                .execute(&mut *tx)
                .await?;
        }

        questions.push(question);
    }

    tx.commit().await?;

    tracing::info!(
        quiz_id = quiz.id,
        theme_id = theme.id,
        questions = questions.len(),
        "generated quiz persisted"
    );

    Ok((quiz, questions))
}

/// Soft-deletes a quiz. Returns the number of rows actually flipped, so the
/// caller can distinguish "deactivated" from "unknown or already inactive".
pub async fn deactivate_quiz(pool: &PgPool, quiz_id: i32) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE quizzes SET active = FALSE WHERE id = $1 AND active = TRUE")
        .bind(quiz_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Lists the active quizzes of a theme, alphabetically.
pub async fn active_quizzes_by_theme(pool: &PgPool, theme_id: i32) -> Result<Vec<Quiz>, AppError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        "SELECT id, name, theme_id, active FROM quizzes WHERE theme_id = $1 AND active = TRUE ORDER BY name ASC",
    )
    .bind(theme_id)
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}
