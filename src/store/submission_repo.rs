// src/store/submission_repo.rs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sqlx::{FromRow, PgPool};

use crate::{
    error::AppError,
    grading::{AnswerKey, AnswerKeyRow, build_answer_key},
    models::submission::{
        DifficultyDraft, GivenAnswerDraft, OptionDetail, QuestionDetail, Submission,
        SubmissionDetailResponse, SubmissionDraft,
    },
};

/// Fetches the answer key of a quiz: one row per (question, option) pair,
/// folded into the per-question key. An empty key means the quiz does not
/// exist or has nothing to grade against; the caller decides how to fail.
///
/// Takes any executor so the grading flow can read the key inside the same
/// transaction that will write the graded result.
pub async fn fetch_answer_key(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: i32,
) -> Result<AnswerKey, AppError> {
    let rows = sqlx::query_as::<_, AnswerKeyRow>(
        r#"
        SELECT
            q.id AS question_id,
            q.subject,
            o.id AS option_id,
            o.body AS option_body,
            o.correct
        FROM questions q
        JOIN options o ON q.id = o.question_id
        WHERE q.quiz_id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_all(executor)
    .await?;

    Ok(build_answer_key(&rows))
}

/// Persists a graded submission as one atomic unit: the submission row, its
/// given answers and its difficulty marks. Consumes the caller's transaction
/// (the same one the answer key was read under) and commits it; any failure
/// drops the transaction instead, rolling everything back. That also covers
/// a request canceled mid-way.
///
/// A duplicate answer for one question trips the unique constraint on
/// (submission_id, question_id) and aborts the whole write; malformed client
/// input surfaces instead of being silently merged.
pub async fn save_submission_stats(
    mut tx: sqlx::Transaction<'_, sqlx::Postgres>,
    draft: &SubmissionDraft,
    given_answers: &[GivenAnswerDraft],
    difficulties: &[DifficultyDraft],
) -> Result<Submission, AppError> {
    let saved = sqlx::query_as::<_, Submission>(
        r#"
        INSERT INTO submissions (submitted_at, score, user_id, quiz_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, submitted_at, score, user_id, quiz_id
        "#,
    )
    .bind(draft.submitted_at)
    .bind(draft.score)
    .bind(draft.user_id)
    .bind(draft.quiz_id)
    .fetch_one(&mut *tx)
    .await?;

    for answer in given_answers {
        sqlx::query(
            r#"
            INSERT INTO given_answers (submission_id, question_id, option_id, was_correct)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(saved.id)
        .bind(answer.question_id)
        .bind(answer.option_id)
        .bind(answer.was_correct)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                return AppError::Conflict(format!(
                    "duplicate answer for question {} in one submission",
                    answer.question_id
                ));
            }
            AppError::from(e)
        })?;
    }

    for difficulty in difficulties {
        sqlx::query(
            r#"
            INSERT INTO difficulties (subject, submission_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(&difficulty.subject)
        .bind(saved.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        submission_id = saved.id,
        given_answers = given_answers.len(),
        difficulties = difficulties.len(),
        "submission persisted"
    );

    Ok(saved)
}

/// One flat row of the five-table detail join: submission x quiz x theme x
/// question x option, left-joined with the answer the user gave (if any).
#[derive(Debug, Clone, FromRow)]
struct SubmissionDetailRow {
    submission_id: i32,
    quiz_id: i32,
    quiz_name: String,
    theme_name: String,
    score: f64,
    submitted_at: DateTime<Utc>,

    question_id: i32,
    question_body: String,
    subject: Option<String>,

    option_id: i32,
    option_body: String,
    correct: bool,

    // Nullable: a question the user never answered has no given_answers row.
    given_option_id: Option<i32>,
    was_correct: Option<bool>,
}

/// Fetches the nested detail view of one submission.
pub async fn fetch_submission_details(
    pool: &PgPool,
    submission_id: i32,
) -> Result<SubmissionDetailResponse, AppError> {
    let rows = sqlx::query_as::<_, SubmissionDetailRow>(
        r#"
        SELECT
            s.id AS submission_id,
            s.quiz_id,
            qz.name AS quiz_name,
            t.name AS theme_name,
            s.score,
            s.submitted_at,
            q.id AS question_id,
            q.body AS question_body,
            q.subject,
            o.id AS option_id,
            o.body AS option_body,
            o.correct,
            ga.option_id AS given_option_id,
            ga.was_correct
        FROM submissions s
        JOIN quizzes qz ON s.quiz_id = qz.id
        JOIN themes t ON qz.theme_id = t.id
        JOIN questions q ON qz.id = q.quiz_id
        JOIN options o ON q.id = o.question_id
        LEFT JOIN given_answers ga ON s.id = ga.submission_id AND q.id = ga.question_id
        WHERE s.id = $1
        ORDER BY q.id, o.id
        "#,
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    regroup_detail_rows(rows)
        .ok_or_else(|| AppError::NotFound(format!("submission {} not found", submission_id)))
}

/// Regroups the flat join into the nested submission -> question -> options
/// tree. Header fields come from the first row (constant across the join);
/// questions keep first-seen order. Returns None when the join is empty,
/// meaning the submission does not exist.
fn regroup_detail_rows(rows: Vec<SubmissionDetailRow>) -> Option<SubmissionDetailResponse> {
    let first = rows.first()?;

    let header = SubmissionDetailResponse {
        submission_id: first.submission_id,
        quiz_id: first.quiz_id,
        quiz_name: first.quiz_name.clone(),
        theme_name: first.theme_name.clone(),
        score: first.score,
        submitted_at: first.submitted_at,
        questions: Vec::new(),
    };

    let mut grouped: IndexMap<i32, QuestionDetail> = IndexMap::new();

    for row in &rows {
        let question = grouped.entry(row.question_id).or_insert_with(|| QuestionDetail {
            question_id: row.question_id,
            body: row.question_body.clone(),
            subject: row.subject.clone(),
            options: Vec::new(),
            user_answer: None,
            correct_answer: String::new(),
            // Unanswered questions have no given_answers row and count as missed.
            answered_correctly: row.was_correct.unwrap_or(false),
        });

        question.options.push(OptionDetail {
            option_id: row.option_id,
            body: row.option_body.clone(),
        });

        if row.correct {
            question.correct_answer = row.option_body.clone();
        }

        if row.given_option_id == Some(row.option_id) {
            question.user_answer = Some(row.option_body.clone());
        }
    }

    Some(SubmissionDetailResponse {
        questions: grouped.into_values().collect(),
        ..header
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn detail_row(question_id: i32, option_id: i32, option_body: &str, correct: bool) -> SubmissionDetailRow {
        SubmissionDetailRow {
            submission_id: 7,
            quiz_id: 3,
            quiz_name: "Biology".to_string(),
            theme_name: "Science".to_string(),
            score: 50.0,
            submitted_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            question_id,
            question_body: format!("question {}", question_id),
            subject: Some("cells".to_string()),
            option_id,
            option_body: option_body.to_string(),
            correct,
            given_option_id: None,
            was_correct: None,
        }
    }

    #[test]
    fn empty_join_means_unknown_submission() {
        assert!(regroup_detail_rows(Vec::new()).is_none());
    }

    #[test]
    fn regroups_options_under_their_question() {
        let mut rows = vec![
            detail_row(1, 11, "A", true),
            detail_row(1, 12, "B", false),
            detail_row(2, 21, "C", false),
            detail_row(2, 22, "D", true),
        ];
        // User answered Q1 with option 12 ("B"), incorrectly.
        for row in rows.iter_mut().filter(|r| r.question_id == 1) {
            row.given_option_id = Some(12);
            row.was_correct = Some(false);
        }

        let detail = regroup_detail_rows(rows).unwrap();

        assert_eq!(detail.submission_id, 7);
        assert_eq!(detail.quiz_name, "Biology");
        assert_eq!(detail.theme_name, "Science");
        assert_eq!(detail.questions.len(), 2);

        let q1 = &detail.questions[0];
        assert_eq!(q1.question_id, 1);
        assert_eq!(q1.options.len(), 2);
        assert_eq!(q1.correct_answer, "A");
        assert_eq!(q1.user_answer.as_deref(), Some("B"));
        assert!(!q1.answered_correctly);

        let q2 = &detail.questions[1];
        assert_eq!(q2.options.len(), 2);
        assert_eq!(q2.correct_answer, "D");
        assert_eq!(q2.user_answer, None);
        assert!(!q2.answered_correctly);
    }

    #[test]
    fn answered_correctly_follows_the_stored_flag() {
        let mut rows = vec![detail_row(1, 11, "A", true), detail_row(1, 12, "B", false)];
        for row in rows.iter_mut() {
            row.given_option_id = Some(11);
            row.was_correct = Some(true);
        }

        let detail = regroup_detail_rows(rows).unwrap();

        let q1 = &detail.questions[0];
        assert!(q1.answered_correctly);
        assert_eq!(q1.user_answer.as_deref(), Some("A"));
    }

    #[test]
    fn questions_keep_first_seen_order() {
        let rows = vec![
            detail_row(5, 51, "A", true),
            detail_row(5, 52, "B", false),
            detail_row(2, 21, "C", true),
        ];

        let detail = regroup_detail_rows(rows).unwrap();

        let order: Vec<i32> = detail.questions.iter().map(|q| q.question_id).collect();
        assert_eq!(order, vec![5, 2]);
    }

    #[test]
    fn unresolved_given_answer_leaves_user_answer_absent() {
        // option_id was NULL at grading time: the user's text matched nothing.
        let mut rows = vec![detail_row(1, 11, "A", true), detail_row(1, 12, "B", false)];
        for row in rows.iter_mut() {
            row.given_option_id = None;
            row.was_correct = Some(false);
        }

        let detail = regroup_detail_rows(rows).unwrap();

        let q1 = &detail.questions[0];
        assert_eq!(q1.user_answer, None);
        assert!(!q1.answered_correctly);
    }
}
