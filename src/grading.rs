// src/grading.rs

use std::collections::HashMap;

use indexmap::IndexMap;
use sqlx::FromRow;

use crate::models::submission::{DifficultyDraft, GivenAnswerDraft, UserAnswer};

/// One flat row of the answer-key join: a (question, option) pair of a quiz.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerKeyRow {
    pub question_id: i32,
    pub subject: Option<String>,
    pub option_id: i32,
    pub option_body: String,
    pub correct: bool,
}

/// The grading key of one question: its subject, the text of its correct
/// option and a text -> id map over every selectable option.
#[derive(Debug, Clone)]
pub struct QuestionKey {
    pub subject: Option<String>,
    pub correct_text: String,
    pub option_ids: HashMap<String, i32>,
}

/// The full answer key of a quiz, keyed by question id in first-seen order.
/// Built fresh per request so it always reflects the stored options.
pub type AnswerKey = IndexMap<i32, QuestionKey>;

/// Folds the flat join rows into the per-question answer key.
///
/// The subject is the first non-null value seen for the question. Duplicate
/// option texts collapse to the last id seen; more than one `correct` row per
/// question likewise keeps the last text seen. Both are data-shape problems
/// the ingestion path is expected to prevent.
pub fn build_answer_key(rows: &[AnswerKeyRow]) -> AnswerKey {
    let mut key = AnswerKey::new();

    for row in rows {
        let entry = key.entry(row.question_id).or_insert_with(|| QuestionKey {
            subject: None,
            correct_text: String::new(),
            option_ids: HashMap::new(),
        });

        if entry.subject.is_none() {
            entry.subject = row.subject.clone();
        }

        entry.option_ids.insert(row.option_body.clone(), row.option_id);

        if row.correct {
            entry.correct_text = row.option_body.clone();
        }
    }

    key
}

/// The outcome of grading one batch of answers against an answer key.
#[derive(Debug)]
pub struct GradedSubmission {
    pub score: f64,
    pub correct_count: usize,
    pub total_count: usize,
    pub given_answers: Vec<GivenAnswerDraft>,
    pub difficulties: Vec<DifficultyDraft>,
}

/// Grades a batch of user answers against the answer key.
///
/// * Answers whose question-id token does not parse, or which reference a
///   question outside the quiz, are skipped with a warning; they count as
///   neither correct nor incorrect.
/// * Correctness is exact, case-sensitive equality with the stored correct
///   option text. The chosen option id is resolved through the text -> id
///   map and may be None without failing the answer.
/// * Every incorrect answer records the question's subject (possibly absent)
///   as a difficulty mark.
/// * The total is the number of questions in the key, not the number of
///   answers submitted: skipped questions still count against the user.
///
/// Duplicate answers for the same question all produce drafts; the unique
/// constraint on (submission, question) rejects them at persistence time.
pub fn grade_answers(key: &AnswerKey, answers: &[UserAnswer]) -> GradedSubmission {
    let total_count = key.len();
    let mut correct_count = 0;
    let mut given_answers = Vec::with_capacity(answers.len());
    let mut difficulties = Vec::new();

    for answer in answers {
        let question_id: i32 = match answer.question_id.parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(
                    token = %answer.question_id,
                    "skipping answer with unparseable question id"
                );
                continue;
            }
        };

        let Some(question) = key.get(&question_id) else {
            tracing::warn!(
                question_id,
                "skipping answer for a question that does not belong to the quiz"
            );
            continue;
        };

        let was_correct = answer.selected_option == question.correct_text;

        if was_correct {
            correct_count += 1;
        } else {
            difficulties.push(DifficultyDraft {
                subject: question.subject.clone(),
            });
        }

        given_answers.push(GivenAnswerDraft {
            question_id,
            option_id: question.option_ids.get(&answer.selected_option).copied(),
            was_correct,
        });
    }

    let score = if total_count == 0 {
        0.0
    } else {
        (correct_count as f64 / total_count as f64) * 100.0
    };

    GradedSubmission {
        score,
        correct_count,
        total_count,
        given_answers,
        difficulties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        question_id: i32,
        subject: Option<&str>,
        option_id: i32,
        option_body: &str,
        correct: bool,
    ) -> AnswerKeyRow {
        AnswerKeyRow {
            question_id,
            subject: subject.map(String::from),
            option_id,
            option_body: option_body.to_string(),
            correct,
        }
    }

    fn answer(question_id: &str, selected: &str) -> UserAnswer {
        UserAnswer {
            question_id: question_id.to_string(),
            selected_option: selected.to_string(),
        }
    }

    /// Two questions, four options each: Q1 -> "Paris", Q2 -> "42".
    fn sample_key() -> AnswerKey {
        build_answer_key(&[
            row(1, Some("capitals"), 11, "Paris", true),
            row(1, Some("capitals"), 12, "London", false),
            row(1, Some("capitals"), 13, "Berlin", false),
            row(1, Some("capitals"), 14, "Madrid", false),
            row(2, None, 21, "42", true),
            row(2, None, 22, "0", false),
            row(2, None, 23, "7", false),
            row(2, None, 24, "-1", false),
        ])
    }

    #[test]
    fn key_groups_rows_by_question() {
        let key = sample_key();

        assert_eq!(key.len(), 2);
        let q1 = &key[&1];
        assert_eq!(q1.subject.as_deref(), Some("capitals"));
        assert_eq!(q1.correct_text, "Paris");
        assert_eq!(q1.option_ids.len(), 4);
        assert_eq!(q1.option_ids["London"], 12);

        let q2 = &key[&2];
        assert_eq!(q2.subject, None);
        assert_eq!(q2.correct_text, "42");
    }

    #[test]
    fn key_preserves_first_seen_question_order() {
        let key = build_answer_key(&[
            row(9, None, 91, "a", true),
            row(3, None, 31, "b", true),
            row(9, None, 92, "c", false),
        ]);

        let order: Vec<i32> = key.keys().copied().collect();
        assert_eq!(order, vec![9, 3]);
    }

    #[test]
    fn key_takes_first_non_null_subject() {
        let key = build_answer_key(&[
            row(1, None, 11, "a", true),
            row(1, Some("algebra"), 12, "b", false),
            row(1, Some("geometry"), 13, "c", false),
        ]);

        assert_eq!(key[&1].subject.as_deref(), Some("algebra"));
    }

    #[test]
    fn empty_rows_yield_empty_key() {
        assert!(build_answer_key(&[]).is_empty());
    }

    #[test]
    fn grades_one_correct_of_two() {
        let key = sample_key();
        let answers = [answer("1", "Paris"), answer("2", "0")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.total_count, 2);
        assert_eq!(graded.score, 50.0);
        assert_eq!(graded.given_answers.len(), 2);
        assert_eq!(
            graded.given_answers[0],
            GivenAnswerDraft {
                question_id: 1,
                option_id: Some(11),
                was_correct: true,
            }
        );
        assert_eq!(
            graded.given_answers[1],
            GivenAnswerDraft {
                question_id: 2,
                option_id: Some(22),
                was_correct: false,
            }
        );
        // Q2 has no subject, so the difficulty mark carries none.
        assert_eq!(graded.difficulties, vec![DifficultyDraft { subject: None }]);
    }

    #[test]
    fn total_is_key_size_not_answer_count() {
        let key = sample_key();
        let answers = [answer("1", "Paris")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.total_count, 2);
        assert_eq!(graded.score, 50.0);
    }

    #[test]
    fn zero_answers_score_zero_against_full_key() {
        let key = sample_key();

        let graded = grade_answers(&key, &[]);

        assert_eq!(graded.correct_count, 0);
        assert_eq!(graded.total_count, 2);
        assert_eq!(graded.score, 0.0);
        assert!(graded.given_answers.is_empty());
        assert!(graded.difficulties.is_empty());
    }

    #[test]
    fn unparseable_question_id_is_skipped() {
        let key = sample_key();
        let answers = [answer("q1", "Paris"), answer("2", "42")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.given_answers.len(), 1);
        assert_eq!(graded.given_answers[0].question_id, 2);
    }

    #[test]
    fn answer_outside_the_quiz_is_skipped() {
        let key = sample_key();
        let answers = [answer("99", "Paris"), answer("1", "Paris")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.total_count, 2);
        assert_eq!(graded.given_answers.len(), 1);
    }

    #[test]
    fn unknown_option_text_records_null_option_id() {
        let key = sample_key();
        let answers = [answer("1", "Lisbon")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 0);
        assert_eq!(
            graded.given_answers[0],
            GivenAnswerDraft {
                question_id: 1,
                option_id: None,
                was_correct: false,
            }
        );
        assert_eq!(
            graded.difficulties,
            vec![DifficultyDraft {
                subject: Some("capitals".to_string()),
            }]
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let key = sample_key();
        let answers = [answer("1", "paris")];

        let graded = grade_answers(&key, &answers);

        assert_eq!(graded.correct_count, 0);
        assert_eq!(graded.given_answers[0].option_id, None);
    }

    #[test]
    fn duplicate_answers_all_produce_drafts() {
        let key = sample_key();
        let answers = [answer("1", "Paris"), answer("1", "London")];

        let graded = grade_answers(&key, &answers);

        // Both drafts survive grading; the unique constraint on
        // (submission, question) rejects the pair at persistence time.
        assert_eq!(graded.given_answers.len(), 2);
        assert_eq!(graded.correct_count, 1);
    }

    #[test]
    fn empty_key_scores_zero() {
        let key = AnswerKey::new();

        let graded = grade_answers(&key, &[answer("1", "Paris")]);

        assert_eq!(graded.total_count, 0);
        assert_eq!(graded.score, 0.0);
    }
}
