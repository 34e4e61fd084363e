// src/services/catalog.rs

use std::collections::HashMap;

use sqlx::{SqliteConnection, types::Json};

use crate::{
    db::{Database, Param},
    error::AppError,
    models::{
        question::{NewQuestion, Question},
        quiz::{NewQuiz, Quiz},
    },
};

/// Quiz and question authoring.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    db: Database,
}

impl QuizCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every quiz with its questions loaded, both in authoring order.
    ///
    /// Two queries in one read transaction instead of one query per quiz.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        let mut tx = self.db.begin().await?;

        let mut quizzes = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, time_limit FROM quizzes ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quizzes: {:?}", e);
            AppError::from(e)
        })?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, options, correct_option
            FROM questions
            ORDER BY quiz_id, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions: {:?}", e);
            AppError::from(e)
        })?;

        tx.commit().await?;

        let mut by_quiz: HashMap<i64, Vec<Question>> = HashMap::new();
        for question in questions {
            by_quiz.entry(question.quiz_id).or_default().push(question);
        }
        for quiz in &mut quizzes {
            quiz.questions = by_quiz.remove(&quiz.id).unwrap_or_default();
        }

        Ok(quizzes)
    }

    pub async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, time_limit FROM quizzes WHERE id = ?",
        )
        .bind(quiz_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(mut quiz) = quiz else {
            return Ok(None);
        };

        quiz.questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, text, options, correct_option
            FROM questions
            WHERE quiz_id = ?
            ORDER BY id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(Some(quiz))
    }

    /// Inserts the quiz and all its questions atomically. Returns the quiz id.
    pub async fn create_quiz(&self, payload: &NewQuiz) -> Result<i64, AppError> {
        payload.check()?;

        let mut tx = self.db.begin().await?;

        let quiz_id = sqlx::query(
            r#"
            INSERT INTO quizzes (title, description, time_limit)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.time_limit)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz: {:?}", e);
            AppError::from(e)
        })?
        .last_insert_rowid();

        for question in &payload.questions {
            insert_question(&mut tx, quiz_id, question)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to insert question for quiz {}: {:?}", quiz_id, e);
                    AppError::from(e)
                })?;
        }

        tx.commit().await?;

        tracing::info!(
            quiz_id,
            questions = payload.questions.len(),
            "Quiz created"
        );
        Ok(quiz_id)
    }

    /// Validates, then appends a question to an existing quiz. Returns the question id.
    pub async fn add_question(&self, quiz_id: i64, payload: &NewQuestion) -> Result<i64, AppError> {
        payload.check()?;

        let mut conn = self.db.pool().acquire().await?;
        let question_id = insert_question(&mut conn, quiz_id, payload)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    tracing::warn!("Question rejected, quiz {} does not exist", quiz_id);
                    AppError::NotFound(format!("Quiz {} not found", quiz_id))
                }
                _ => {
                    tracing::error!("Failed to add question: {:?}", e);
                    AppError::from(e)
                }
            })?;

        tracing::info!(quiz_id, question_id, "Question added");
        Ok(question_id)
    }

    /// Deletes a quiz; its questions and attempts go with it. `false` if absent.
    pub async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError> {
        let affected = self
            .db
            .execute("DELETE FROM quizzes WHERE id = ?", &[Param::Int(quiz_id)])
            .await?;

        if affected > 0 {
            tracing::info!(quiz_id, "Quiz deleted");
        }
        Ok(affected > 0)
    }

    pub async fn delete_question(&self, question_id: i64) -> Result<bool, AppError> {
        let affected = self
            .db
            .execute("DELETE FROM questions WHERE id = ?", &[Param::Int(question_id)])
            .await?;

        if affected > 0 {
            tracing::info!(question_id, "Question deleted");
        }
        Ok(affected > 0)
    }
}

async fn insert_question(
    conn: &mut SqliteConnection,
    quiz_id: i64,
    question: &NewQuestion,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO questions (quiz_id, text, options, correct_option)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(quiz_id)
    .bind(&question.text)
    .bind(Json(&question.options))
    .bind(question.correct_option)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}
