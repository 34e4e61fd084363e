// src/services/ledger.rs

use crate::{
    db::Database,
    error::AppError,
    models::{
        account::Role,
        attempt::{Attempt, LeaderboardEntry},
    },
};

/// Attempt recording, cumulative scores and ranking.
#[derive(Debug, Clone)]
pub struct AttemptLedger {
    db: Database,
}

impl AttemptLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Records a finished attempt in one transaction.
    ///
    /// * Upserts the `(student, quiz)` row, replacing any earlier score.
    /// * Adds `score` to the student's cumulative score.
    ///
    /// The cumulative score is a running sum of every submission, so a
    /// re-attempt counts twice there while the attempt row keeps only the last.
    pub async fn record_attempt(
        &self,
        student_id: i64,
        quiz_id: i64,
        score: u32,
    ) -> Result<(), AppError> {
        let score = i64::from(score);
        let mut tx = self.db.begin().await?;

        // The write comes first so the transaction takes the write lock up front.
        sqlx::query(
            r#"
            INSERT INTO attempts (student_id, quiz_id, score)
            VALUES (?, ?, ?)
            ON CONFLICT(student_id, quiz_id) DO UPDATE SET
                score = excluded.score,
                completed_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(student_id)
        .bind(quiz_id)
        .bind(score)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                tracing::warn!(
                    "Attempt rejected: student {} or quiz {} missing",
                    student_id,
                    quiz_id
                );
                AppError::NotFound(format!("Student {} or quiz {} not found", student_id, quiz_id))
            }
            _ => {
                tracing::error!("Failed to upsert attempt: {:?}", e);
                AppError::from(e)
            }
        })?;

        let updated = sqlx::query("UPDATE accounts SET score = score + ? WHERE id = ? AND role = ?")
            .bind(score)
            .bind(student_id)
            .bind(Role::Student)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update cumulative score: {:?}", e);
                AppError::from(e)
            })?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            tracing::warn!("Attempt rejected: account {} is not a student", student_id);
            return Err(AppError::NotFound(format!("Student {} not found", student_id)));
        }

        tx.commit().await?;

        tracing::info!(student_id, quiz_id, score, "Attempt recorded");
        Ok(())
    }

    /// All students, highest cumulative score first, ties by username.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                id AS student_id,
                username,
                score AS cumulative_score
            FROM accounts
            WHERE role = ?
            ORDER BY score DESC, username ASC
            "#,
        )
        .bind(Role::Student)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch leaderboard: {:?}", e);
            AppError::from(e)
        })?;

        Ok(entries)
    }

    /// 1-based leaderboard position, `None` if the id is not a student.
    pub async fn rank_of(&self, student_id: i64) -> Result<Option<usize>, AppError> {
        let board = self.leaderboard().await?;
        Ok(rank_in(&board, student_id))
    }

    pub async fn cumulative_score(&self, student_id: i64) -> Result<Option<i64>, AppError> {
        let score = sqlx::query_scalar::<_, i64>(
            "SELECT score FROM accounts WHERE id = ? AND role = ?",
        )
        .bind(student_id)
        .bind(Role::Student)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(score)
    }

    /// The student's recorded attempts, oldest first.
    pub async fn attempts_for(&self, student_id: i64) -> Result<Vec<Attempt>, AppError> {
        let attempts = sqlx::query_as::<_, Attempt>(
            r#"
            SELECT
                a.student_id,
                a.quiz_id,
                q.title AS quiz_title,
                a.score,
                a.completed_at
            FROM attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.student_id = ?
            ORDER BY a.completed_at, a.quiz_id
            "#,
        )
        .bind(student_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch attempts: {:?}", e);
            AppError::from(e)
        })?;

        Ok(attempts)
    }
}

/// Position of `student_id` in an already ordered leaderboard.
pub fn rank_in(board: &[LeaderboardEntry], student_id: i64) -> Option<usize> {
    board
        .iter()
        .position(|entry| entry.student_id == student_id)
        .map(|idx| idx + 1)
}
