// src/models/attempt.rs

use sqlx::FromRow;

/// Represents one row of the 'attempts' table, joined with the quiz title.
/// At most one row exists per (student, quiz); re-attempts overwrite the score.
#[derive(Debug, Clone, FromRow)]
pub struct Attempt {
    pub student_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub completed_at: chrono::NaiveDateTime,
}

/// One leaderboard line, ordered by score descending then username ascending.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LeaderboardEntry {
    pub student_id: i64,
    pub username: String,
    pub cumulative_score: i64,
}
