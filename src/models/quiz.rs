// src/models/quiz.rs

use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, models::question::{NewQuestion, Question}};

/// Represents the 'quizzes' table, with its questions in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// Minutes. Recorded but not enforced anywhere.
    pub time_limit: Option<i64>,

    #[sqlx(skip)]
    pub questions: Vec<Question>,
}

/// Outcome of one run through a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Quiz {
    /// Grades 1-based answers against the questions in order.
    ///
    /// A missing answer counts as wrong; surplus answers are ignored.
    pub fn grade(&self, answers: &[i64]) -> Score {
        let correct = self
            .questions
            .iter()
            .zip(answers.iter())
            .filter(|(question, choice)| question.is_correct(**choice))
            .count();

        Score {
            correct: correct as u32,
            total: self.questions.len() as u32,
        }
    }
}

/// DTO for authoring a quiz together with its initial questions.
#[derive(Debug, Clone, Validate)]
pub struct NewQuiz {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 characters."
    ))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(range(min = 1))]
    pub time_limit: Option<i64>,
    pub questions: Vec<NewQuestion>,
}

impl NewQuiz {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            time_limit: None,
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: NewQuestion) -> Self {
        self.questions.push(question);
        self
    }

    /// Validates the quiz and every question before anything is written.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        for (idx, question) in self.questions.iter().enumerate() {
            question.check().map_err(|e| match e {
                AppError::ValidationFailure(msg) => {
                    AppError::ValidationFailure(format!("question {}: {}", idx + 1, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
