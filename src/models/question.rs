// src/models/question.rs

use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Question {
    pub id: i64,

    pub quiz_id: i64,

    pub text: String,

    /// Ordered choices, stored as a JSON array.
    #[sqlx(json)]
    pub options: Vec<String>,

    /// 1-based index into `options`.
    pub correct_option: i64,
}

impl Question {
    /// Compares a 1-based choice against the correct option.
    pub fn is_correct(&self, choice: i64) -> bool {
        choice == self.correct_option
    }
}

/// DTO for authoring a question.
#[derive(Debug, Clone, Validate)]
pub struct NewQuestion {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(
        length(
            min = 2,
            max = 4,
            message = "A question needs between 2 and 4 options."
        ),
        custom(function = validate_options)
    )]
    pub options: Vec<String>,
    pub correct_option: i64,
}

impl NewQuestion {
    pub fn new<S: Into<String>>(
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct_option: i64,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option,
        }
    }

    /// Field validation plus the `1 <= correct_option <= options.len()` range check.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        let count = self.options.len() as i64;
        if self.correct_option < 1 || self.correct_option > count {
            return Err(AppError::ValidationFailure(format!(
                "correct option must be between 1 and {}, got {}",
                count, self.correct_option
            )));
        }
        Ok(())
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_blank"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
