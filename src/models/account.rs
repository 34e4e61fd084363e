// src/models/account.rs

use std::fmt;

use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Account role, stored as 'admin' or 'student'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Authors quizzes and questions.
    #[sqlx(rename = "admin")]
    Administrator,
    /// Takes quizzes and accrues a cumulative score.
    Student,
}

impl Role {
    /// Value stored in the `role` column.
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Student => "student",
        }
    }

    pub const fn can_author(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    pub const fn can_take_quizzes(&self) -> bool {
        matches!(self, Role::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => f.write_str("administrator"),
            Role::Student => f.write_str("student"),
        }
    }
}

/// One established identity. The credential never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// An `(id, role)` pair registered under some username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct RoleEntry {
    pub id: i64,
    pub role: Role,
}

/// DTO for registering a new identity.
#[derive(Debug, Clone, Validate)]
pub struct NewAccount {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username length must be between 1 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Password length must be between 1 and 100 characters."
    ))]
    pub credential: String,
    pub role: Role,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, credential: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
            role,
        }
    }

    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        Ok(())
    }
}

/// Result of the verify-then-enumerate login protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Unknown username or wrong credential. Deliberately says nothing more.
    Rejected,
    /// Exactly one role matched; the identity is established.
    Established(Account),
    /// Several roles exist; the caller must pick one and call `establish`.
    ChooseRole(Vec<RoleEntry>),
}

/// Outcome of deleting one identity in a multi-role deletion.
#[derive(Debug)]
pub struct RoleDeletion {
    pub entry: RoleEntry,
    /// `Ok(false)` when no row matched the `(id, role)` pair.
    pub outcome: Result<bool, AppError>,
}

impl RoleDeletion {
    pub fn deleted(&self) -> bool {
        matches!(self.outcome, Ok(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_match_stored_values() {
        assert_eq!(Role::Administrator.code(), "admin");
        assert_eq!(Role::Student.code(), "student");
        assert_eq!(Role::Administrator.to_string(), "administrator");
    }

    #[test]
    fn capabilities_follow_role() {
        assert!(Role::Administrator.can_author());
        assert!(!Role::Administrator.can_take_quizzes());
        assert!(Role::Student.can_take_quizzes());
        assert!(!Role::Student.can_author());
    }

    #[test]
    fn empty_username_is_rejected() {
        let err = NewAccount::new("", "pw", Role::Student).check().unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
    }

    #[test]
    fn overlong_credential_is_rejected() {
        let account = NewAccount::new("bob", "x".repeat(101), Role::Student);
        assert!(account.check().is_err());
    }

    #[test]
    fn credential_is_not_normalized_or_policed() {
        assert!(NewAccount::new("bob", " a ", Role::Administrator).check().is_ok());
    }
}
