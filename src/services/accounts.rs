// src/services/accounts.rs

use sqlx::FromRow;

use crate::{
    db::{Database, Param},
    error::AppError,
    models::account::{Account, LoginOutcome, NewAccount, Role, RoleDeletion, RoleEntry},
};

/// Registration, credential checks and role enumeration.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    db: Database,
}

impl AccountDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a new identity.
    ///
    /// Fails with `DuplicateIdentity` if the `(username, role)` pair exists.
    /// The same username under the other role is always allowed.
    pub async fn register(&self, payload: &NewAccount) -> Result<Account, AppError> {
        payload.check()?;

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (username, credential, role)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&payload.username)
        .bind(&payload.credential)
        .bind(payload.role)
        .execute(self.db.pool())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!(
                    "Duplicate registration for '{}' as {}",
                    payload.username,
                    payload.role
                );
                AppError::DuplicateIdentity {
                    username: payload.username.clone(),
                    role: payload.role,
                }
            }
            _ => {
                tracing::error!("Failed to register account: {:?}", e);
                AppError::from(e)
            }
        })?;

        let account = Account {
            id: result.last_insert_rowid(),
            username: payload.username.clone(),
            role: payload.role,
        };
        tracing::info!(id = account.id, role = %account.role, "Account registered");
        Ok(account)
    }

    /// True iff some account matches both fields exactly.
    pub async fn verify_credential(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<bool, AppError> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ? AND credential = ?)",
        )
        .bind(username)
        .bind(credential)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            tracing::error!("Credential check failed: {:?}", e);
            AppError::from(e)
        })?;

        Ok(found)
    }

    /// Every role registered under `username`, regardless of credential.
    pub async fn roles_for(&self, username: &str) -> Result<Vec<RoleEntry>, AppError> {
        let rows = self
            .db
            .query(
                "SELECT id, role FROM accounts WHERE username = ? ORDER BY id",
                &[Param::from(username)],
            )
            .await?;

        rows.iter()
            .map(|row| RoleEntry::from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Roles under `username` whose credential also matches.
    pub async fn roles_for_credential(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<Vec<RoleEntry>, AppError> {
        let rows = self
            .db
            .query(
                "SELECT id, role FROM accounts WHERE username = ? AND credential = ? ORDER BY id",
                &[Param::from(username), Param::from(credential)],
            )
            .await?;

        rows.iter()
            .map(|row| RoleEntry::from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Verify first, then enumerate the credential-proven roles.
    ///
    /// Unknown usernames and wrong credentials are both `Rejected`.
    pub async fn login(&self, username: &str, credential: &str) -> Result<LoginOutcome, AppError> {
        if !self.verify_credential(username, credential).await? {
            tracing::warn!("Rejected login attempt");
            return Ok(LoginOutcome::Rejected);
        }

        let mut roles = self.roles_for_credential(username, credential).await?;
        let outcome = match roles.len() {
            // Deleted by another session between the two reads.
            0 => LoginOutcome::Rejected,
            1 => {
                let entry = roles.remove(0);
                LoginOutcome::Established(establish(username, &entry))
            }
            _ => LoginOutcome::ChooseRole(roles),
        };
        Ok(outcome)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, role FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| {
            tracing::error!("Failed to load account {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(account)
    }

    /// Deletes exactly one identity. `false` if the `(id, role)` pair did not match.
    pub async fn delete_account(&self, id: i64, role: Role) -> Result<bool, AppError> {
        let affected = self
            .db
            .execute(
                "DELETE FROM accounts WHERE id = ? AND role = ?",
                &[Param::Int(id), Param::from(role.code())],
            )
            .await?;

        if affected == 0 {
            tracing::warn!(id, role = %role, "No account matched deletion");
            return Ok(false);
        }
        tracing::info!(id, role = %role, "Account deleted");
        Ok(true)
    }

    /// Deletes each identity independently and reports every outcome.
    pub async fn delete_identities(&self, entries: &[RoleEntry]) -> Vec<RoleDeletion> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let outcome = self.delete_account(entry.id, entry.role).await;
            results.push(RoleDeletion {
                entry: *entry,
                outcome,
            });
        }
        results
    }
}

/// Turns a selected role entry into an established identity.
pub fn establish(username: &str, entry: &RoleEntry) -> Account {
    Account {
        id: entry.id,
        username: username.to_string(),
        role: entry.role,
    }
}
