// src/console/account.rs

use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{Console, Flow};
use crate::{
    error::AppError,
    models::account::{LoginOutcome, NewAccount, Role},
    services::accounts::establish,
};

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(crate) async fn login_flow(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Username: ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.ask("Password: ").await? else {
            return Ok(Flow::Quit);
        };

        let outcome = match self.state.accounts.login(&username, &password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.say(&format!("\nLogin failed: {}", e)).await?;
                return Ok(Flow::Continue);
            }
        };

        let account = match outcome {
            LoginOutcome::Rejected => {
                self.say("\nInvalid username or password.").await?;
                return Ok(Flow::Continue);
            }
            LoginOutcome::Established(account) => account,
            LoginOutcome::ChooseRole(roles) => {
                self.say("\nMultiple roles available:").await?;
                for (idx, entry) in roles.iter().enumerate() {
                    self.say(&format!("{}. Login as {}", idx + 1, entry.role))
                        .await?;
                }
                let prompt = format!("Select role (1-{}): ", roles.len());
                let Some(choice) = self.ask_choice(&prompt, roles.len()).await? else {
                    return Ok(Flow::Quit);
                };
                establish(&username, &roles[choice - 1])
            }
        };

        self.say(&format!(
            "\nLogin successful! Welcome, {} ({}).",
            account.username, account.role
        ))
        .await?;

        if account.role.can_author() {
            self.admin_menu(&account).await
        } else {
            self.student_menu(&account).await
        }
    }

    pub(crate) async fn register_flow(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Username: ").await? else {
            return Ok(Flow::Quit);
        };

        let password = loop {
            let Some(password) = self.ask("Password: ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(confirm) = self.ask("Confirm Password: ").await? else {
                return Ok(Flow::Quit);
            };
            if password == confirm {
                break password;
            }
            self.say("\nPasswords do not match. Please try again.").await?;
        };

        self.say("\nSelect your role:").await?;
        self.say("1. Student").await?;
        self.say("2. Admin").await?;
        let Some(choice) = self.ask_choice("Enter your choice (1-2): ", 2).await? else {
            return Ok(Flow::Quit);
        };
        let role = if choice == 1 {
            Role::Student
        } else {
            Role::Administrator
        };

        let payload = NewAccount::new(username, password, role);
        match self.state.accounts.register(&payload).await {
            Ok(_) => self.say("\nRegistration successful! Please login.").await?,
            Err(AppError::DuplicateIdentity { .. }) => {
                self.say("\nRegistration failed (username already exists for this role).")
                    .await?;
                self.say("Note: You can register the same username for different roles.")
                    .await?;
            }
            Err(e) => self.say(&format!("\nRegistration failed: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    pub(crate) async fn delete_account_flow(&mut self) -> io::Result<Flow> {
        self.say("\n=== Delete Account ===").await?;
        let Some(username) = self
            .ask("Enter your username (or 'cancel' to exit): ")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        if username == "cancel" {
            return Ok(Flow::Continue);
        }

        match self.state.accounts.roles_for(&username).await {
            Ok(roles) if roles.is_empty() => {
                self.say("No account found for this username.").await?;
                return Ok(Flow::Continue);
            }
            Ok(_) => {}
            Err(e) => {
                self.say(&format!("Could not look up account: {}", e)).await?;
                return Ok(Flow::Continue);
            }
        }

        self.say("\nEnter your password to proceed or type 'cancel' to exit.")
            .await?;
        let roles = loop {
            let Some(password) = self.ask("Password: ").await? else {
                return Ok(Flow::Quit);
            };
            if password == "cancel" {
                return Ok(Flow::Continue);
            }
            match self
                .state
                .accounts
                .roles_for_credential(&username, &password)
                .await
            {
                Ok(roles) if !roles.is_empty() => break roles,
                Ok(_) => {
                    self.say("Incorrect password. Try again or type 'cancel' to exit.")
                        .await?
                }
                Err(e) => {
                    self.say(&format!("Could not verify password: {}", e)).await?;
                    return Ok(Flow::Continue);
                }
            }
        };

        let targets = if roles.len() > 1 {
            self.say("\nYou have multiple roles:").await?;
            for (idx, entry) in roles.iter().enumerate() {
                self.say(&format!("{}. {}", idx + 1, entry.role)).await?;
            }
            self.say(&format!("{}. Delete ALL roles", roles.len() + 1))
                .await?;
            self.say(&format!("{}. Cancel", roles.len() + 2)).await?;

            let Some(choice) = self.ask_choice("Choose option: ", roles.len() + 2).await? else {
                return Ok(Flow::Quit);
            };
            if choice == roles.len() + 2 {
                return Ok(Flow::Continue);
            }
            if choice == roles.len() + 1 {
                roles
            } else {
                vec![roles[choice - 1]]
            }
        } else {
            let prompt = format!("Confirm delete your '{}' account? (y/n): ", roles[0].role);
            match self.ask_yes_no(&prompt).await? {
                Some(true) => roles,
                Some(false) => return Ok(Flow::Continue),
                None => return Ok(Flow::Quit),
            }
        };

        for result in self.state.accounts.delete_identities(&targets).await {
            let line = match &result.outcome {
                Ok(true) => format!("Role '{}' deleted.", result.entry.role),
                Ok(false) => format!("Role '{}' was already gone.", result.entry.role),
                Err(e) => format!("Failed to delete role '{}': {}", result.entry.role, e),
            };
            self.say(&line).await?;
        }
        Ok(Flow::Continue)
    }
}
