// src/console/mod.rs

//! Interactive text front end.
//!
//! Collects input, calls the core services on [`AppState`] and prints the
//! results. Generic over the line source and sink so scripted sessions can
//! drive it in tests.

mod account;
mod admin;
mod student;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{models::quiz::Quiz, state::AppState};

/// Whether the session should keep going after a menu returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub struct Console<R, W> {
    state: AppState,
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Main menu loop. Returns when the user exits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.say("\nWelcome to LINQUIZ!").await?;
            self.say("1. Login").await?;
            self.say("2. Register").await?;
            self.say("3. Delete My Account").await?;
            self.say("4. Exit").await?;

            let Some(choice) = self.ask_choice("Enter your choice: ", 4).await? else {
                break;
            };

            let flow = match choice {
                1 => self.login_flow().await?,
                2 => self.register_flow().await?,
                3 => self.delete_account_flow().await?,
                _ => Flow::Quit,
            };

            if flow == Flow::Quit {
                break;
            }
        }

        self.say("Goodbye!").await?;
        self.output.flush().await
    }

    pub(crate) async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await
    }

    /// Prints `prompt` and reads one line without its terminator. `None` on end of input.
    pub(crate) async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    /// Asks until the answer is a number in `1..=max`.
    pub(crate) async fn ask_choice(
        &mut self,
        prompt: &str,
        max: usize,
    ) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(prompt).await? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                _ => {
                    self.say(&format!(
                        "Invalid input. Please enter a number between 1 and {}.",
                        max
                    ))
                    .await?
                }
            }
        }
    }

    /// Asks until the answer is a non-negative number.
    pub(crate) async fn ask_count(&mut self, prompt: &str) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(prompt).await? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("Please enter a whole number.").await?,
            }
        }
    }

    /// `Some(true)` for y/Y, `Some(false)` for anything else.
    pub(crate) async fn ask_yes_no(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        let answer = self.ask(prompt).await?;
        Ok(answer.map(|a| a.trim().eq_ignore_ascii_case("y")))
    }

    /// Lists titles and lets the user pick one quiz.
    pub(crate) async fn pick_quiz<'a>(
        &mut self,
        quizzes: &'a [Quiz],
        heading: &str,
    ) -> io::Result<Option<&'a Quiz>> {
        self.say(heading).await?;
        for (idx, quiz) in quizzes.iter().enumerate() {
            self.say(&format!("{}. {}", idx + 1, quiz.title)).await?;
        }
        let prompt = format!("Enter your choice (1-{}): ", quizzes.len());
        let choice = self.ask_choice(&prompt, quizzes.len()).await?;
        Ok(choice.map(|n| &quizzes[n - 1]))
    }

    pub(crate) async fn show_quiz(&mut self, quiz: &Quiz) -> io::Result<()> {
        self.say(&format!("\nQuiz: {}", quiz.title)).await?;
        self.say(&format!("Description: {}", quiz.description)).await?;
        self.say(&format!("Number of Questions: {}", quiz.questions.len()))
            .await
    }

    /// Loads all quizzes, printing the error instead of failing the session.
    /// A transient store failure is retried once.
    pub(crate) async fn load_quizzes(&mut self) -> io::Result<Option<Vec<Quiz>>> {
        let result = match self.state.catalog.list_quizzes().await {
            Err(e) if e.is_transient() => {
                tracing::warn!("Listing quizzes failed, retrying once: {}", e);
                self.state.catalog.list_quizzes().await
            }
            other => other,
        };

        match result {
            Ok(quizzes) => Ok(Some(quizzes)),
            Err(e) => {
                self.say(&format!("Could not load quizzes: {}", e)).await?;
                Ok(None)
            }
        }
    }
}
