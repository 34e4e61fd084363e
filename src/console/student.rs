// src/console/student.rs

use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{Console, Flow};
use crate::{models::account::Account, services::ledger::rank_in};

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(crate) async fn student_menu(&mut self, student: &Account) -> io::Result<Flow> {
        loop {
            self.say("\nStudent Menu").await?;
            self.say("1. Take a Quiz").await?;
            self.say("2. View My Score").await?;
            self.say("3. View My Rank").await?;
            self.say("4. View Available Quizzes").await?;
            self.say("5. View My Attempts").await?;
            self.say("6. Logout").await?;

            let Some(choice) = self.ask_choice("Enter your choice: ", 6).await? else {
                return Ok(Flow::Quit);
            };

            let flow = match choice {
                1 => self.take_quiz_flow(student).await?,
                2 => self.show_score(student).await?,
                3 => self.show_rank(student).await?,
                4 => self.list_available_quizzes().await?,
                5 => self.show_attempts(student).await?,
                _ => return Ok(Flow::Continue),
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn take_quiz_flow(&mut self, student: &Account) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };
        if quizzes.is_empty() {
            self.say("No quizzes available at the moment, please check back later.")
                .await?;
            return Ok(Flow::Continue);
        }

        let Some(quiz) = self.pick_quiz(&quizzes, "\nAvailable Quizzes:").await? else {
            return Ok(Flow::Quit);
        };
        if quiz.questions.is_empty() {
            self.say("This quiz has no questions yet.").await?;
            return Ok(Flow::Continue);
        }

        self.say(&format!("\nStarting Quiz: {}", quiz.title)).await?;
        let mut answers = Vec::with_capacity(quiz.questions.len());
        for question in &quiz.questions {
            self.say(&format!("\nQuestion: {}", question.text)).await?;
            for (idx, option) in question.options.iter().enumerate() {
                self.say(&format!("{}. {}", idx + 1, option)).await?;
            }
            let prompt = format!("Your answer (1-{}): ", question.options.len());
            let Some(choice) = self.ask_choice(&prompt, question.options.len()).await? else {
                return Ok(Flow::Quit);
            };
            let choice = choice as i64;

            if question.is_correct(choice) {
                self.say("Correct!").await?;
            } else {
                self.say(&format!(
                    "Incorrect. The correct answer was: {}",
                    question.correct_option
                ))
                .await?;
            }
            answers.push(choice);
        }

        let score = quiz.grade(&answers);
        self.say(&format!(
            "\nQuiz completed! Your score: {}/{}",
            score.correct, score.total
        ))
        .await?;

        if let Err(e) = self
            .state
            .ledger
            .record_attempt(student.id, quiz.id, score.correct)
            .await
        {
            self.say(&format!("Your result could not be saved: {}", e))
                .await?;
        }
        Ok(Flow::Continue)
    }

    async fn show_score(&mut self, student: &Account) -> io::Result<Flow> {
        match self.state.ledger.cumulative_score(student.id).await {
            Ok(Some(score)) => self.say(&format!("\nYour total score: {}", score)).await?,
            Ok(None) => self.say("\nYour student account no longer exists.").await?,
            Err(e) => self.say(&format!("Could not load your score: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    async fn show_rank(&mut self, student: &Account) -> io::Result<Flow> {
        let board = match self.state.ledger.leaderboard().await {
            Ok(board) => board,
            Err(e) => {
                self.say(&format!("Could not load the leaderboard: {}", e))
                    .await?;
                return Ok(Flow::Continue);
            }
        };

        self.say("\n--- Student Leaderboard ---").await?;
        self.say("Rank\tUsername\tScore").await?;
        for (idx, entry) in board.iter().enumerate() {
            self.say(&format!(
                "{}\t{}\t\t{}",
                idx + 1,
                entry.username,
                entry.cumulative_score
            ))
            .await?;
        }

        match rank_in(&board, student.id) {
            Some(rank) => self.say(&format!("\nYour rank is: {}", rank)).await?,
            None => {
                self.say("\nYou are not ranked (no score recorded yet).")
                    .await?
            }
        }
        Ok(Flow::Continue)
    }

    async fn list_available_quizzes(&mut self) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };
        if quizzes.is_empty() {
            self.say("\nNo quizzes are currently available.").await?;
            return Ok(Flow::Continue);
        }

        self.say("\nAvailable Quizzes:").await?;
        for quiz in &quizzes {
            self.show_quiz(quiz).await?;
        }
        Ok(Flow::Continue)
    }

    async fn show_attempts(&mut self, student: &Account) -> io::Result<Flow> {
        let attempts = match self.state.ledger.attempts_for(student.id).await {
            Ok(attempts) => attempts,
            Err(e) => {
                self.say(&format!("Could not load your attempts: {}", e))
                    .await?;
                return Ok(Flow::Continue);
            }
        };

        if attempts.is_empty() {
            self.say("\nYou have not completed any quizzes yet.").await?;
            return Ok(Flow::Continue);
        }

        self.say("\nCompleted Quizzes:").await?;
        for attempt in &attempts {
            self.say(&format!(
                "{} - score {} ({})",
                attempt.quiz_title,
                attempt.score,
                attempt.completed_at.format("%Y-%m-%d %H:%M")
            ))
            .await?;
        }
        Ok(Flow::Continue)
    }
}
