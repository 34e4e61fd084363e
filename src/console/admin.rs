// src/console/admin.rs

use std::io;

use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{Console, Flow};
use crate::models::{
    account::Account,
    question::{MAX_OPTIONS, MIN_OPTIONS, NewQuestion},
    quiz::NewQuiz,
};

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(crate) async fn admin_menu(&mut self, admin: &Account) -> io::Result<Flow> {
        loop {
            self.say("\nAdmin Menu").await?;
            self.say("1. Create Quiz").await?;
            self.say("2. View All Quizzes").await?;
            self.say("3. Delete a Quiz").await?;
            self.say("4. Delete a Question from a Quiz").await?;
            self.say("5. Add Question to Existing Quiz").await?;
            self.say("6. Logout").await?;

            let Some(choice) = self.ask_choice("Enter your choice: ", 6).await? else {
                return Ok(Flow::Quit);
            };

            let flow = match choice {
                1 => self.create_quiz_flow().await?,
                2 => self.view_quizzes_flow().await?,
                3 => self.delete_quiz_flow().await?,
                4 => self.delete_question_flow().await?,
                5 => self.add_question_flow().await?,
                _ => {
                    tracing::info!(id = admin.id, "Administrator logged out");
                    return Ok(Flow::Continue);
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn create_quiz_flow(&mut self) -> io::Result<Flow> {
        let Some(title) = self.ask("Enter quiz title: ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.ask("Enter quiz description: ").await? else {
            return Ok(Flow::Quit);
        };
        let Some(count) = self.ask_count("How many questions? ").await? else {
            return Ok(Flow::Quit);
        };

        let mut quiz = NewQuiz::new(title, description);
        for idx in 0..count {
            let prompt = format!("\nQuestion {}: ", idx + 1);
            let Some(question) = self.read_question(&prompt).await? else {
                return Ok(Flow::Quit);
            };
            quiz = quiz.with_question(question);
        }

        match self.state.catalog.create_quiz(&quiz).await {
            Ok(_) => self.say("Quiz added successfully!").await?,
            Err(e) => self.say(&format!("Failed to add quiz: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    async fn view_quizzes_flow(&mut self) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };

        if quizzes.is_empty() {
            self.say("\nNo quizzes found.").await?;
            return match self
                .ask_yes_no("Would you like to create a new quiz? (y/n): ")
                .await?
            {
                Some(true) => self.create_quiz_flow().await,
                Some(false) => Ok(Flow::Continue),
                None => Ok(Flow::Quit),
            };
        }

        self.say("\nAll Quizzes:").await?;
        for quiz in &quizzes {
            self.show_quiz(quiz).await?;
        }
        Ok(Flow::Continue)
    }

    async fn delete_quiz_flow(&mut self) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };
        if quizzes.is_empty() {
            self.say("No quizzes available to delete.").await?;
            return Ok(Flow::Continue);
        }

        let Some(quiz) = self
            .pick_quiz(&quizzes, "\nSelect a quiz to delete:")
            .await?
        else {
            return Ok(Flow::Quit);
        };

        match self.state.catalog.delete_quiz(quiz.id).await {
            Ok(true) => self.say("Quiz deleted successfully.").await?,
            Ok(false) => self.say("That quiz no longer exists.").await?,
            Err(e) => self.say(&format!("Failed to delete quiz: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    async fn delete_question_flow(&mut self) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };
        if quizzes.is_empty() {
            self.say("No quizzes available.").await?;
            return Ok(Flow::Continue);
        }

        let Some(quiz) = self.pick_quiz(&quizzes, "\nSelect a quiz:").await? else {
            return Ok(Flow::Quit);
        };
        if quiz.questions.is_empty() {
            self.say("No questions in this quiz.").await?;
            return Ok(Flow::Continue);
        }

        self.say("\nSelect a question to delete:").await?;
        for (idx, question) in quiz.questions.iter().enumerate() {
            self.say(&format!("{}. {}", idx + 1, question.text)).await?;
        }
        let prompt = format!("Enter your choice (1-{}): ", quiz.questions.len());
        let Some(choice) = self.ask_choice(&prompt, quiz.questions.len()).await? else {
            return Ok(Flow::Quit);
        };

        let question_id = quiz.questions[choice - 1].id;
        match self.state.catalog.delete_question(question_id).await {
            Ok(true) => self.say("Question deleted successfully.").await?,
            Ok(false) => self.say("That question no longer exists.").await?,
            Err(e) => self.say(&format!("Failed to delete question: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    async fn add_question_flow(&mut self) -> io::Result<Flow> {
        let Some(quizzes) = self.load_quizzes().await? else {
            return Ok(Flow::Continue);
        };
        if quizzes.is_empty() {
            self.say("No quizzes available to add questions to.").await?;
            return Ok(Flow::Continue);
        }

        let Some(quiz) = self
            .pick_quiz(&quizzes, "\nSelect a quiz to add a question to:")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        let quiz_id = quiz.id;

        let Some(question) = self.read_question("\nEnter the question text: ").await? else {
            return Ok(Flow::Quit);
        };

        match self.state.catalog.add_question(quiz_id, &question).await {
            Ok(_) => self.say("Question added successfully!").await?,
            Err(e) => self.say(&format!("Failed to add question: {}", e)).await?,
        }
        Ok(Flow::Continue)
    }

    /// Reads question text, up to four options (blank line ends early) and the answer.
    async fn read_question(&mut self, prompt: &str) -> io::Result<Option<NewQuestion>> {
        let Some(text) = self.ask(prompt).await? else {
            return Ok(None);
        };

        let options = loop {
            let mut options = Vec::with_capacity(MAX_OPTIONS);
            while options.len() < MAX_OPTIONS {
                let Some(option) = self
                    .ask(&format!("Option {}: ", options.len() + 1))
                    .await?
                else {
                    return Ok(None);
                };
                if option.trim().is_empty() {
                    break;
                }
                options.push(option);
            }
            if options.len() >= MIN_OPTIONS {
                break options;
            }
            self.say(&format!("A question needs at least {} options.", MIN_OPTIONS))
                .await?;
        };

        let prompt = format!("Correct option (1-{}): ", options.len());
        let Some(correct) = self.ask_choice(&prompt, options.len()).await? else {
            return Ok(None);
        };

        Ok(Some(NewQuestion {
            text,
            options,
            correct_option: correct as i64,
        }))
    }
}
