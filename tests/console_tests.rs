// tests/console_tests.rs

mod common;

use common::spawn_state;
use linquiz::{
    AppState, Console,
    models::account::{NewAccount, Role},
};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

async fn run_script(state: &AppState, script: &str) -> String {
    let mut console = Console::new(state.clone(), script.as_bytes(), Vec::new());
    console.run().await.expect("console I/O failed");
    String::from_utf8(console.into_output()).unwrap()
}

#[tokio::test]
async fn admin_authors_and_student_takes_quiz() {
    let state = spawn_state().await;

    let script = [
        // Register an administrator and a student.
        "2", "ann", "pw", "pw", "2",
        "2", "bob", "pw", "pw", "1",
        // Admin creates a one-question quiz, then logs out.
        "1", "ann", "pw",
        "1", "Geo", "Capitals", "1",
        "Capital of France?", "Paris", "Rome", "", "1",
        "6",
        // Student takes it, checks score and rank, logs out.
        "1", "bob", "pw",
        "1", "1", "1",
        "2",
        "3",
        "6",
        "4",
    ]
    .join("\n")
        + "\n";

    let output = run_script(&state, &script).await;

    assert!(output.contains("Registration successful! Please login."));
    assert!(output.contains("Welcome, ann (administrator)"));
    assert!(output.contains("Quiz added successfully!"));
    assert!(output.contains("Welcome, bob (student)"));
    assert!(output.contains("Correct!"));
    assert!(output.contains("Quiz completed! Your score: 1/1"));
    assert!(output.contains("Your total score: 1"));
    assert!(output.contains("Your rank is: 1"));
    assert!(output.ends_with("Goodbye!\n"));

    let board = state.ledger.leaderboard().await.unwrap();
    assert_eq!(board[0].username, "bob");
    assert_eq!(board[0].cumulative_score, 1);
}

#[tokio::test]
async fn wrong_password_is_reported_without_detail() {
    let state = spawn_state().await;
    let script = "2\nbob\npw\npw\n1\n1\nbob\nnope\n4\n";

    let output = run_script(&state, script).await;
    assert!(output.contains("Invalid username or password."));
}

#[tokio::test]
async fn duplicate_registration_is_explained() {
    let state = spawn_state().await;
    let script = "2\nbob\npw\npw\n1\n2\nbob\nx\nx\n1\n4\n";

    let output = run_script(&state, script).await;
    assert!(output.contains("Registration failed (username already exists for this role)."));
}

#[tokio::test]
async fn multi_role_user_picks_role_and_deletes_all() {
    let state = spawn_state().await;
    let script = [
        "2", "cat", "pw", "pw", "1",
        "2", "cat", "pw", "pw", "2",
        // Login offers both roles; pick the student one.
        "1", "cat", "pw", "1", "6",
        // Delete every role.
        "3", "cat", "wrong", "pw", "3",
        "4",
    ]
    .join("\n")
        + "\n";

    let output = run_script(&state, &script).await;
    assert!(output.contains("Multiple roles available:"));
    assert!(output.contains("Welcome, cat (student)"));
    assert!(output.contains("Incorrect password."));
    assert!(output.contains("Role 'student' deleted."));
    assert!(output.contains("Role 'administrator' deleted."));
    assert!(state.accounts.roles_for("cat").await.unwrap().is_empty());
}

#[tokio::test]
async fn end_of_input_exits_cleanly() {
    let state = spawn_state().await;
    let output = run_script(&state, "1\nbob\n").await;
    assert!(output.ends_with("Goodbye!\n"));
}

#[tokio::test]
async fn store_lost_mid_session_is_reported_and_session_continues() {
    let state = spawn_state().await;
    state
        .accounts
        .register(&NewAccount::new("bob", "pw", Role::Student))
        .await
        .unwrap();

    let (mut keyboard, input) = tokio::io::duplex(1024);
    let (output, mut screen) = tokio::io::duplex(64 * 1024);
    let session_state = state.clone();
    let session = tokio::spawn(async move {
        Console::new(session_state, BufReader::new(input), output)
            .run()
            .await
    });

    keyboard.write_all(b"1\nbob\npw\n").await.unwrap();
    let mut seen = String::new();
    while !seen.contains("6. Logout\nEnter your choice: ") {
        let mut buf = [0u8; 1024];
        let n = screen.read(&mut buf).await.unwrap();
        assert!(n > 0, "session ended before the student menu: {}", seen);
        seen.push_str(&String::from_utf8_lossy(&buf[..n]));
    }

    state.db.close().await;
    keyboard.write_all(b"4\n6\n4\n").await.unwrap();
    drop(keyboard);

    session.await.unwrap().expect("console I/O failed");
    let mut rest = String::new();
    screen.read_to_string(&mut rest).await.unwrap();
    assert!(rest.contains("Could not load quizzes: connection failure"));
    assert!(rest.ends_with("Goodbye!\n"));
}
