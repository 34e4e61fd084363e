// tests/catalog_tests.rs

mod common;

use common::{count, spawn_state};
use linquiz::{
    AppError,
    db::Param,
    models::{
        account::{NewAccount, Role},
        question::NewQuestion,
        quiz::NewQuiz,
    },
};

fn geography() -> NewQuiz {
    NewQuiz::new("Geo", "Capitals")
        .with_question(NewQuestion::new("Capital of France?", ["Paris", "Rome"], 1))
        .with_question(NewQuestion::new(
            "Capital of Japan?",
            ["Seoul", "Beijing", "Tokyo", "Bangkok"],
            3,
        ))
}

#[tokio::test]
async fn created_quiz_lists_with_questions_in_order() {
    let state = spawn_state().await;

    let quiz_id = state.catalog.create_quiz(&geography()).await.unwrap();
    let quizzes = state.catalog.list_quizzes().await.unwrap();

    assert_eq!(quizzes.len(), 1);
    let quiz = &quizzes[0];
    assert_eq!(quiz.id, quiz_id);
    assert_eq!(quiz.title, "Geo");
    assert_eq!(quiz.description, "Capitals");
    assert_eq!(quiz.time_limit, None);
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[0].text, "Capital of France?");
    assert_eq!(quiz.questions[1].options, vec!["Seoul", "Beijing", "Tokyo", "Bangkok"]);
    assert_eq!(quiz.questions[1].correct_option, 3);
    assert!(quiz.questions.iter().all(|q| q.quiz_id == quiz_id));
}

#[tokio::test]
async fn quizzes_without_questions_are_listed_empty() {
    let state = spawn_state().await;
    state.catalog.create_quiz(&NewQuiz::new("Empty", "")).await.unwrap();
    state.catalog.create_quiz(&geography()).await.unwrap();

    let quizzes = state.catalog.list_quizzes().await.unwrap();
    assert_eq!(quizzes.len(), 2);
    assert!(quizzes[0].questions.is_empty());
    assert_eq!(quizzes[1].questions.len(), 2);
}

#[tokio::test]
async fn invalid_question_aborts_quiz_creation() {
    let state = spawn_state().await;
    let quiz = geography().with_question(NewQuestion::new("Broken", ["a", "b"], 3));

    let err = state.catalog.create_quiz(&quiz).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationFailure(_)));
    assert!(state.catalog.list_quizzes().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_question_rejects_out_of_range_answer() {
    let state = spawn_state().await;
    let quiz_id = state.catalog.create_quiz(&NewQuiz::new("Q", "")).await.unwrap();

    for correct in [0, 3] {
        let err = state
            .catalog
            .add_question(quiz_id, &NewQuestion::new("q", ["a", "b"], correct))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
    }

    let err = state
        .catalog
        .add_question(quiz_id, &NewQuestion::new("q", ["only"], 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailure(_)));

    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM questions WHERE quiz_id = ?", quiz_id).await,
        0
    );
}

#[tokio::test]
async fn add_question_appends_to_existing_quiz() {
    let state = spawn_state().await;
    let quiz_id = state.catalog.create_quiz(&geography()).await.unwrap();

    let question_id = state
        .catalog
        .add_question(quiz_id, &NewQuestion::new("2 + 2?", ["3", "4", "5"], 2))
        .await
        .unwrap();

    let quiz = state.catalog.find_quiz(quiz_id).await.unwrap().unwrap();
    assert_eq!(quiz.questions.len(), 3);
    assert_eq!(quiz.questions[2].id, question_id);
    assert!(quiz.questions[2].is_correct(2));
}

#[tokio::test]
async fn add_question_to_missing_quiz_is_not_found() {
    let state = spawn_state().await;

    let err = state
        .catalog
        .add_question(999, &NewQuestion::new("q", ["a", "b"], 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_quiz_cascades_to_questions_and_attempts_only() {
    let state = spawn_state().await;
    let doomed = state.catalog.create_quiz(&geography()).await.unwrap();
    let kept = state.catalog.create_quiz(&geography()).await.unwrap();
    let student = state
        .accounts
        .register(&NewAccount::new("bob", "pw", Role::Student))
        .await
        .unwrap();

    state.ledger.record_attempt(student.id, doomed, 2).await.unwrap();
    state.ledger.record_attempt(student.id, kept, 1).await.unwrap();

    assert!(state.catalog.delete_quiz(doomed).await.unwrap());

    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM questions WHERE quiz_id = ?", doomed).await,
        0
    );
    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM attempts WHERE quiz_id = ?", doomed).await,
        0
    );
    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM questions WHERE quiz_id = ?", kept).await,
        2
    );
    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM attempts WHERE quiz_id = ?", kept).await,
        1
    );
    assert_eq!(state.accounts.find(student.id).await.unwrap(), Some(student.clone()));
    // Cumulative score is not rolled back by the cascade.
    assert_eq!(state.ledger.cumulative_score(student.id).await.unwrap(), Some(3));

    assert!(!state.catalog.delete_quiz(doomed).await.unwrap());
    assert!(state.catalog.find_quiz(doomed).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_question_removes_only_that_question() {
    let state = spawn_state().await;
    let quiz_id = state.catalog.create_quiz(&geography()).await.unwrap();
    let quiz = state.catalog.find_quiz(quiz_id).await.unwrap().unwrap();

    assert!(state.catalog.delete_question(quiz.questions[0].id).await.unwrap());
    assert!(!state.catalog.delete_question(quiz.questions[0].id).await.unwrap());

    let quiz = state.catalog.find_quiz(quiz_id).await.unwrap().unwrap();
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].text, "Capital of Japan?");
}

#[tokio::test]
async fn time_limit_is_stored() {
    let state = spawn_state().await;
    let mut quiz = NewQuiz::new("Timed", "");
    quiz.time_limit = Some(15);

    let quiz_id = state.catalog.create_quiz(&quiz).await.unwrap();
    let stored = state.catalog.find_quiz(quiz_id).await.unwrap().unwrap();
    assert_eq!(stored.time_limit, Some(15));
}

#[tokio::test]
async fn store_failure_mid_creation_leaves_no_quiz_behind() {
    let state = spawn_state().await;
    sqlx::query(
        r#"
        CREATE TRIGGER refuse_japan BEFORE INSERT ON questions
        WHEN NEW.text = 'Capital of Japan?'
        BEGIN
            SELECT RAISE(ABORT, 'question refused');
        END
        "#,
    )
    .execute(state.db.pool())
    .await
    .unwrap();

    // Both questions pass validation; the second one fails inside the store.
    let err = state.catalog.create_quiz(&geography()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    for table in ["quizzes", "questions"] {
        let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(state.db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0, "{} should be empty", table);
    }
}

#[tokio::test]
async fn schema_check_rejection_is_a_constraint_violation() {
    let state = spawn_state().await;
    let quiz_id = state.catalog.create_quiz(&NewQuiz::new("Q", "")).await.unwrap();

    let err = state
        .db
        .execute(
            "INSERT INTO questions (quiz_id, text, options, correct_option) VALUES (?, ?, ?, ?)",
            &[
                Param::Int(quiz_id),
                Param::from("q"),
                Param::from(r#"["a","b"]"#),
                Param::Int(9),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)));

    let student = state
        .accounts
        .register(&NewAccount::new("bob", "pw", Role::Student))
        .await
        .unwrap();
    let err = state
        .db
        .execute("UPDATE accounts SET score = -1 WHERE id = ?", &[Param::Int(student.id)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)));
    assert_eq!(state.ledger.cumulative_score(student.id).await.unwrap(), Some(0));

    assert_eq!(
        count(&state, "SELECT COUNT(*) FROM questions WHERE quiz_id = ?", quiz_id).await,
        0
    );
}
