#![allow(dead_code)]

use linquiz::{AppState, Database, config::Config};

/// Fresh store in its own temp file, schema applied.
pub async fn spawn_state() -> AppState {
    let path = std::env::temp_dir().join(format!("linquiz_test_{}.db", uuid::Uuid::new_v4()));

    let config = Config {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        rust_log: "error".to_string(),
        acquire_timeout_secs: 5,
        connect_retries: 0,
        retry_delay_secs: 0,
        ..Config::default()
    };

    let db = Database::connect(&config)
        .await
        .expect("Failed to open test database");
    db.migrate().await.expect("Failed to migrate database");

    AppState::new(db)
}

pub async fn count(state: &AppState, sql: &str, id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_one(state.db.pool())
        .await
        .unwrap()
}
