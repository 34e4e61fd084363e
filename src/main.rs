// src/main.rs

use std::process::ExitCode;

use linquiz::config::Config;
use linquiz::{AppState, Console, Database};
use tokio::io::BufReader;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "linquiz.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    // Menus own stdout; only warnings reach the terminal.
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // No persistence, no program. Return, never exit: `_guard` must drop to flush.
    let db = match Database::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Startup aborted: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = db.migrate().await {
        tracing::error!("Startup aborted: {}", e);
        db.close().await;
        return ExitCode::FAILURE;
    }

    let state = AppState::new(db.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(state, stdin, tokio::io::stdout());
    let code = match console.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Console I/O failed: {}", e);
            ExitCode::FAILURE
        }
    };

    db.close().await;
    code
}
