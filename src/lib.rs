// src/lib.rs

pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use console::Console;
pub use db::Database;
pub use error::AppError;
pub use state::AppState;
