// src/services/mod.rs

pub mod accounts;
pub mod catalog;
pub mod ledger;

pub use accounts::AccountDirectory;
pub use catalog::QuizCatalog;
pub use ledger::AttemptLedger;
