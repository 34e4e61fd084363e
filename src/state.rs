use crate::{
    db::Database,
    services::{AccountDirectory, AttemptLedger, QuizCatalog},
};

/// Everything the presentation layer needs, built once from one store handle.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub accounts: AccountDirectory,
    pub catalog: QuizCatalog,
    pub ledger: AttemptLedger,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            accounts: AccountDirectory::new(db.clone()),
            catalog: QuizCatalog::new(db.clone()),
            ledger: AttemptLedger::new(db.clone()),
            db,
        }
    }
}
