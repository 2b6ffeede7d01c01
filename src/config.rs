use std::path::PathBuf;

/// Default SQLite file next to the process working directory; created on
/// first connect.
const DEFAULT_DATABASE_URL: &str = "sqlite://budgetwise.db?mode=rwc";
/// Directory for regenerable model artifacts (trained categorizer).
const DEFAULT_MODEL_DIR: &str = "ai_models";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub model_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let model_dir = std::env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR));
        Self {
            database_url,
            model_dir,
        }
    }
}
