use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::ai::{
    anomaly::IsolationForestDetector, categorizer::Categorizer, embedding::HashedEmbedder,
    AnomalyModel, CategoryModel, Embedder,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub categorizer: Arc<dyn CategoryModel>,
    pub detector: Arc<dyn AnomalyModel>,
    pub embedder: Arc<dyn Embedder>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Oracles are process-wide; the categorizer trains (or loads its
        // cached artifacts) lazily on first use.
        let categorizer = Arc::new(Categorizer::new(config.model_dir.clone()));
        let detector = Arc::new(IsolationForestDetector::default());
        let embedder = Arc::new(HashedEmbedder::default());

        Ok(Self::from_parts(db, config, categorizer, detector, embedder))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        categorizer: Arc<dyn CategoryModel>,
        detector: Arc<dyn AnomalyModel>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            db,
            config,
            categorizer,
            detector,
            embedder,
        }
    }
}
