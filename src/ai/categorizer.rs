//! Expense category prediction.
//!
//! A TF-IDF vectorizer feeding a nearest-centroid linear classifier, trained
//! on a small fixed corpus. Trained artifacts are cached on disk as JSON and
//! rebuilt whenever the cache file is missing; they are derived state, never
//! authoritative.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::info;

use super::{l2_normalize, tokens, CategoryModel};

const ARTIFACT_FILE: &str = "category_model.json";

/// Fixed labeled corpus covering the five supported categories.
const TRAINING_SET: &[(&str, &str)] = &[
    ("pizza", "Food"),
    ("burger", "Food"),
    ("milk", "Food"),
    ("vegetables", "Food"),
    ("grocery", "Food"),
    ("uber", "Travel"),
    ("ola", "Travel"),
    ("petrol", "Travel"),
    ("bus", "Travel"),
    ("train ticket", "Travel"),
    ("movie", "Entertainment"),
    ("netflix", "Entertainment"),
    ("concert", "Entertainment"),
    ("games", "Entertainment"),
    ("electricity bill", "Bills"),
    ("water bill", "Bills"),
    ("mobile recharge", "Bills"),
    ("t-shirt", "Shopping"),
    ("shoes", "Shopping"),
    ("shopping mall", "Shopping"),
];

/// Bag-of-words with smoothed inverse document frequency weighting,
/// L2-normalized output.
#[derive(Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn fit(corpus: &[&str]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_freq: Vec<usize> = Vec::new();

        for doc in corpus {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens(doc) {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token).or_insert(next);
                if idx == document_freq.len() {
                    document_freq.push(0);
                }
                if seen.insert(idx) {
                    document_freq[idx] += 1;
                }
            }
        }

        let n = corpus.len() as f32;
        let idf = document_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Out-of-vocabulary tokens are dropped, so unseen text maps to the zero
    /// vector rather than an error.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.idf.len()];
        for token in tokens(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                v[idx] += 1.0;
            }
        }
        for (x, idf) in v.iter_mut().zip(&self.idf) {
            *x *= idf;
        }
        l2_normalize(&mut v);
        v
    }
}

/// Linear classifier: one L2-normalized centroid per label, prediction is
/// the label whose centroid has the largest dot product with the input.
#[derive(Debug, Serialize, Deserialize)]
pub struct CentroidClassifier {
    labels: Vec<String>,
    centroids: Vec<Vec<f32>>,
}

impl CentroidClassifier {
    pub fn fit(samples: &[(Vec<f32>, &str)]) -> anyhow::Result<Self> {
        let dim = samples
            .first()
            .map(|(v, _)| v.len())
            .context("training set is empty")?;

        let mut labels: Vec<String> = Vec::new();
        let mut centroids: Vec<Vec<f32>> = Vec::new();
        for (vector, label) in samples {
            let idx = match labels.iter().position(|l| l == label) {
                Some(i) => i,
                None => {
                    labels.push((*label).to_string());
                    centroids.push(vec![0.0; dim]);
                    labels.len() - 1
                }
            };
            for (acc, x) in centroids[idx].iter_mut().zip(vector) {
                *acc += x;
            }
        }
        for centroid in &mut centroids {
            l2_normalize(centroid);
        }

        Ok(Self { labels, centroids })
    }

    /// Always returns one of the trained labels; ties resolve to the first
    /// label in training order.
    pub fn predict(&self, vector: &[f32]) -> &str {
        let mut best = 0;
        let mut best_score = f32::MIN;
        for (idx, centroid) in self.centroids.iter().enumerate() {
            let score: f32 = centroid.iter().zip(vector).map(|(c, x)| c * x).sum();
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }
        &self.labels[best]
    }
}

/// The persisted, regenerable model pair.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryArtifacts {
    vectorizer: TfidfVectorizer,
    classifier: CentroidClassifier,
}

impl CategoryArtifacts {
    fn path(model_dir: &Path) -> PathBuf {
        model_dir.join(ARTIFACT_FILE)
    }

    pub fn train() -> anyhow::Result<Self> {
        let corpus: Vec<&str> = TRAINING_SET.iter().map(|(text, _)| *text).collect();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        anyhow::ensure!(
            !vectorizer.idf.is_empty(),
            "training corpus produced no features"
        );

        let samples: Vec<(Vec<f32>, &str)> = TRAINING_SET
            .iter()
            .map(|(text, label)| (vectorizer.transform(text), *label))
            .collect();
        let classifier = CentroidClassifier::fit(&samples)?;

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub async fn load(model_dir: &Path) -> anyhow::Result<Option<Self>> {
        let path = Self::path(model_dir);
        if !path.exists() {
            return Ok(None);
        }
        let raw = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        let artifacts = serde_json::from_slice(&raw)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(artifacts))
    }

    pub async fn store(&self, model_dir: &Path) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(model_dir)
            .await
            .with_context(|| format!("create {}", model_dir.display()))?;
        let path = Self::path(model_dir);
        let raw = serde_json::to_vec(self)?;
        tokio::fs::write(&path, raw)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub async fn load_or_rebuild(model_dir: &Path) -> anyhow::Result<Self> {
        if let Some(artifacts) = Self::load(model_dir).await? {
            return Ok(artifacts);
        }
        info!(dir = %model_dir.display(), "no cached category model, training");
        let artifacts = Self::train()?;
        artifacts.store(model_dir).await?;
        Ok(artifacts)
    }
}

/// Lazily-initialized categorizer. The artifact load/train happens at most
/// once per process, guarded against concurrent first use.
pub struct Categorizer {
    model_dir: PathBuf,
    artifacts: OnceCell<CategoryArtifacts>,
}

impl Categorizer {
    pub fn new(model_dir: PathBuf) -> Self {
        Self {
            model_dir,
            artifacts: OnceCell::new(),
        }
    }
}

#[async_trait]
impl CategoryModel for Categorizer {
    async fn predict(&self, text: &str) -> anyhow::Result<String> {
        let artifacts = self
            .artifacts
            .get_or_try_init(|| CategoryArtifacts::load_or_rebuild(&self.model_dir))
            .await?;
        let vector = artifacts.vectorizer.transform(text);
        Ok(artifacts.classifier.predict(&vector).to_string())
    }
}
