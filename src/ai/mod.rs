//! AI oracles consumed by the transaction coordinator.
//!
//! Each oracle is a black box behind a trait: input in, score out. The
//! default implementations are small deterministic models so the service
//! needs no external model runtime.

pub mod anomaly;
pub mod categorizer;
pub mod embedding;
pub mod insights;
pub mod search;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

/// Maps free text to one of the trained category labels.
#[async_trait]
pub trait CategoryModel: Send + Sync {
    async fn predict(&self, text: &str) -> anyhow::Result<String>;
}

/// Flags whether the last amount in a history is a statistical outlier.
#[async_trait]
pub trait AnomalyModel: Send + Sync {
    async fn is_anomalous(&self, amounts: &[f64]) -> bool;
}

/// Encodes text into a fixed-length vector for similarity comparison.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn encode(&self, text: &str) -> Vec<f32>;
}

/// Shared word tokenizer for the categorizer and the embedder.
pub(crate) fn tokens(text: &str) -> Vec<String> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(r"[a-z0-9]+").unwrap();
    }
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(crate) fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
