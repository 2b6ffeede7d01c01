//! Text embeddings for semantic search.
//!
//! A signed feature-hashing encoder: each token lands in one of
//! `EMBEDDING_DIM` buckets by FNV-1a hash, with a hash-derived sign to keep
//! collisions from only accumulating. Vectors are L2-normalized so cosine
//! similarity reduces to a dot product.

use async_trait::async_trait;

use super::{l2_normalize, tokens, Embedder};

pub const EMBEDDING_DIM: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Default)]
pub struct HashedEmbedder;

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn encode(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % EMBEDDING_DIM as u64) as usize;
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        l2_normalize(&mut v);
        v
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    // Inputs are unit-length (or zero), so the dot product is the cosine.
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
