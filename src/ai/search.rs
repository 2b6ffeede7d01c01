//! Semantic ranking of transactions against a free-text query.

use crate::transactions::repo::Transaction;

use super::embedding::cosine_similarity;
use super::Embedder;

/// Upper bound on returned matches.
pub const MAX_RESULTS: usize = 5;

/// Ranks `candidates` by cosine similarity between the query embedding and
/// an embedding of each candidate's description, category and date. Returns
/// at most [`MAX_RESULTS`] transactions in descending score order; equal
/// scores keep the original candidate order (the sort is stable).
pub async fn top_matches(
    embedder: &dyn Embedder,
    query: &str,
    candidates: Vec<Transaction>,
) -> Vec<Transaction> {
    let query_embedding = embedder.encode(query).await;

    let mut scored = Vec::with_capacity(candidates.len());
    for transaction in candidates {
        let text = format!(
            "{} {} {}",
            transaction.description, transaction.category, transaction.date
        );
        let score = cosine_similarity(&query_embedding, &embedder.encode(&text).await);
        scored.push((score, transaction));
    }

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(MAX_RESULTS);
    scored.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::embedding::HashedEmbedder;

    fn transaction(id: i64, description: &str, category: &str, date: &str) -> Transaction {
        Transaction {
            id,
            kind: "expense".into(),
            category: category.into(),
            amount: 10.0,
            date: date.into(),
            description: description.into(),
        }
    }

    fn candidates() -> Vec<Transaction> {
        vec![
            transaction(1, "pizza with friends", "Food", "2024-01-01"),
            transaction(2, "uber to airport", "Travel", "2024-01-02"),
            transaction(3, "netflix subscription", "Entertainment", "2024-01-03"),
            transaction(4, "electricity bill january", "Bills", "2024-01-04"),
            transaction(5, "new running shoes", "Shopping", "2024-01-05"),
            transaction(6, "water bill february", "Bills", "2024-02-01"),
            transaction(7, "movie tickets", "Entertainment", "2024-02-02"),
        ]
    }

    #[tokio::test]
    async fn best_lexical_match_ranks_first() {
        let results = top_matches(&HashedEmbedder, "pizza", candidates()).await;
        assert_eq!(results[0].id, 1);

        let results = top_matches(&HashedEmbedder, "uber ride", candidates()).await;
        assert_eq!(results[0].id, 2);
    }

    #[tokio::test]
    async fn returns_at_most_five_results() {
        let results = top_matches(&HashedEmbedder, "bill", candidates()).await;
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[tokio::test]
    async fn small_candidate_sets_are_returned_whole() {
        let two = candidates().into_iter().take(2).collect();
        let results = top_matches(&HashedEmbedder, "anything", two).await;
        assert_eq!(results.len(), 2);

        let results = top_matches(&HashedEmbedder, "anything", Vec::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn ties_keep_original_candidate_order() {
        // A query sharing no vocabulary with any candidate scores them all
        // zero; the stable sort must preserve insertion order.
        let results = top_matches(&HashedEmbedder, "zzzz", candidates()).await;
        let ids: Vec<i64> = results.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
