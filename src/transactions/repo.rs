use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// The sole persisted entity. `id` is assigned by the store and never
/// reused; there is no update path, only create and delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

/// Fully-populated record ready to be inserted.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

impl Transaction {
    /// All transactions in insertion order.
    pub async fn list(db: &SqlitePool) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, type, category, amount, date, description
            FROM transactions
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Amount history in insertion order, for the anomaly detector.
    pub async fn amounts(db: &SqlitePool) -> anyhow::Result<Vec<f64>> {
        let rows: Vec<(f64,)> =
            sqlx::query_as(r#"SELECT amount FROM transactions ORDER BY id"#)
                .fetch_all(db)
                .await?;
        Ok(rows.into_iter().map(|(a,)| a).collect())
    }

    pub async fn create(db: &SqlitePool, draft: &TransactionDraft) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (type, category, amount, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, type, category, amount, date, description
            "#,
        )
        .bind(&draft.kind)
        .bind(&draft.category)
        .bind(draft.amount)
        .bind(&draft.date)
        .bind(&draft.description)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Returns whether a record existed and was removed. A missing id is a
    /// normal outcome here, not an error.
    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
