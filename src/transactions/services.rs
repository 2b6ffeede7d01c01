use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreateTransactionRequest, CreatedTransactionResponse, FALLBACK_CATEGORY};
use super::repo::{Transaction, TransactionDraft};

/// The add-transaction orchestration: normalize the input, infer a category
/// when the caller supplied none, score the new amount against the stored
/// history, then persist.
///
/// A categorizer failure degrades the write instead of failing it: the
/// record is stored under the fallback category with no `ai_category` echo.
pub async fn create_transaction(
    state: &AppState,
    request: CreateTransactionRequest,
) -> Result<CreatedTransactionResponse, ApiError> {
    let normalized = request.normalize();

    // Caller intent wins over AI: only infer when category is absent.
    let (category, ai_category) = match normalized.category {
        Some(category) => (category, None),
        None => match state.categorizer.predict(&normalized.description).await {
            Ok(label) => (label.clone(), Some(label)),
            Err(e) => {
                warn!(error = %e, "category prediction failed, storing as fallback");
                (FALLBACK_CATEGORY.to_string(), None)
            }
        },
    };

    let mut amounts = Transaction::amounts(&state.db).await?;
    amounts.push(normalized.amount);
    let anomaly = state.detector.is_anomalous(&amounts).await;

    let transaction = Transaction::create(
        &state.db,
        &TransactionDraft {
            kind: normalized.kind,
            category,
            amount: normalized.amount,
            date: normalized.date,
            description: normalized.description,
        },
    )
    .await?;

    Ok(CreatedTransactionResponse {
        transaction,
        ai_category,
        anomaly,
    })
}
