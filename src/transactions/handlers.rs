use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::ai::{insights, search};
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{
    CreateTransactionRequest, CreatedTransactionResponse, DeletedResponse, InsightsResponse,
    SearchRequest,
};
use super::repo::Transaction;
use super::services;

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = Transaction::list(&state.db).await?;
    Ok(Json(transactions))
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreatedTransactionResponse>), ApiError> {
    let response = services::create_transaction(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !Transaction::delete(&state.db, id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(Json(DeletedResponse {
        message: "Transaction deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_insights(
    State(state): State<AppState>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let transactions = Transaction::list(&state.db).await?;
    Ok(Json(InsightsResponse {
        summary: insights::summarize(&transactions),
    }))
}

#[instrument(skip(state, payload))]
pub async fn search_transactions(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let candidates = Transaction::list(&state.db).await?;
    let matches = search::top_matches(state.embedder.as_ref(), &payload.query, candidates).await;
    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use crate::transactions::dto::CreateTransactionRequest;

    #[tokio::test]
    async fn delete_of_missing_id_is_not_found() {
        let state = test_state().await;
        let result = delete_transaction(State(state), Path(999)).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_the_record_from_listing() {
        let state = test_state().await;
        let created = services::create_transaction(
            &state,
            CreateTransactionRequest {
                category: Some("Food".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let deleted = delete_transaction(State(state.clone()), Path(created.transaction.id))
            .await
            .unwrap();
        assert_eq!(deleted.0.message, "Transaction deleted successfully");

        let listed = list_transactions(State(state)).await.unwrap();
        assert!(listed.0.is_empty());
    }

    #[tokio::test]
    async fn insights_reflect_the_stored_history() {
        let state = test_state().await;

        let empty = get_insights(State(state.clone())).await.unwrap();
        assert_eq!(empty.0.summary, "No transactions yet to analyze.");

        for (kind, amount) in [("income", 100.0), ("expense", 40.0)] {
            services::create_transaction(
                &state,
                CreateTransactionRequest {
                    kind: Some(kind.into()),
                    amount: Some(amount),
                    category: Some("c".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let summary = get_insights(State(state)).await.unwrap().0.summary;
        assert!(summary.contains("Income: ₹100"));
        assert!(summary.contains("Expenses: ₹40"));
        assert!(summary.contains("Balance: ₹60"));
    }

    #[tokio::test]
    async fn search_never_returns_more_than_stored() {
        let state = test_state().await;
        services::create_transaction(
            &state,
            CreateTransactionRequest {
                description: Some("pizza night".into()),
                category: Some("Food".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let matches = search_transactions(
            State(state),
            Json(SearchRequest {
                query: "pizza".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(matches.0.len(), 1);
        assert_eq!(matches.0[0].description, "pizza night");
    }
}
