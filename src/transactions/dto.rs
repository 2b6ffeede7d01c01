use serde::{Deserialize, Serialize};

use super::repo::Transaction;

const DEFAULT_KIND: &str = "expense";
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Body for POST /api/transactions. Every field may be omitted; malformed
/// input is never rejected, only defaulted.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// The normalization step: all defaults applied in one place, so nothing
/// downstream re-checks optionality. `category` stays optional — `None`
/// means "let the categorizer decide".
#[derive(Debug)]
pub struct NormalizedTransaction {
    pub kind: String,
    pub category: Option<String>,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

impl CreateTransactionRequest {
    pub fn normalize(self) -> NormalizedTransaction {
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        NormalizedTransaction {
            kind: self.kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
            category,
            amount: self.amount.unwrap_or(0.0),
            date: self.date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Created record plus the AI annotations computed during the write.
/// `ai_category` is populated only when the category was inferred.
#[derive(Debug, Serialize)]
pub struct CreatedTransactionResponse {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub ai_category: Option<String>,
    pub anomaly: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_gets_all_defaults() {
        let normalized = CreateTransactionRequest::default().normalize();
        assert_eq!(normalized.kind, "expense");
        assert_eq!(normalized.category, None);
        assert_eq!(normalized.amount, 0.0);
        assert_eq!(normalized.date, "");
        assert_eq!(normalized.description, "");
    }

    #[test]
    fn blank_category_is_treated_as_absent() {
        let request = CreateTransactionRequest {
            category: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(request.normalize().category, None);

        let request = CreateTransactionRequest {
            category: Some("  Custom  ".into()),
            ..Default::default()
        };
        assert_eq!(request.normalize().category.as_deref(), Some("Custom"));
    }

    #[test]
    fn request_deserializes_from_partial_json() {
        let request: CreateTransactionRequest =
            serde_json::from_str(r#"{"type":"income","amount":12.5}"#).unwrap();
        let normalized = request.normalize();
        assert_eq!(normalized.kind, "income");
        assert_eq!(normalized.amount, 12.5);
        assert_eq!(normalized.description, "");
    }

    #[test]
    fn created_response_flattens_the_record() {
        let response = CreatedTransactionResponse {
            transaction: Transaction {
                id: 7,
                kind: "expense".into(),
                category: "Food".into(),
                amount: 9.5,
                date: "2024-01-01".into(),
                description: "pizza".into(),
            },
            ai_category: Some("Food".into()),
            anomaly: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], "expense");
        assert_eq!(json["ai_category"], "Food");
        assert_eq!(json["anomaly"], false);
    }
}
