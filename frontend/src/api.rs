//! Thin client over the backend JSON endpoints. No retries, no caching.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AnalyticsSummary, Anomaly, AnomalyList, BudgetRecommendation, CategoryPerformance,
    CreatedTransaction, HealthScore, NewTransaction, PerformanceList, Prediction, RawTransaction,
    RecommendationList,
};

/// Some endpoints answer 200 with `{"error": "..."}` instead of data.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failed { error: String },
    Data(T),
}

pub(crate) fn decode_payload<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(Envelope::Failed { error }) => Err(ApiError::Backend(error)),
        Ok(Envelope::Data(data)) => Ok(data),
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
        if !resp.ok() {
            return Err(ApiError::Status {
                status: resp.status(),
                text: resp.status_text(),
            });
        }
        let body = resp.text().await?;
        decode_payload(&body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn list_transactions(&self) -> ApiResult<Vec<RawTransaction>> {
        self.get("/api/transactions").await
    }

    pub async fn create_transaction(&self, tx: &NewTransaction) -> ApiResult<CreatedTransaction> {
        let url = self.url("/api/transactions");
        tracing::debug!(%url, merchant = %tx.merchant, "POST");
        let resp = Request::post(&url).json(tx)?.send().await?;
        Self::read(resp).await
    }

    pub async fn delete_transaction(&self, id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/api/transactions/{id}"));
        tracing::debug!(%url, "DELETE");
        let resp = Request::delete(&url).send().await?;
        if !resp.ok() {
            return Err(ApiError::Status {
                status: resp.status(),
                text: resp.status_text(),
            });
        }
        Ok(())
    }

    pub async fn analytics(&self) -> ApiResult<AnalyticsSummary> {
        self.get("/api/analytics").await
    }

    pub async fn anomalies(&self) -> ApiResult<Vec<Anomaly>> {
        let list: AnomalyList = self.get("/api/anomalies").await?;
        Ok(list.anomalies)
    }

    pub async fn predict(&self) -> ApiResult<Prediction> {
        self.get("/api/predict").await
    }

    pub async fn budget_recommendations(&self) -> ApiResult<Vec<BudgetRecommendation>> {
        let list: RecommendationList = self.get("/api/budget-recommendations").await?;
        Ok(list.recommendations)
    }

    pub async fn health_score(&self) -> ApiResult<HealthScore> {
        self.get("/api/health-score").await
    }

    pub async fn category_performance(&self) -> ApiResult<Vec<CategoryPerformance>> {
        let list: PerformanceList = self.get("/api/category-performance").await?;
        Ok(list.categories)
    }

    /// Checks that `base` answers the transaction listing.
    pub async fn ping(&self) -> ApiResult<()> {
        self.list_transactions().await.map(|_| ())
    }
}

/// Category prediction by the backend model, by way of creating the
/// transaction. This is the only classifier used for real data.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteClassifier {
    client: ApiClient,
}

impl RemoteClassifier {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn submit(&self, tx: &NewTransaction) -> ApiResult<String> {
        let created = self.client.create_transaction(tx).await?;
        tracing::info!(
            merchant = %tx.merchant,
            category = %created.predicted_category,
            "transaction categorized by backend"
        );
        Ok(created.predicted_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn error_payload_is_a_gate() {
        let result = decode_payload::<AnalyticsSummary>(r#"{"error":"No transactions found"}"#);
        assert!(matches!(result, Err(ApiError::Backend(msg)) if msg == "No transactions found"));

        let result = decode_payload::<Prediction>(r#"{"error":"Insufficient data for prediction"}"#);
        assert!(matches!(result, Err(ApiError::Backend(_))));
    }

    #[test]
    fn data_payload_decodes() {
        let prediction: Prediction =
            decode_payload(r#"{"predicted_next_month":1523.4,"confidence":0.85}"#).unwrap();
        assert_eq!(prediction.predicted_next_month, dec!(1523.4));

        let list: AnomalyList = decode_payload(
            r#"{"anomalies":[{"merchant":"Hotel","amount":499.0,"date":"Mon, 15 Jan 2024 00:00:00 GMT","id":4}]}"#,
        )
        .unwrap();
        assert_eq!(list.anomalies.len(), 1);
    }

    #[test]
    fn one_bad_transaction_does_not_fail_the_list() {
        let raw: Vec<RawTransaction> = decode_payload(
            r#"[
                {"id":1,"amount":12.5,"merchant":"Uber","category":"Transportation","date":"2024-01-10"},
                {"id":2,"amount":8,"merchant":"Cafe","category":"Food & Dining","date":null},
                {"id":"3","amount":20,"merchant":null,"category":"Shopping","date":"2024-01-12"},
                "not a record"
            ]"#,
        )
        .unwrap();
        assert_eq!(raw.len(), 4);

        let batch = crate::analytics::partition_records(raw);
        let ids: Vec<i64> = batch.records.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(batch.rejected.len(), 2);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_payload::<HealthScore>("<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn urls_join_base_and_path() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.url("/api/predict"), "http://localhost:8000/api/predict");
    }
}
