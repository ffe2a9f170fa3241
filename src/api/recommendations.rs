//! AI meal-plan recommendations
//!
//! Generation happens entirely on the backend; the client only asks for a
//! plan and hands back feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{segment, Access, ApiClient, ApiResult};
use crate::models::{de, Preferences, WeeklyMealPlan};

pub struct Recommendations<'a> {
    client: &'a ApiClient,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    pub days: u32,
    /// Overrides the stored preferences for this request only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            days: 7,
            preferences: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRecord {
    #[serde(flatten, with = "de::record_id")]
    pub id: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan: Option<WeeklyMealPlan>,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    /// 1-5
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl<'a> Recommendations<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, request: &RecommendationRequest) -> ApiResult<WeeklyMealPlan> {
        let plan: WeeklyMealPlan = self
            .client
            .post("/recommendations/generate", request, Access::Authenticated)
            .await?;

        tracing::info!(days = plan.days.len(), meals = plan.meal_count(), "Meal plan generated");
        Ok(plan)
    }

    pub async fn current(&self) -> ApiResult<WeeklyMealPlan> {
        self.client
            .get("/recommendations/current", Access::Authenticated)
            .await
    }

    pub async fn history(&self) -> ApiResult<Vec<RecommendationRecord>> {
        self.client
            .get("/recommendations/history", Access::Authenticated)
            .await
    }

    pub async fn feedback(&self, id: &str, feedback: &Feedback) -> ApiResult<()> {
        let _: serde_json::Value = self
            .client
            .post(
                &format!("/recommendations/{}/feedback", segment(id)),
                feedback,
                Access::Authenticated,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::FakeBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_generate() {
        let backend = FakeBackend::new()
            .route(
                "POST",
                "/recommendations/generate",
                200,
                json!({"days": [{"day": "Monday", "meals": {"breakfast": {"name": "Koko", "ingredients": ["millet"]}}}]}),
            )
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let plan = client
            .recommendations()
            .generate(&RecommendationRequest {
                days: 3,
                preferences: None,
            })
            .await
            .unwrap();
        assert_eq!(plan.meal_count(), 1);
        assert_eq!(backend.last_request().body.unwrap(), json!({"days": 3}));
    }

    #[tokio::test]
    async fn test_history_and_feedback() {
        let backend = FakeBackend::new()
            .route(
                "GET",
                "/recommendations/history",
                200,
                json!([{"_id": "r1", "createdAt": "2024-06-01T08:00:00Z", "rating": 4}]),
            )
            .route("POST", "/recommendations/r1/feedback", 200, json!({"ok": true}))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let history = client.recommendations().history().await.unwrap();
        assert_eq!(history[0].rating, Some(4));
        assert!(history[0].plan.is_none());

        client
            .recommendations()
            .feedback(
                "r1",
                &Feedback {
                    rating: 5,
                    comment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(backend.last_request().body.unwrap(), json!({"rating": 5}));
    }
}
