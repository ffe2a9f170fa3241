//! Meal catalog and the saved weekly plan

use super::{segment, Access, ApiClient, ApiResult};
use crate::models::{Meal, WeeklyMealPlan};

pub struct Meals<'a> {
    client: &'a ApiClient,
}

impl<'a> Meals<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Meal>> {
        self.client.get("/meals", Access::Authenticated).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Meal> {
        self.client
            .get(&format!("/meals/{}", segment(id)), Access::Authenticated)
            .await
    }

    pub async fn weekly_plan(&self) -> ApiResult<WeeklyMealPlan> {
        self.client.get("/meals/plan", Access::Authenticated).await
    }

    pub async fn save_weekly_plan(&self, plan: &WeeklyMealPlan) -> ApiResult<WeeklyMealPlan> {
        self.client
            .put("/meals/plan", plan, Access::Authenticated)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use crate::models::{DayPlan, Meal, MealSlot, WeeklyMealPlan};
    use serde_json::json;

    #[tokio::test]
    async fn test_weekly_plan() {
        let backend = FakeBackend::new()
            .route(
                "GET",
                "/meals/plan",
                200,
                json!({
                    "days": [
                        {"day": "Monday", "meals": {"lunch": {"name": "Waakye", "ingredients": ["rice", "beans"]}}},
                        {"day": "Tuesday", "meals": {}}
                    ]
                }),
            )
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let plan = client.meals().weekly_plan().await.unwrap();
        assert_eq!(plan.days.len(), 2);
        assert_eq!(plan.days[0].meals[&MealSlot::Lunch].name, "Waakye");
    }

    #[tokio::test]
    async fn test_get_encodes_id() {
        let backend = FakeBackend::new()
            .route("GET", "/meals/a%20b", 200, json!({"name": "Soup"}))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let meal = client.meals().get("a b").await.unwrap();
        assert_eq!(meal.name, "Soup");
        assert!(meal.ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_save_weekly_plan_sends_days() {
        let backend = FakeBackend::new()
            .route(
                "PUT",
                "/meals/plan",
                200,
                json!({"_id": "w1", "days": [{"day": "Friday", "meals": {"dinner": {"name": "Kenkey"}}}]}),
            )
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let plan = WeeklyMealPlan::new(vec![
            DayPlan::new("Friday").meal(MealSlot::Dinner, Meal::new("Kenkey")),
        ]);
        let saved = client.meals().save_weekly_plan(&plan).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("w1"));

        let sent = backend.last_request().body.unwrap();
        assert_eq!(sent["days"][0]["meals"]["dinner"]["name"], "Kenkey");
    }
}
