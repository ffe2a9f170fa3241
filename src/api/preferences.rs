use super::{Access, ApiClient, ApiResult};
use crate::models::Preferences;

pub struct PreferencesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PreferencesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Preferences> {
        self.client.get("/preferences", Access::Authenticated).await
    }

    pub async fn update(&self, preferences: &Preferences) -> ApiResult<Preferences> {
        self.client
            .put("/preferences", preferences, Access::Authenticated)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use crate::models::Preferences;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_through_backend() {
        let backend = FakeBackend::new()
            .route("PUT", "/preferences", 200, json!({"dietaryRestrictions": ["halal"], "allergies": ["peanut"], "cuisines": []}))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let prefs = Preferences {
            dietary_restrictions: vec!["halal".to_string()],
            allergies: vec!["peanut".to_string()],
            ..Default::default()
        };
        let saved = client.preferences().update(&prefs).await.unwrap();
        assert_eq!(saved.allergies, vec!["peanut"]);

        let sent = backend.last_request().body.unwrap();
        assert_eq!(sent["dietaryRestrictions"], json!(["halal"]));
        assert!(sent.get("calorieTarget").is_none());
    }
}
