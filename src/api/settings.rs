use super::{Access, ApiClient, ApiResult};
use crate::models::{PasswordChange, Settings};

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Settings> {
        self.client.get("/settings", Access::Authenticated).await
    }

    pub async fn update(&self, settings: &Settings) -> ApiResult<Settings> {
        self.client
            .put("/settings", settings, Access::Authenticated)
            .await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        let _: serde_json::Value = self
            .client
            .put("/settings/password", change, Access::Authenticated)
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }
}
