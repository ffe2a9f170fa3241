use super::{Access, ApiClient, ApiResult};
use crate::models::{Budget, BudgetUpdate};

pub struct BudgetApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BudgetApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Budget> {
        self.client.get("/budget", Access::Authenticated).await
    }

    pub async fn set(&self, update: &BudgetUpdate) -> ApiResult<Budget> {
        self.client
            .put("/budget", update, Access::Authenticated)
            .await
    }
}
