use serde::Serialize;

use super::{segment, Access, ApiClient, ApiResult};
use crate::models::{AdminStats, Order, User};

pub struct Admin<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct UserStatus {
    active: bool,
}

impl<'a> Admin<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiResult<AdminStats> {
        self.client.get("/admin/stats", Access::Authenticated).await
    }

    pub async fn users(&self) -> ApiResult<Vec<User>> {
        self.client.get("/admin/users", Access::Authenticated).await
    }

    /// Suspend or reinstate an account
    pub async fn set_user_active(&self, id: &str, active: bool) -> ApiResult<User> {
        let user: User = self
            .client
            .patch(
                &format!("/admin/users/{}/status", segment(id)),
                &UserStatus { active },
                Access::Authenticated,
            )
            .await?;

        tracing::info!(user_id = %id, active, "User status changed");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("/admin/users/{}", segment(id)), Access::Authenticated)
            .await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/admin/orders", Access::Authenticated).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use crate::api::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_stats() {
        let backend = FakeBackend::new()
            .route(
                "GET",
                "/admin/stats",
                200,
                json!({"totalUsers": 120, "totalSellers": 14, "totalOrders": 300, "totalRevenue": 4520.75, "pendingOrders": 9}),
            )
            .start()
            .await;
        let client = backend.signed_in_client("admin").await;

        let stats = client.admin().stats().await.unwrap();
        assert_eq!(stats.total_users, 120);
        assert_eq!(stats.pending_orders, 9);
    }

    #[tokio::test]
    async fn test_suspend_user() {
        let backend = FakeBackend::new()
            .route("PATCH", "/admin/users/u5/status", 200, json!({"_id": "u5", "email": "s@m.com", "isActive": false}))
            .start()
            .await;
        let client = backend.signed_in_client("admin").await;

        let user = client.admin().set_user_active("u5", false).await.unwrap();
        assert!(!user.active);
        assert_eq!(backend.last_request().body.unwrap(), json!({"active": false}));
    }

    #[tokio::test]
    async fn test_non_admin_is_rejected() {
        let backend = FakeBackend::new()
            .route("GET", "/admin/users", 403, json!({"message": "Admin access required"}))
            .start()
            .await;
        let client = backend.signed_in_client("customer").await;

        let err = client.admin().users().await.unwrap_err();
        assert!(err.is_auth());
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Admin access required"));
    }
}
