//! Account registration, sign-in and profile

use super::{Access, ApiClient, ApiResult};
use crate::models::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};

pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create an account and sign in with it
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("/auth/register", request, Access::Public)
            .await?;
        self.client.set_token(response.token.clone()).await;

        tracing::info!(user_id = %response.user.id, role = %response.user.role, "Registered");
        Ok(response)
    }

    /// Sign in; the returned token is kept on the client for later calls
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("/auth/login", request, Access::Public)
            .await?;
        self.client.set_token(response.token.clone()).await;

        tracing::info!(user_id = %response.user.id, role = %response.user.role, "Signed in");
        Ok(response)
    }

    pub async fn profile(&self) -> ApiResult<User> {
        self.client.get("/auth/profile", Access::Authenticated).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.client
            .put("/auth/profile", update, Access::Authenticated)
            .await
    }

    /// Forget the token; the backend keeps no session to end
    pub async fn logout(&self) {
        self.client.clear_token().await;
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use crate::api::ApiError;
    use crate::models::{LoginRequest, Role};
    use serde_json::json;

    fn auth_body() -> serde_json::Value {
        json!({
            "token": "jwt-123",
            "user": {"_id": "u1", "name": "Kofi", "email": "kofi@example.com", "role": "customer"}
        })
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let backend = FakeBackend::new()
            .route("POST", "/auth/login", 200, auth_body())
            .route("GET", "/auth/profile", 200, auth_body()["user"].clone())
            .start()
            .await;
        let client = backend.client();

        let response = client
            .auth()
            .login(&LoginRequest {
                email: "kofi@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::Customer);
        assert_eq!(client.token().await.as_deref(), Some("jwt-123"));

        let login = &backend.requests()[0];
        assert!(login.authorization.is_none());
        assert_eq!(login.body.as_ref().unwrap()["email"], "kofi@example.com");

        let profile = client.auth().profile().await.unwrap();
        assert_eq!(profile.id, "u1");
        assert_eq!(
            backend.last_request().authorization.as_deref(),
            Some("Bearer jwt-123")
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_out() {
        let backend = FakeBackend::new()
            .route("POST", "/auth/login", 400, json!({"message": "Invalid credentials"}))
            .start()
            .await;
        let client = backend.client();

        let err = client
            .auth()
            .login(&LoginRequest {
                email: "kofi@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error 400: Invalid credentials");
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_blocks_authenticated_calls() {
        let backend = FakeBackend::new().start().await;
        let client = backend.signed_in_client("jwt").await;

        client.auth().logout().await;
        assert!(matches!(
            client.auth().profile().await,
            Err(ApiError::NotAuthenticated)
        ));
        assert!(backend.requests().is_empty());
    }
}
