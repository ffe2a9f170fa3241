//! Mealwise backend client
//!
//! Typed wrappers over the backend REST API, one handle per resource,
//! all sharing a single authenticated [`ApiClient`].
//!
//! # Resources
//!
//! - [`Auth`] - `/auth/{register,login,profile}`
//! - [`Meals`] - `/meals`
//! - [`Products`] - `/products`
//! - [`Orders`] - `/orders/*`
//! - [`BudgetApi`] - `/budget`
//! - [`Chat`] - `/chat/*`
//! - [`SettingsApi`] - `/settings/*`
//! - [`PreferencesApi`] - `/preferences`
//! - [`Recommendations`] - `/recommendations/*`
//! - [`Backup`] - `/settings/backup/*`
//! - [`Admin`] - `/admin/*`
//!
//! # Example
//!
//! ```rust,no_run
//! use mealwise::api::ApiClient;
//! use mealwise::config::ApiConfig;
//! use mealwise::models::LoginRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiConfig::default())?;
//!
//!     client
//!         .auth()
//!         .login(&LoginRequest {
//!             email: "ama@example.com".to_string(),
//!             password: "secret".to_string(),
//!         })
//!         .await?;
//!
//!     for order in client.orders().mine().await? {
//!         println!("{} {}", order.id, order.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod admin;
mod auth;
mod backup;
mod budget;
mod chat;
pub mod error;
mod meals;
mod orders;
mod preferences;
mod products;
mod recommendations;
mod settings;

#[cfg(test)]
pub(crate) mod test_server;

pub use admin::Admin;
pub use auth::Auth;
pub use backup::Backup;
pub use budget::BudgetApi;
pub use chat::Chat;
pub use error::{ApiError, ApiResult};
pub use meals::Meals;
pub use orders::Orders;
pub use preferences::PreferencesApi;
pub use products::Products;
pub use recommendations::{Feedback, RecommendationRecord, RecommendationRequest, Recommendations};
pub use settings::SettingsApi;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::ApiConfig;

/// Whether an endpoint requires a bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Public,
    Authenticated,
}

/// HTTP client for the Mealwise backend
///
/// The bearer token lives in memory only; persisting it between runs is
/// left to the caller.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::Request)?;

        let base_url = config.url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(config.url));
        }

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client that starts out signed in
    pub fn with_token(config: ApiConfig, token: impl Into<String>) -> ApiResult<Self> {
        let mut client = Self::new(config)?;
        client.token = RwLock::new(Some(token.into()));
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    // ============================================
    // Resource handles
    // ============================================

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn meals(&self) -> Meals<'_> {
        Meals::new(self)
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn budget(&self) -> BudgetApi<'_> {
        BudgetApi::new(self)
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    pub fn preferences(&self) -> PreferencesApi<'_> {
        PreferencesApi::new(self)
    }

    pub fn recommendations(&self) -> Recommendations<'_> {
        Recommendations::new(self)
    }

    pub fn backup(&self) -> Backup<'_> {
        Backup::new(self)
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }

    /// Check that the backend answers
    pub async fn health(&self) -> ApiResult<()> {
        let url = self.url("/health");
        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Unavailable)
        }
    }

    // ============================================
    // Transport
    // ============================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request(&self, method: Method, path: &str, access: Access) -> ApiResult<RequestBuilder> {
        let mut builder = self.client.request(method.clone(), self.url(path));

        match (self.token.read().await.as_deref(), access) {
            (Some(token), _) => builder = builder.bearer_auth(token),
            (None, Access::Authenticated) => return Err(ApiError::NotAuthenticated),
            (None, Access::Public) => {}
        }

        tracing::debug!(method = %method, path = %path, "Sending API request");
        Ok(builder)
    }

    /// Send a request and decode its JSON body
    ///
    /// An empty success body decodes as JSON `null`, so `()` and `Option`
    /// targets accept 204 responses.
    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(path = %path, status = status.as_u16(), "API request failed");
            return Err(ApiError::from_response(status, &text));
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Unexpected response body");
            ApiError::Decode(format!("{}: {}", path, e))
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, access: Access) -> ApiResult<T> {
        let builder = self.request(Method::GET, path, access).await?;
        self.send(path, builder).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, access).await?.query(query);
        self.send(path, builder).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, access).await?.json(body);
        self.send(path, builder).await
    }

    /// POST without a request body
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str, access: Access) -> ApiResult<T> {
        let builder = self.request(Method::POST, path, access).await?;
        self.send(path, builder).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path, access).await?.json(body);
        self.send(path, builder).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B, access: Access) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path, access).await?.json(body);
        self.send(path, builder).await
    }

    pub(crate) async fn delete(&self, path: &str, access: Access) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, path, access).await?;
        let _: serde_json::Value = self.send(path, builder).await?;
        Ok(())
    }
}

/// Percent-encode a single path segment
pub(crate) fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
