//! Marketplace listings

use super::{segment, Access, ApiClient, ApiResult};
use crate::models::{NewProduct, Product, ProductQuery, ProductUpdate};

pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Browse listings; filters left unset are not sent
    pub async fn list(&self, query: &ProductQuery) -> ApiResult<Vec<Product>> {
        self.client
            .get_query("/products", query, Access::Authenticated)
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.client
            .get(&format!("/products/{}", segment(id)), Access::Authenticated)
            .await
    }

    /// The signed-in seller's own listings
    pub async fn mine(&self) -> ApiResult<Vec<Product>> {
        self.client
            .get("/products/seller/mine", Access::Authenticated)
            .await
    }

    /// The signed-in seller's listings at or below their restock threshold
    pub async fn low_stock(&self) -> ApiResult<Vec<Product>> {
        let mut products = self.mine().await?;
        products.retain(Product::is_low_stock);
        products.sort_by_key(|p| p.stock);
        Ok(products)
    }

    pub async fn create(&self, product: &NewProduct) -> ApiResult<Product> {
        self.client
            .post("/products", product, Access::Authenticated)
            .await
    }

    pub async fn update(&self, id: &str, update: &ProductUpdate) -> ApiResult<Product> {
        self.client
            .put(&format!("/products/{}", segment(id)), update, Access::Authenticated)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("/products/{}", segment(id)), Access::Authenticated)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use crate::models::{NewProduct, ProductQuery};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_only_set_filters() {
        let backend = FakeBackend::new()
            .route("GET", "/products", 200, json!([{"_id": "p1", "name": "Yam", "price": 3.0, "stock": 12}]))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let query = ProductQuery {
            category: Some("tubers".to_string()),
            limit: Some(20),
            ..Default::default()
        };
        let products = client.products().list(&query).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(
            backend.last_request().query.as_deref(),
            Some("category=tubers&limit=20")
        );
    }

    #[tokio::test]
    async fn test_low_stock_filters_and_sorts() {
        let backend = FakeBackend::new()
            .route(
                "GET",
                "/products/seller/mine",
                200,
                json!([
                    {"_id": "a", "name": "Eggs", "price": 4.0, "stock": 3},
                    {"_id": "b", "name": "Honey", "price": 9.0, "stock": 50},
                    {"_id": "c", "name": "Okra", "price": 2.0, "stock": 0},
                    {"_id": "d", "name": "Millet", "price": 2.0, "stock": 15, "lowStockThreshold": 20}
                ]),
            )
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let low: Vec<String> = client
            .products()
            .low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(low, vec!["c", "a", "d"]);
    }

    #[tokio::test]
    async fn test_create_sends_camel_case() {
        let backend = FakeBackend::new()
            .route("POST", "/products", 201, json!({"id": 77, "name": "Shea butter", "price": 6.5, "stock": 10}))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let created = client
            .products()
            .create(&NewProduct {
                name: "Shea butter".to_string(),
                description: "Unrefined".to_string(),
                price: 6.5,
                stock: 10,
                unit: None,
                category: Some("beauty".to_string()),
                image_url: None,
                low_stock_threshold: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "77");

        let body = backend.last_request().body.unwrap();
        assert_eq!(body["lowStockThreshold"], 2);
        assert!(body.get("imageUrl").is_none());
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let backend = FakeBackend::new()
            .empty_route("DELETE", "/products/p9", 204)
            .start()
            .await;
        let client = backend.signed_in_client("t").await;
        assert!(client.products().delete("p9").await.is_ok());
    }
}
