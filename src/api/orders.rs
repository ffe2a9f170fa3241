//! Marketplace orders and their status lifecycle

use serde::Serialize;

use super::{segment, Access, ApiClient, ApiError, ApiResult};
use crate::models::{NewOrder, Order, OrderStatus, PaymentVerification};

pub struct Orders<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

#[derive(Serialize)]
struct VerifyPayment<'r> {
    reference: &'r str,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn place(&self, order: &NewOrder) -> ApiResult<Order> {
        let placed: Order = self
            .client
            .post("/orders", order, Access::Authenticated)
            .await?;

        tracing::info!(order_id = %placed.id, items = placed.items.len(), "Order placed");
        Ok(placed)
    }

    /// Orders placed by the signed-in customer
    pub async fn mine(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/orders/my", Access::Authenticated).await
    }

    /// Orders received by the signed-in seller
    pub async fn seller_orders(&self) -> ApiResult<Vec<Order>> {
        self.client.get("/orders/seller", Access::Authenticated).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Order> {
        self.client
            .get(&format!("/orders/{}", segment(id)), Access::Authenticated)
            .await
    }

    /// Set a status directly, without the client-side transition check
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> ApiResult<Order> {
        let updated: Order = self
            .client
            .patch(
                &format!("/orders/{}/status", segment(id)),
                &StatusUpdate { status },
                Access::Authenticated,
            )
            .await?;

        tracing::info!(order_id = %id, status = %status, "Order status updated");
        Ok(updated)
    }

    /// Move an order one step along `pending -> preparing -> completed`
    pub async fn advance(&self, order: &Order) -> ApiResult<Order> {
        let next = order.status.next().ok_or(ApiError::InvalidTransition {
            from: order.status,
            action: "advance",
        })?;
        self.update_status(&order.id, next).await
    }

    pub async fn cancel(&self, order: &Order) -> ApiResult<Order> {
        if !order.status.can_cancel() {
            return Err(ApiError::InvalidTransition {
                from: order.status,
                action: "cancel",
            });
        }
        self.update_status(&order.id, OrderStatus::Cancelled).await
    }

    pub async fn archive(&self, order: &Order) -> ApiResult<Order> {
        if !order.status.can_archive() {
            return Err(ApiError::InvalidTransition {
                from: order.status,
                action: "archive",
            });
        }
        self.update_status(&order.id, OrderStatus::Archived).await
    }

    /// Ask the backend to confirm a payment reference for an order
    pub async fn verify_payment(&self, id: &str, reference: &str) -> ApiResult<PaymentVerification> {
        self.client
            .post(
                &format!("/orders/{}/verify-payment", segment(id)),
                &VerifyPayment { reference },
                Access::Authenticated,
            )
            .await
    }
}
