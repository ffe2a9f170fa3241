use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;

/// Order lifecycle
///
/// The forward chain is `Pending -> Preparing -> Completed`. Open orders
/// may be cancelled; finished ones (completed or cancelled) may be
/// archived, after which nothing else changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Completed,
    Cancelled,
    Archived,
}

impl OrderStatus {
    /// Forward chain in display order
    pub const FLOW: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Completed,
    ];

    /// Next status in the forward chain, if any
    pub fn next(self) -> Option<OrderStatus> {
        let pos = Self::FLOW.iter().position(|s| *s == self)?;
        Self::FLOW.get(pos + 1).copied()
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }

    pub fn can_archive(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Archived
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Archived => "archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            "archived" => Ok(OrderStatus::Archived),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

// Same leniency as `FromStr`: case and surrounding whitespace are ignored.
impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "productId", alias = "product", deserialize_with = "de::id")]
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten, with = "de::record_id")]
    pub id: String,
    #[serde(default, alias = "customerId", alias = "customer", deserialize_with = "de::opt_id")]
    pub customer_id: Option<String>,
    #[serde(default, alias = "sellerId", alias = "seller", deserialize_with = "de::opt_id")]
    pub seller_id: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "totalAmount")]
    pub total: f64,
    #[serde(default, alias = "paymentStatus")]
    pub payment_status: Option<String>,
    #[serde(default, alias = "paymentReference")]
    pub payment_reference: Option<String>,
    #[serde(default, alias = "deliveryAddress")]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Line-item total, independent of whatever the backend reported
    pub fn computed_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub verified: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}
