use serde::{Deserialize, Serialize};

/// Platform totals for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default, alias = "total_users")]
    pub total_users: u64,
    #[serde(default, alias = "total_sellers")]
    pub total_sellers: u64,
    #[serde(default, alias = "total_orders")]
    pub total_orders: u64,
    #[serde(default, alias = "total_revenue")]
    pub total_revenue: f64,
    #[serde(default, alias = "pending_orders")]
    pub pending_orders: u64,
}
