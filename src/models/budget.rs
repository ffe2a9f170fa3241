use serde::{Deserialize, Serialize};

/// Grocery budget for the current period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    #[serde(alias = "weeklyLimit", alias = "limit", alias = "amount")]
    pub weekly_limit: f64,
    #[serde(default, alias = "spentAmount")]
    pub spent: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_period() -> String {
    "weekly".to_string()
}

/// Derived figures shown on the budget card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    pub remaining: f64,
    /// Share of the limit spent, 0-100+; may exceed 100 when over budget
    pub percent_used: f64,
    pub over_budget: bool,
}

impl Budget {
    pub fn summary(&self) -> BudgetSummary {
        let percent_used = if self.weekly_limit > 0.0 {
            self.spent / self.weekly_limit * 100.0
        } else if self.spent > 0.0 {
            100.0
        } else {
            0.0
        };

        BudgetSummary {
            remaining: self.weekly_limit - self.spent,
            percent_used,
            over_budget: self.spent > self.weekly_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub weekly_limit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(limit: f64, spent: f64) -> Budget {
        Budget {
            weekly_limit: limit,
            spent,
            currency: default_currency(),
            period: default_period(),
        }
    }

    #[test]
    fn test_summary_under_budget() {
        let summary = budget(80.0, 20.0).summary();
        assert_eq!(summary.remaining, 60.0);
        assert_eq!(summary.percent_used, 25.0);
        assert!(!summary.over_budget);
    }

    #[test]
    fn test_summary_over_budget() {
        let summary = budget(50.0, 75.0).summary();
        assert_eq!(summary.remaining, -25.0);
        assert_eq!(summary.percent_used, 150.0);
        assert!(summary.over_budget);
    }

    #[test]
    fn test_summary_zero_limit() {
        assert_eq!(budget(0.0, 0.0).summary().percent_used, 0.0);
        assert_eq!(budget(0.0, 3.0).summary().percent_used, 100.0);
    }

    #[test]
    fn test_budget_aliases() {
        let budget: Budget = serde_json::from_str(r#"{"limit": 120, "spentAmount": 30.5}"#).unwrap();
        assert_eq!(budget.weekly_limit, 120.0);
        assert_eq!(budget.currency, "USD");
    }
}
