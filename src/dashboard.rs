//! Dashboard summary widgets

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::auth::Role;
use crate::error::Result;
use crate::fetch::Transport;

/// A user shown in the "recent users" widget
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn list_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<RecentUser>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

/// Totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub total_income: f64,
    pub total_sales: f64,
    pub new_users: u64,
    #[serde(deserialize_with = "list_or_empty")]
    pub recent_users: Vec<RecentUser>,
}

impl DashboardStats {
    /// Income plus sales minus expenses
    pub fn net_profit(&self) -> f64 {
        self.total_income + self.total_sales - self.total_expenses
    }
}

/// Client for the dashboard endpoint
pub struct DashboardClient {
    transport: Transport,
}

impl DashboardClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the aggregate stats
    pub async fn stats(&self) -> Result<DashboardStats> {
        self.transport
            .request(Method::GET, "/dashboard")
            .execute::<DashboardStats>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let stats: DashboardStats =
            serde_json::from_value(json!({ "totalIncome": 500, "recentUsers": null })).unwrap();
        assert_eq!(stats.total_income, 500.0);
        assert_eq!(stats.total_sales, 0.0);
        assert!(stats.recent_users.is_empty());
    }

    #[test]
    fn test_net_profit() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalExpenses": 300,
            "totalIncome": 1000,
            "totalSales": 450.5,
            "newUsers": 2,
            "recentUsers": [{ "_id": "u1", "name": "Ada", "role": "admin" }]
        }))
        .unwrap();
        assert_eq!(stats.net_profit(), 1150.5);
        assert_eq!(stats.recent_users[0].role, Some(Role::Admin));
    }
}
