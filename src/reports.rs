//! Financial reports over a date range

use chrono::NaiveDate;
use reqwest::Method;
use serde::Deserialize;

use crate::entity::{Expense, Income, Sale};
use crate::error::{Error, Result};
use crate::fetch::Transport;

/// Filters for a report; unset filters are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub report_type: Option<String>,
}

impl ReportQuery {
    /// An unfiltered query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first day of the range
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set the last day of the range
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Set the report type (e.g. "monthly")
    pub fn with_report_type(mut self, report_type: &str) -> Self {
        self.report_type = Some(report_type.to_string());
        self
    }

    fn validate(&self) -> Result<()> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(Error::validation(
                "Start date must not be after end date",
            )),
            _ => Ok(()),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
        vec![
            ("startDate", self.start_date.map(fmt).unwrap_or_default()),
            ("endDate", self.end_date.map(fmt).unwrap_or_default()),
            ("reportType", self.report_type.clone().unwrap_or_default()),
        ]
    }
}

/// A report computed by the server
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_sales: f64,
    pub net_profit: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub income: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub sales: Vec<Sale>,
}

impl Report {
    /// Income plus sales
    pub fn gross_income(&self) -> f64 {
        self.total_income + self.total_sales
    }
}

/// Client for the reports endpoint
pub struct ReportsClient {
    transport: Transport,
}

impl ReportsClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the report matching `query`
    pub async fn fetch(&self, query: &ReportQuery) -> Result<Report> {
        query.validate()?;

        let mut request = self.transport.request(Method::GET, "/reports");
        for (key, value) in query.params() {
            request = request.query(key, &value);
        }
        request.execute::<Report>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_params_format() {
        let query = ReportQuery::new()
            .with_start_date(date(2024, 1, 1))
            .with_end_date(date(2024, 1, 31));
        let params = query.params();
        assert_eq!(params[0], ("startDate", "2024-01-01".to_string()));
        assert_eq!(params[1], ("endDate", "2024-01-31".to_string()));
        assert_eq!(params[2], ("reportType", String::new()));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let query = ReportQuery::new()
            .with_start_date(date(2024, 2, 1))
            .with_end_date(date(2024, 1, 1));
        assert!(matches!(query.validate(), Err(Error::Validation(_))));
    }
}
