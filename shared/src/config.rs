use chrono::{Datelike, NaiveDate, Utc};
use dotenv::dotenv;

use crate::chart::ChartStyle;

/// What to do with a flow row whose date cell does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Drop the row without a trace.
    Skip,
    /// Drop the row and log it at warn level.
    Warn,
    /// Fail the whole request.
    Error,
}

impl DatePolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Some(DatePolicy::Skip),
            "warn" => Some(DatePolicy::Warn),
            "error" => Some(DatePolicy::Error),
            _ => None,
        }
    }
}

pub struct Config {
    pub bind_addr: String,
    /// The single shared static password for the entry gate.
    pub senha: String,
    pub flow_url: String,
    pub market_data_base_url: String,
    pub index_symbol: String,
    /// First day of the analysis window; the window always ends today.
    pub window_start: NaiveDate,
    pub date_policy: DatePolicy,
    pub chart: ChartStyle,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        let window_start = match std::env::var("WINDOW_START") {
            Ok(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
            Err(_) => NaiveDate::from_ymd_opt(Utc::now().year(), 1, 1)
                .expect("january 1st is a valid date"),
        };

        let mut chart = ChartStyle::default();
        chart.watermark = std::env::var("CHART_WATERMARK").ok().filter(|s| !s.is_empty());

        Ok(Config {
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            senha: std::env::var("APP_SENHA")
                .unwrap_or_else(|_| "fluxo2025".to_string()),
            flow_url: std::env::var("FLOW_URL")
                .unwrap_or_else(|_| "https://www.dadosdemercado.com.br/fluxo".to_string()),
            market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            index_symbol: std::env::var("INDEX_SYMBOL")
                .unwrap_or_else(|_| "^BVSP".to_string()),
            window_start,
            date_policy: std::env::var("DATE_POLICY")
                .ok()
                .and_then(|s| DatePolicy::parse(&s))
                .unwrap_or(DatePolicy::Warn),
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_policy_parse() {
        assert_eq!(DatePolicy::parse("warn"), Some(DatePolicy::Warn));
        assert_eq!(DatePolicy::parse("ERROR"), Some(DatePolicy::Error));
        assert_eq!(DatePolicy::parse("whatever"), None);
    }
}
