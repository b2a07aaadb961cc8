use chrono::{DateTime, Days, NaiveDate};
use serde::Deserialize;

use crate::error::{Error, Result};

/// One trading day of the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Date-ascending close series, one point per trading day. Non-trading
/// days and provider outages show up as missing dates, not as nulls.
pub type IndexSeries = Vec<IndexPoint>;

#[derive(Debug, Clone)]
pub struct IndexClient {
    pub base_url: String,
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

impl IndexClient {
    pub fn new(base_url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            symbol: symbol.into(),
        }
    }

    /// Daily closes over the closed interval `[start, end]`.
    pub async fn daily_series(&self, start: NaiveDate, end: NaiveDate) -> Result<IndexSeries> {
        let period1 = midnight_utc(start);
        // provider treats period2 as exclusive
        let period2 = midnight_utc(end.checked_add_days(Days::new(1)).unwrap_or(end));

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, self.symbol, period1, period2
        );

        let client = reqwest::Client::new();
        let response = client.get(&url).send().await?.error_for_status()?;
        let payload: ChartResponse = response.json().await?;

        if let Some(err) = payload.chart.error {
            return Err(Error::MarketData(err.to_string()));
        }
        let data = payload
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| Error::MarketData("empty chart result".to_string()))?;

        let timestamps = data.timestamp.unwrap_or_default();
        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|q| q.close)
            .unwrap_or_default();

        let mut series: IndexSeries = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = close?;
                let date = DateTime::from_timestamp(ts, 0)?.date_naive();
                Some(IndexPoint { date, close })
            })
            .collect();
        series.sort_by_key(|p| p.date);

        tracing::debug!(
            symbol = %self.symbol,
            points = series.len(),
            "fetched index series"
        );
        Ok(series)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
        .timestamp()
}
