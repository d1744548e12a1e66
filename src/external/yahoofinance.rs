use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance provider - free chart API, no key required.
///
/// Index symbols such as `^BSESN` are accepted as-is; the symbol always
/// occupies a single path segment.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; MarketMood/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, ticker: &str) -> Result<url::Url, PriceProviderError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| PriceProviderError::BadResponse(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::BadResponse("base url cannot have a path".into()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: Option<YahooMeta>,
    // Absent when the range holds no trading days.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn unix_start_of(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Turn a chart payload into ascending points restricted to `[start, end)`.
fn parse_chart(
    body: YahooChartResponse,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let results = body.chart.result
        .ok_or_else(|| PriceProviderError::BadResponse("No results in response".into()))?;

    let Some(result) = results.into_iter().next() else {
        return Ok(Vec::new());
    };

    if result.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let closes = &result.indicators.quote
        .first()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?
        .close;

    if result.timestamp.len() != closes.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into()
        ));
    }

    // Bars are dated in exchange-local time.
    let offset = result.meta.as_ref().map_or(0, |meta| meta.gmtoffset);

    let mut points: Vec<ExternalPricePoint> = result.timestamp
        .iter()
        .zip(closes.iter())
        .filter_map(|(timestamp, close_opt)| {
            // Skip null values (market holidays, etc.)
            let close = (*close_opt)?;
            let date = chrono::DateTime::from_timestamp(*timestamp + offset, 0)
                .map(|dt| dt.date_naive())?;
            Some(ExternalPricePoint { date, close })
        })
        .filter(|p| p.date >= start && p.date < end)
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(points)
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = self.chart_url(ticker)?;
        let period1 = unix_start_of(start).to_string();
        let period2 = unix_start_of(end).to_string();

        info!("Fetching daily closes for {} from {} to {}", ticker, start, end);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("interval", "1d"),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!("Yahoo Finance has no chart for {}", ticker);
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let points = parse_chart(body, start, end)?;
        info!("Received {} daily closes for {}", points.len(), ticker);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn chart(json: serde_json::Value) -> YahooChartResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parse_chart_skips_null_closes_and_sorts() {
        // 2024-01-03, 2024-01-02, 2024-01-04 at 03:45 UTC
        let body = chart(serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1704253500, 1704167100, 1704339900],
                    "indicators": { "quote": [{ "close": [101.0, 100.0, null] }] }
                }],
                "error": null
            }
        }));

        let points = parse_chart(body, date("2024-01-01"), date("2024-01-10")).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date("2024-01-02"));
        assert_eq!(points[0].close, 100.0);
        assert_eq!(points[1].date, date("2024-01-03"));
    }

    #[test]
    fn test_parse_chart_excludes_end_date() {
        let body = chart(serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1704167100, 1704253500],
                    "indicators": { "quote": [{ "close": [100.0, 101.0] }] }
                }],
                "error": null
            }
        }));

        let points = parse_chart(body, date("2024-01-01"), date("2024-01-03")).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, date("2024-01-02"));
    }

    #[test]
    fn test_parse_chart_uses_exchange_local_dates() {
        // ASX bars open at 10:00 AEDT, i.e. 23:00 UTC on the previous day:
        // 2024-01-02 and 2024-01-03 local.
        let body = chart(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "^AXJO", "gmtoffset": 39600 },
                    "timestamp": [1704150000, 1704236400],
                    "indicators": { "quote": [{ "close": [7500.0, 7560.0] }] }
                }],
                "error": null
            }
        }));

        let points = parse_chart(body, date("2024-01-02"), date("2024-01-04")).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date("2024-01-02"));
        assert_eq!(points[1].date, date("2024-01-03"));
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = chart(serde_json::json!({
            "chart": {
                "result": [{ "indicators": { "quote": [{}] } }],
                "error": null
            }
        }));

        let points = parse_chart(body, date("2024-01-06"), date("2024-01-07")).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_parse_chart_maps_no_data_error() {
        let body = chart(serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }));

        let result = parse_chart(body, date("2024-01-01"), date("2024-02-01"));
        assert!(matches!(result, Err(PriceProviderError::NotFound)));
    }

    #[test]
    fn test_chart_url_keeps_symbol_in_one_segment() {
        let provider = YahooFinanceProvider::new(DEFAULT_YAHOO_BASE_URL);

        let url = provider.chart_url("^BSESN").unwrap();
        assert_eq!(url.host_str(), Some("query1.finance.yahoo.com"));
        assert!(url.path().starts_with("/v8/finance/chart/"));
        assert!(url.path().ends_with("BSESN"));

        let url = provider.chart_url("BRK/B").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BRK%2FB");
    }
}
