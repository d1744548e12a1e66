use chrono::NaiveDate;
use tracing::{info, warn};

use crate::errors::MoodError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{MoodDistribution, MoodLabel};

/// Daily change (in percent) above which a day counts as positive.
pub const POSITIVE_THRESHOLD_PCT: f64 = 0.5;
/// Daily change (in percent) below which a day counts as negative.
pub const NEGATIVE_THRESHOLD_PCT: f64 = -0.5;

pub fn classify(pct_change: f64) -> MoodLabel {
    if pct_change > POSITIVE_THRESHOLD_PCT {
        MoodLabel::Positive
    } else if pct_change < NEGATIVE_THRESHOLD_PCT {
        MoodLabel::Negative
    } else {
        MoodLabel::Neutral
    }
}

/// Percentage change of each close versus the previous one.
/// The first close has no predecessor and yields nothing.
pub fn daily_changes(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect()
}

/// Share of classified days per mood label, in percent.
pub fn mood_distribution(closes: &[f64]) -> Result<MoodDistribution, MoodError> {
    if closes.is_empty() {
        return Err(MoodError::NoData);
    }

    let changes = daily_changes(closes);
    if changes.is_empty() {
        return Err(MoodError::InsufficientData);
    }

    let mut counts = MoodDistribution::new();
    for change in &changes {
        *counts.entry(classify(*change)).or_insert(0.0) += 1.0;
    }

    let total = changes.len() as f64;
    for share in counts.values_mut() {
        *share = *share / total * 100.0;
    }

    Ok(counts)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, MoodError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| MoodError::InvalidDate(value.to_string()))
}

/// Fetch daily closes for `symbol` over `[start_date, end_date)` and compute
/// the Market Mood Index.
pub async fn calculate_market_mood_index(
    provider: &dyn PriceProvider,
    symbol: &str,
    start_date: &str,
    end_date: &str,
) -> Result<MoodDistribution, MoodError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if start >= end {
        return Err(MoodError::InvalidRange);
    }

    let points = provider
        .fetch_daily_range(symbol, start, end)
        .await
        .map_err(|e| match e {
            PriceProviderError::NotFound => MoodError::NoData,
            other => MoodError::Provider(other),
        })?;

    if points.is_empty() {
        warn!("No price data for {} between {} and {}", symbol, start, end);
    }

    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
    let distribution = mood_distribution(&closes)?;

    info!(
        "Computed mood index for {} over {} trading days: {:?}",
        symbol,
        closes.len(),
        distribution
    );

    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::external::price_provider::ExternalPricePoint;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(0.6), MoodLabel::Positive);
        assert_eq!(classify(0.5), MoodLabel::Neutral);
        assert_eq!(classify(0.0), MoodLabel::Neutral);
        assert_eq!(classify(-0.5), MoodLabel::Neutral);
        assert_eq!(classify(-0.51), MoodLabel::Negative);
    }

    #[test]
    fn test_one_of_each_label() {
        let distribution = mood_distribution(&[100.0, 100.6, 99.0, 99.0]).unwrap();

        assert_eq!(distribution.len(), 3);
        for label in [MoodLabel::Positive, MoodLabel::Negative, MoodLabel::Neutral] {
            assert!((distribution[&label] - 100.0 / 3.0).abs() < EPS);
        }
    }

    #[test]
    fn test_first_day_is_not_classified() {
        let changes = daily_changes(&[100.0, 100.6, 99.0, 99.0]);
        assert_eq!(changes.len(), 3);
        assert!((changes[0] - 0.6).abs() < 1e-9);
        assert!((changes[1] - (-1.5905)).abs() < 1e-3);
        assert_eq!(changes[2], 0.0);
    }

    #[test]
    fn test_unobserved_labels_are_absent() {
        let distribution = mood_distribution(&[100.0, 102.0, 104.0, 104.1]).unwrap();

        assert!(!distribution.contains_key(&MoodLabel::Negative));
        assert!((distribution[&MoodLabel::Positive] - 200.0 / 3.0).abs() < EPS);
        assert!((distribution[&MoodLabel::Neutral] - 100.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let closes = [
            210.0, 211.3, 209.8, 209.9, 215.2, 214.0, 214.0, 220.5, 219.1, 218.0, 218.9,
        ];
        let distribution = mood_distribution(&closes).unwrap();
        let total: f64 = distribution.values().sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert!(matches!(mood_distribution(&[]), Err(MoodError::NoData)));
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        assert!(matches!(mood_distribution(&[100.0]), Err(MoodError::InsufficientData)));
    }

    struct FixedProvider(Vec<f64>);

    #[async_trait]
    impl PriceProvider for FixedProvider {
        async fn fetch_daily_range(
            &self,
            _ticker: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            Ok(self.0
                .iter()
                .enumerate()
                .map(|(i, close)| ExternalPricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    close: *close,
                })
                .collect())
        }
    }

    struct NotFoundProvider;

    #[async_trait]
    impl PriceProvider for NotFoundProvider {
        async fn fetch_daily_range(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            Err(PriceProviderError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_calculate_with_provider() {
        let provider = FixedProvider(vec![100.0, 100.6, 99.0, 99.0]);
        let distribution =
            calculate_market_mood_index(&provider, "^BSESN", "2024-01-01", "2024-01-05")
                .await
                .unwrap();
        assert_eq!(distribution.len(), 3);
    }

    #[tokio::test]
    async fn test_calculate_rejects_bad_dates() {
        let provider = FixedProvider(vec![100.0, 101.0]);

        let result = calculate_market_mood_index(&provider, "^BSESN", "01/01/2024", "2024-02-01").await;
        assert!(matches!(result, Err(MoodError::InvalidDate(d)) if d == "01/01/2024"));

        let result = calculate_market_mood_index(&provider, "^BSESN", "2024-02-01", "2024-01-01").await;
        assert!(matches!(result, Err(MoodError::InvalidRange)));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_no_data() {
        let result =
            calculate_market_mood_index(&NotFoundProvider, "NOPE", "2024-01-01", "2024-02-01").await;
        assert!(matches!(result, Err(MoodError::NoData)));
    }
}
