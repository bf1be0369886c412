//! Raw daily series to feature table.

use chrono::NaiveDate;
use tracing::{debug, error};

use super::indicators::{ema, macd, pct_change, sma};
use crate::error::PredictError;
use crate::types::{FeatureRow, RawBar, RawSeries};

pub const SMA_SHORT: usize = 5;
pub const SMA_LONG: usize = 20;
pub const EMA_FAST: usize = 12;
pub const EMA_SLOW: usize = 26;

/// Leading trading days that can never produce a complete row.
pub const WARMUP_DAYS: usize = EMA_SLOW - 1;

/// A parsed daily bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_field(name: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| format!("could not convert {} value {:?}: {}", name, raw, e))
}

fn parse_bar(date: &str, raw: &RawBar) -> Result<Bar, String> {
    Ok(Bar {
        date: NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid date {:?}: {}", date, e))?,
        open: parse_field("open", &raw.open)?,
        high: parse_field("high", &raw.high)?,
        low: parse_field("low", &raw.low)?,
        close: parse_field("close", &raw.close)?,
        volume: parse_field("volume", &raw.volume)?,
    })
}

/// Build the feature table for a raw series.
///
/// Rows come back in ascending date order. Any unparseable value fails the
/// whole series; rows whose rolling windows are not yet full are dropped.
pub fn build_features(series: &RawSeries) -> Result<Vec<FeatureRow>, PredictError> {
    let mut bars = series
        .iter()
        .map(|(date, raw)| parse_bar(date, raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|detail| {
            error!("Data processing error: {}", detail);
            PredictError::DataProcessing
        })?;

    bars.sort_by_key(|b| b.date);

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let returns = pct_change(&closes);
    let sma_short = sma(&closes, SMA_SHORT);
    let sma_long = sma(&closes, SMA_LONG);
    let ema_fast = ema(&closes, EMA_FAST);
    let ema_slow = ema(&closes, EMA_SLOW);
    let macd_line = macd(&ema_fast, &ema_slow);

    let rows: Vec<FeatureRow> = bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            Some(FeatureRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                daily_return: returns[i]?,
                sma_5: sma_short[i]?,
                sma_20: sma_long[i]?,
                ema_12: ema_fast[i]?,
                ema_26: ema_slow[i]?,
                macd: macd_line[i]?,
            })
        })
        .collect();

    debug!(
        "Built {} feature rows from {} daily bars",
        rows.len(),
        bars.len()
    );

    Ok(rows)
}
