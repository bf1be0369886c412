//! Rolling indicator series over daily closes.
//!
//! Each function returns one entry per input value, `None` where the window
//! is not yet full. Callers line the series up by index.

/// Percentage change from the previous value, as a fraction.
///
/// A zero previous value yields a non-finite change, not `None`; the model
/// rejects non-finite inputs.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    out.push(None);
    for window in values.windows(2) {
        out.push(Some((window[1] - window[0]) / window[0]));
    }
    out
}

/// Trailing simple moving average over `period` values.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values.iter().take(period).sum();
    out[period - 1] = Some(sum / period as f64);

    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Exponential moving average with smoothing `2 / (span + 1)`.
///
/// The recursion starts from the first value with no bias adjustment. Values
/// are only reported once `span` observations have been seen.
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if span == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ema = None;

    for (i, &value) in values.iter().enumerate() {
        let next = match ema {
            None => value,
            Some(prev) => (value - prev) * alpha + prev,
        };
        ema = Some(next);
        out.push(if i + 1 >= span { Some(next) } else { None });
    }
    out
}

/// MACD line: fast EMA minus slow EMA, defined where both are.
pub fn macd(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Option<f64>> {
    fast.iter()
        .zip(slow.iter())
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect()
}
