//! Small descriptive statistics used by the price digest and the sentiment summarizer.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Simple moving average over the trailing `period` values.
/// Returns `None` when there is not enough data.
pub fn trailing_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(mean(&data[data.len() - period..]))
}

/// Simple (close-to-close) returns.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Annualized volatility of daily returns, assuming 252 trading days.
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    let returns = simple_returns(closes);
    if returns.len() < 2 {
        return None;
    }
    Some(std_dev(&returns) * 252f64.sqrt())
}
