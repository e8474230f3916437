// src/engines/metrics/scoring.rs
//! Weighted forecast accuracy metrics.
//!
//! `wmape` and `wbias` substitute a denominator of `1.0` when actuals sum to
//! zero, so they never fail on sparse demand. `bias` has no such guard: a zero
//! forecast total is reported as [`DemandError::DivisionByZero`].
use crate::error::{DemandError, Result};
use crate::types::ScoreResult;

/// Weighted mean absolute percentage error, rounded to 2 decimals.
pub fn wmape(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_lengths(actual, forecast)?;

    let numerator: f64 = actual
        .iter()
        .zip(forecast)
        .map(|(a, f)| (a - f).abs())
        .sum();

    Ok(round2(numerator / guarded_total(actual) * 100.0))
}

/// Weighted bias, rounded to 2 decimals.
///
/// Positive values mean the forecast overshoots, negative values that it
/// undershoots.
pub fn wbias(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_lengths(actual, forecast)?;

    let numerator: f64 = actual.iter().zip(forecast).map(|(a, f)| f - a).sum();

    Ok(round2(numerator / guarded_total(actual) * 100.0))
}

/// Total bias `100 * (1 - sum(actual) / sum(forecast))`, unrounded.
pub fn bias(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_lengths(actual, forecast)?;

    let actual_total: f64 = actual.iter().sum();
    let forecast_total: f64 = forecast.iter().sum();

    // Not guarded like wmape/wbias; callers must see the failure.
    if forecast_total == 0.0 {
        return Err(DemandError::DivisionByZero(format!(
            "bias: forecast total is zero (actual total {})",
            actual_total
        )));
    }

    Ok((1.0 - actual_total / forecast_total) * 100.0)
}

/// `wmape` and `wbias` of the same pair
pub fn score(actual: &[f64], forecast: &[f64]) -> Result<ScoreResult> {
    Ok(ScoreResult {
        wmape: wmape(actual, forecast)?,
        wbias: wbias(actual, forecast)?,
    })
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn guarded_total(actual: &[f64]) -> f64 {
    let total: f64 = actual.iter().sum();
    if total == 0.0 {
        1.0
    } else {
        total
    }
}

fn check_lengths(actual: &[f64], forecast: &[f64]) -> Result<()> {
    if actual.len() != forecast.len() {
        return Err(DemandError::DimensionMismatch {
            expected: actual.len(),
            got: forecast.len(),
        });
    }
    Ok(())
}
