// src/engines/metrics/engine.rs
use super::scoring::{bias, wbias, wmape};
use crate::error::Result;
use chrono::{Datelike, Duration, Months, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Train and test accuracy of one fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub train_wmape: f64,
    pub test_wmape: f64,
    pub train_wbias: f64,
    pub test_wbias: f64,
}

/// Actual sales next to the model's prediction for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub date: NaiveDate,
    pub actual: f64,
    pub prediction: f64,
}

impl PredictionRecord {
    pub fn new(date: NaiveDate, actual: f64, prediction: f64) -> Self {
        Self {
            date,
            actual,
            prediction,
        }
    }
}

/// Score of one item over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub item: String,
    pub wbias: f64,
    pub wmape: f64,
    pub total_sales: f64,
    pub total_prediction: f64,
}

/// Year-to-date forecast KPIs compared with the same period a year earlier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YoyKpis {
    pub wmape_pp_change: f64,
    pub bias_pp_change: f64,
    pub this_year_wmape: f64,
    pub this_year_bias: f64,
}

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn calculate_errors(
        y_train: &[f64],
        y_test: &[f64],
        pred_train: &[f64],
        pred_test: &[f64],
    ) -> Result<ErrorReport> {
        let report = ErrorReport {
            train_wmape: wmape(y_train, pred_train)?,
            test_wmape: wmape(y_test, pred_test)?,
            train_wbias: wbias(y_train, pred_train)?,
            test_wbias: wbias(y_test, pred_test)?,
        };

        log::info!(
            "Train WMAPE: {} | Test WMAPE: {} | Train WBias: {} | Test WBias: {}",
            report.train_wmape,
            report.test_wmape,
            report.train_wbias,
            report.test_wbias
        );

        Ok(report)
    }

    /// Score every item over `[current_date - window_days, current_date - 1]`.
    ///
    /// Items without rows in the window are left out. The result is sorted by
    /// total sales, largest first.
    pub fn scores_per_item(
        records_by_item: &HashMap<String, Vec<PredictionRecord>>,
        current_date: NaiveDate,
        window_days: i64,
    ) -> Result<Vec<ItemScore>> {
        let window_start = current_date - Duration::days(window_days);
        let window_end = current_date - Duration::days(1);

        let scored: Result<Vec<Option<ItemScore>>> = records_by_item
            .par_iter()
            .map(|(item, records)| {
                let (actual, prediction) = Self::unzip(
                    records
                        .iter()
                        .filter(|r| r.date >= window_start && r.date <= window_end),
                );
                if actual.is_empty() {
                    return Ok(None);
                }

                Ok(Some(ItemScore {
                    item: item.clone(),
                    wbias: wbias(&actual, &prediction)?,
                    wmape: wmape(&actual, &prediction)?,
                    total_sales: actual.iter().sum(),
                    total_prediction: prediction.iter().sum(),
                }))
            })
            .collect();

        let mut scores: Vec<ItemScore> = scored?.into_iter().flatten().collect();
        scores.sort_by(|a, b| {
            b.total_sales
                .total_cmp(&a.total_sales)
                .then_with(|| a.item.cmp(&b.item))
        });

        Ok(scores)
    }

    /// Year-to-date WMAPE and bias against the same stretch of last year.
    ///
    /// Bias here is the unguarded [`bias`], so a period with zero total
    /// prediction fails instead of reporting a number.
    pub fn year_over_year(records: &[PredictionRecord], current_date: NaiveDate) -> Result<YoyKpis> {
        let current_year = current_date.year();
        let last_year = current_year - 1;
        let year_ago_date = current_date
            .checked_sub_months(Months::new(12))
            .unwrap_or(current_date - Duration::days(365));

        let (last_actual, last_prediction) = Self::unzip(
            records
                .iter()
                .filter(|r| r.date.year() == last_year && r.date < year_ago_date),
        );
        let (this_actual, this_prediction) = Self::unzip(
            records
                .iter()
                .filter(|r| r.date.year() == current_year && r.date < current_date),
        );

        let last_year_wmape = wmape(&last_actual, &last_prediction)?;
        let this_year_wmape = wmape(&this_actual, &this_prediction)?;
        let last_year_bias = bias(&last_actual, &last_prediction)?;
        let this_year_bias = bias(&this_actual, &this_prediction)?;

        Ok(YoyKpis {
            wmape_pp_change: last_year_wmape - this_year_wmape,
            bias_pp_change: last_year_bias.abs() - this_year_bias.abs(),
            this_year_wmape,
            this_year_bias,
        })
    }

    fn unzip<'a>(records: impl Iterator<Item = &'a PredictionRecord>) -> (Vec<f64>, Vec<f64>) {
        records.map(|r| (r.actual, r.prediction)).unzip()
    }
}
