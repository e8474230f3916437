use super::sparsity::{report_split_sparsity, FoldSparsity};
use super::splitters::{DataSplitter, Fold, SplitRegime};
use crate::engines::metrics::{ErrorReport, MetricsEngine};
use crate::error::{DemandError, Result};
use crate::types::DailySeries;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Forecasts for the train and validation positions of one fold
#[derive(Debug, Clone, PartialEq)]
pub struct FoldForecast {
    pub train: Vec<f64>,
    pub validation: Vec<f64>,
}

/// Trains on a fold's train positions and predicts both sides.
///
/// Implemented by the model layer; nothing here fits models.
pub trait FoldPredictor: Send + Sync {
    fn predict(&self, series: &DailySeries, fold: &Fold) -> Result<FoldForecast>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldEvaluation {
    pub fold_num: usize,
    pub validation_year: Option<i32>,
    pub errors: ErrorReport,
    pub sparsity: FoldSparsity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub item: String,
    pub method: String,
    pub regime: SplitRegime,
    pub folds: Vec<FoldEvaluation>,
    pub aggregate_metrics: HashMap<String, f64>,
}

pub struct CrossValidator<S: DataSplitter> {
    splitter: S,
}

impl<S: DataSplitter> CrossValidator<S> {
    pub fn new(splitter: S) -> Self {
        Self { splitter }
    }

    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    pub fn evaluate<P: FoldPredictor>(
        &self,
        series: &DailySeries,
        predictor: &P,
    ) -> Result<CrossValidationReport> {
        let plan = self.splitter.split(series)?;
        let actual = series.sales_qty();
        let sparsity = report_split_sparsity(&plan, &actual)?;

        let mut folds = Vec::with_capacity(plan.len());
        for (fold, fold_sparsity) in plan.folds.iter().zip(sparsity) {
            let forecast = predictor.predict(series, fold)?;
            let y_train = &actual[fold.train.clone()];
            let y_test = &actual[fold.validation.clone()];

            if forecast.train.len() != y_train.len() {
                return Err(DemandError::DimensionMismatch {
                    expected: y_train.len(),
                    got: forecast.train.len(),
                });
            }
            if forecast.validation.len() != y_test.len() {
                return Err(DemandError::DimensionMismatch {
                    expected: y_test.len(),
                    got: forecast.validation.len(),
                });
            }

            let errors = MetricsEngine::calculate_errors(
                y_train,
                y_test,
                &forecast.train,
                &forecast.validation,
            )?;

            folds.push(FoldEvaluation {
                fold_num: fold.fold_num,
                validation_year: fold.validation_year,
                errors,
                sparsity: fold_sparsity,
            });
        }

        let aggregate_metrics = aggregate_metrics(&folds);

        Ok(CrossValidationReport {
            item: series.item().to_string(),
            method: self.splitter.name().to_string(),
            regime: plan.regime,
            folds,
            aggregate_metrics,
        })
    }

    /// Evaluate items independently in parallel; fails on the first error
    pub fn evaluate_items<P: FoldPredictor>(
        &self,
        series: &[DailySeries],
        predictor: &P,
    ) -> Result<Vec<CrossValidationReport>> {
        series
            .par_iter()
            .map(|s| self.evaluate(s, predictor))
            .collect()
    }
}

fn aggregate_metrics(folds: &[FoldEvaluation]) -> HashMap<String, f64> {
    let mut aggregated = HashMap::new();

    if folds.is_empty() {
        return aggregated;
    }

    let metrics: [(&str, fn(&ErrorReport) -> f64); 2] = [
        ("test_wmape", |e: &ErrorReport| e.test_wmape),
        ("test_wbias", |e: &ErrorReport| e.test_wbias),
    ];

    for (name, get) in metrics {
        let values: Vec<f64> = folds.iter().map(|f| get(&f.errors)).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        aggregated.insert(format!("{}_mean", name), mean);
        aggregated.insert(format!("{}_std", name), calculate_std(&values, mean));
        aggregated.insert(
            format!("{}_min", name),
            values.iter().copied().fold(f64::INFINITY, f64::min),
        );
        aggregated.insert(
            format!("{}_max", name),
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        );
    }

    aggregated
}

fn calculate_std(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::validation::splitters::RollingOriginSplitter;
    use crate::types::DailyObservation;
    use chrono::NaiveDate;

    struct ConstantPredictor(f64);

    impl FoldPredictor for ConstantPredictor {
        fn predict(&self, _series: &DailySeries, fold: &Fold) -> Result<FoldForecast> {
            Ok(FoldForecast {
                train: vec![self.0; fold.train_len()],
                validation: vec![self.0; fold.validation_len()],
            })
        }
    }

    struct ShortPredictor;

    impl FoldPredictor for ShortPredictor {
        fn predict(&self, _series: &DailySeries, fold: &Fold) -> Result<FoldForecast> {
            Ok(FoldForecast {
                train: vec![0.0; fold.train_len()],
                validation: vec![0.0; fold.validation_len().saturating_sub(1)],
            })
        }
    }

    fn constant_series(item: &str, first_year: i32, last_year: i32, qty: i64) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(first_year, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(last_year, 12, 31).unwrap();
        let obs = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| DailyObservation::new(d, qty, qty as f64 * 2.0, Some(2.0)))
            .collect();
        DailySeries::new(item, obs).unwrap()
    }

    #[test]
    fn test_perfect_predictor_scores_zero() {
        let validator = CrossValidator::new(RollingOriginSplitter::new(2, 0.7).unwrap());
        let series = constant_series("cola", 2015, 2018, 4);

        let report = validator.evaluate(&series, &ConstantPredictor(4.0)).unwrap();

        assert_eq!(report.regime, SplitRegime::SlidingWindow);
        assert_eq!(report.folds.len(), 2);
        assert_eq!(report.folds[0].validation_year, Some(2017));
        assert_eq!(report.folds[1].validation_year, Some(2018));
        assert_eq!(report.aggregate_metrics["test_wmape_mean"], 0.0);
        assert_eq!(report.aggregate_metrics["test_wbias_std"], 0.0);
        assert_eq!(report.folds[0].sparsity.validation_sparsity, Some(0.0));
    }

    #[test]
    fn test_over_forecast_bias() {
        let validator = CrossValidator::new(RollingOriginSplitter::new(2, 0.7).unwrap());
        let series = constant_series("cola", 2016, 2018, 4);

        let report = validator.evaluate(&series, &ConstantPredictor(5.0)).unwrap();

        assert_eq!(report.regime, SplitRegime::SingleHoldout);
        assert_eq!(report.folds[0].errors.test_wbias, 25.0);
        assert_eq!(report.folds[0].errors.test_wmape, 25.0);
    }

    #[test]
    fn test_forecast_length_mismatch() {
        let validator = CrossValidator::new(RollingOriginSplitter::new(2, 0.7).unwrap());
        let series = constant_series("cola", 2016, 2018, 4);

        let result = validator.evaluate(&series, &ShortPredictor);
        assert!(matches!(result, Err(DemandError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_evaluate_items_keeps_order() {
        let validator = CrossValidator::new(RollingOriginSplitter::new(3, 0.7).unwrap());
        let items = vec![
            constant_series("a", 2018, 2019, 1),
            constant_series("b", 2014, 2019, 2),
            constant_series("c", 2017, 2019, 3),
        ];

        let reports = validator.evaluate_items(&items, &ConstantPredictor(1.0)).unwrap();

        let names: Vec<&str> = reports.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(reports[0].regime, SplitRegime::InsufficientHistory);
        assert_eq!(reports[1].regime, SplitRegime::SlidingWindow);
        assert_eq!(reports[1].folds.len(), 3);
        assert_eq!(reports[2].regime, SplitRegime::SingleHoldout);
    }
}
