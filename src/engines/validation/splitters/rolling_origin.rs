use super::base::DataSplitter;
use super::types::{Fold, SplitPlan, SplitRegime, YearPartition};
use crate::config::ValidationConfig;
use crate::error::{DemandError, Result};
use crate::types::DailySeries;

/// Year-granular rolling-origin cross-validation.
///
/// With `k` calendar years in the series and a window of `n` training years:
///
/// * `k < n`: two positional folds. The first trains on the leading
///   `percentage_cut` share; the remainder is halved between the first
///   validation window and the second fold's growth.
/// * `k == n` or `k == n + 1`: one fold holding out the last year and
///   training on every earlier year.
/// * `k > n + 1`: `k - n` folds; fold `i` trains on years `i..i+n` and
///   validates on year `i+n`.
#[derive(Debug, Clone)]
pub struct RollingOriginSplitter {
    num_train_years: usize,
    percentage_cut: f64,
}

impl RollingOriginSplitter {
    pub fn new(num_train_years: usize, percentage_cut: f64) -> Result<Self> {
        if num_train_years == 0 {
            return Err(DemandError::InvalidInput(
                "num_train_years must be a positive integer".to_string(),
            ));
        }
        if !(percentage_cut > 0.0 && percentage_cut < 1.0) {
            return Err(DemandError::InvalidInput(format!(
                "percentage_cut must be in (0, 1), got {}",
                percentage_cut
            )));
        }

        Ok(Self {
            num_train_years,
            percentage_cut,
        })
    }

    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        Self::new(config.num_train_years, config.percentage_cut)
    }

    pub fn num_train_years(&self) -> usize {
        self.num_train_years
    }

    pub fn percentage_cut(&self) -> f64 {
        self.percentage_cut
    }

    /// Folds over a precomputed year partition
    pub fn plan(&self, partition: &YearPartition) -> SplitPlan {
        let k = partition.len();
        let n = self.num_train_years;

        if k < n {
            let total = partition.groups().last().map_or(0, |g| g.range.end);
            self.insufficient_history(total)
        } else if k == n || k == n + 1 {
            Self::single_holdout(partition)
        } else {
            Self::sliding_window(partition, n)
        }
    }

    fn insufficient_history(&self, total: usize) -> SplitPlan {
        let p = self.percentage_cut;
        let cut = (total as f64 * p).floor() as usize;
        let val_cut = ((total as f64 * (p + (1.0 - p) / 2.0)).floor() as usize).min(total);

        SplitPlan {
            regime: SplitRegime::InsufficientHistory,
            folds: vec![
                Fold {
                    fold_num: 0,
                    train: 0..cut,
                    validation: cut..val_cut,
                    validation_year: None,
                },
                Fold {
                    fold_num: 1,
                    train: 0..val_cut,
                    validation: val_cut..total,
                    validation_year: None,
                },
            ],
        }
    }

    fn single_holdout(partition: &YearPartition) -> SplitPlan {
        let groups = partition.groups();
        let last = &groups[groups.len() - 1];

        SplitPlan {
            regime: SplitRegime::SingleHoldout,
            folds: vec![Fold {
                fold_num: 0,
                train: 0..last.range.start,
                validation: last.range.clone(),
                validation_year: Some(last.year),
            }],
        }
    }

    fn sliding_window(partition: &YearPartition, n: usize) -> SplitPlan {
        let groups = partition.groups();

        let folds = (0..groups.len() - n)
            .map(|i| {
                let holdout = &groups[i + n];
                Fold {
                    fold_num: i,
                    train: partition.span(i, i + n - 1),
                    validation: holdout.range.clone(),
                    validation_year: Some(holdout.year),
                }
            })
            .collect();

        SplitPlan {
            regime: SplitRegime::SlidingWindow,
            folds,
        }
    }
}

impl DataSplitter for RollingOriginSplitter {
    fn name(&self) -> &str {
        "Rolling-Origin Yearly"
    }

    fn split(&self, series: &DailySeries) -> Result<SplitPlan> {
        if series.is_empty() {
            return Err(DemandError::InvalidInput(format!(
                "Cannot split empty series '{}'",
                series.item()
            )));
        }

        let partition = YearPartition::from_dates(&series.dates());
        log::debug!(
            "Year groups for '{}': {:?}",
            series.item(),
            partition.years()
        );

        let plan = self.plan(&partition);

        for fold in &plan.folds {
            if fold.train.is_empty() || fold.validation.is_empty() {
                log::warn!(
                    "Fold {} for '{}' has an empty side (train {:?}, validation {:?})",
                    fold.fold_num,
                    series.item(),
                    fold.train,
                    fold.validation
                );
            }
        }
        log::info!(
            "Split '{}' ({} years, window {}) into {} folds: {:?}",
            series.item(),
            partition.len(),
            self.num_train_years,
            plan.len(),
            plan.regime
        );

        Ok(plan)
    }
}

/// Convenience wrapper around [`RollingOriginSplitter`]
pub fn rolling_origin_splits(
    series: &DailySeries,
    num_train_years: usize,
    percentage_cut: f64,
) -> Result<SplitPlan> {
    RollingOriginSplitter::new(num_train_years, percentage_cut)?.split(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn partition(years: &[(i32, usize)]) -> YearPartition {
        let dates: Vec<NaiveDate> = years
            .iter()
            .flat_map(|&(year, days)| {
                NaiveDate::from_ymd_opt(year, 1, 1)
                    .unwrap()
                    .iter_days()
                    .take(days)
            })
            .collect();
        YearPartition::from_dates(&dates)
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(RollingOriginSplitter::new(0, 0.7).is_err());
        assert!(RollingOriginSplitter::new(3, 0.0).is_err());
        assert!(RollingOriginSplitter::new(3, 1.0).is_err());
        assert!(RollingOriginSplitter::new(3, f64::NAN).is_err());
    }

    #[test]
    fn test_insufficient_history_cuts() {
        let splitter = RollingOriginSplitter::new(3, 0.5).unwrap();
        let plan = splitter.plan(&partition(&[(2019, 100), (2020, 100)]));

        assert_eq!(plan.regime, SplitRegime::InsufficientHistory);
        assert_eq!(plan.folds[0].train, 0..100);
        assert_eq!(plan.folds[0].validation, 100..150);
        assert_eq!(plan.folds[1].train, 0..150);
        assert_eq!(plan.folds[1].validation, 150..200);
    }

    #[test]
    fn test_one_extra_year_holds_out_last() {
        let splitter = RollingOriginSplitter::new(2, 0.7).unwrap();
        let plan = splitter.plan(&partition(&[(2016, 10), (2017, 10), (2018, 10)]));

        assert_eq!(plan.regime, SplitRegime::SingleHoldout);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.folds[0].train, 0..20);
        assert_eq!(plan.folds[0].validation, 20..30);
        assert_eq!(plan.folds[0].validation_year, Some(2018));
    }

    #[test]
    fn test_sliding_window_width_is_fixed() {
        let splitter = RollingOriginSplitter::new(2, 0.7).unwrap();
        let plan = splitter.plan(&partition(&[(2014, 5), (2015, 5), (2016, 5), (2017, 5), (2018, 5)]));

        assert_eq!(plan.regime, SplitRegime::SlidingWindow);
        assert_eq!(plan.len(), 3);
        for (i, fold) in plan.folds.iter().enumerate() {
            assert_eq!(fold.train, i * 5..i * 5 + 10);
            assert_eq!(fold.validation, i * 5 + 10..i * 5 + 15);
        }
    }

    #[test]
    fn test_single_year_window_of_one() {
        let splitter = RollingOriginSplitter::new(1, 0.7).unwrap();
        let plan = splitter.plan(&partition(&[(2018, 7)]));

        assert_eq!(plan.regime, SplitRegime::SingleHoldout);
        assert_eq!(plan.folds[0].train, 0..0);
        assert_eq!(plan.folds[0].validation, 0..7);
    }
}
