use super::base::DataSplitter;
use super::types::{Fold, SplitPlan, SplitRegime};
use crate::error::{DemandError, Result};
use crate::types::DailySeries;
use chrono::{Datelike, NaiveDate};

/// Single hold-out: everything before `test_start` trains, the rest validates
#[derive(Debug, Clone)]
pub struct DateSplitter {
    test_start: NaiveDate,
}

impl DateSplitter {
    pub fn new(test_start: NaiveDate) -> Self {
        Self { test_start }
    }

    pub fn test_start(&self) -> NaiveDate {
        self.test_start
    }
}

impl DataSplitter for DateSplitter {
    fn name(&self) -> &str {
        "Date Cutoff"
    }

    fn split(&self, series: &DailySeries) -> Result<SplitPlan> {
        if series.is_empty() {
            return Err(DemandError::InvalidInput(format!(
                "Cannot split empty series '{}'",
                series.item()
            )));
        }
        if self.test_start <= series.first_date() || self.test_start > series.last_date() {
            return Err(DemandError::InvalidInput(format!(
                "Test start {} leaves an empty side for '{}' ({} to {})",
                self.test_start,
                series.item(),
                series.first_date(),
                series.last_date()
            )));
        }

        let cut = (self.test_start - series.first_date()).num_days() as usize;
        let total = series.len();

        log::info!(
            "Train dataset is from {} to {}",
            series.first_date(),
            series.observations()[cut - 1].date
        );
        log::info!(
            "Test dataset is from {} to {}",
            self.test_start,
            series.last_date()
        );

        let validation_year = if self.test_start.year() == series.last_date().year() {
            Some(self.test_start.year())
        } else {
            None
        };

        Ok(SplitPlan {
            regime: SplitRegime::DateCutoff,
            folds: vec![Fold {
                fold_num: 0,
                train: 0..cut,
                validation: cut..total,
                validation_year,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyObservation;

    fn series() -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2018, 12, 25).unwrap();
        let obs = start
            .iter_days()
            .take(14)
            .map(|d| DailyObservation::new(d, 1, 1.0, Some(1.0)))
            .collect();
        DailySeries::new("tonic", obs).unwrap()
    }

    #[test]
    fn test_split_at_date() {
        let splitter = DateSplitter::new(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        let plan = splitter.split(&series()).unwrap();

        assert_eq!(plan.regime, SplitRegime::DateCutoff);
        assert_eq!(plan.folds[0].train, 0..7);
        assert_eq!(plan.folds[0].validation, 7..14);
        assert_eq!(plan.folds[0].validation_year, Some(2019));
    }

    #[test]
    fn test_rejects_empty_sides() {
        let s = series();
        assert!(DateSplitter::new(s.first_date()).split(&s).is_err());
        let after = s.last_date().succ_opt().unwrap();
        assert!(DateSplitter::new(after).split(&s).is_err());
    }
}
