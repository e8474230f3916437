use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One train/validation partition of a series' positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub fold_num: usize,
    pub train: Range<usize>,
    pub validation: Range<usize>,
    pub validation_year: Option<i32>, // None when the fold is not year-aligned
}

impl Fold {
    pub fn train_indices(&self) -> Vec<usize> {
        self.train.clone().collect()
    }

    pub fn validation_indices(&self) -> Vec<usize> {
        self.validation.clone().collect()
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    pub fn validation_len(&self) -> usize {
        self.validation.len()
    }

    /// Every train position comes before every validation position
    pub fn is_chronological(&self) -> bool {
        self.train.is_empty() || self.validation.is_empty() || self.train.end <= self.validation.start
    }
}

/// Which policy produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitRegime {
    /// Fewer years than the training window: two positional folds
    InsufficientHistory,
    /// Exactly the window, or one year more: last year is held out
    SingleHoldout,
    /// Fixed-width window sliding one year per fold
    SlidingWindow,
    /// Single cut at a date
    DateCutoff,
}

/// Ordered folds, chronological by validation start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub regime: SplitRegime,
    pub folds: Vec<Fold>,
}

impl SplitPlan {
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    /// Highest position referenced by any fold, plus one
    pub fn extent(&self) -> usize {
        self.folds
            .iter()
            .map(|f| f.train.end.max(f.validation.end))
            .max()
            .unwrap_or(0)
    }
}

/// Positions of one calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: i32,
    pub range: Range<usize>,
}

/// Contiguous year ranges of a chronologically sorted date index, ascending
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YearPartition {
    groups: Vec<YearGroup>,
}

impl YearPartition {
    /// `dates` must be sorted ascending
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        let mut groups: Vec<YearGroup> = Vec::new();

        for (idx, date) in dates.iter().enumerate() {
            match groups.last_mut() {
                Some(group) if group.year == date.year() => group.range.end = idx + 1,
                _ => groups.push(YearGroup {
                    year: date.year(),
                    range: idx..idx + 1,
                }),
            }
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[YearGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.groups.iter().map(|g| g.year).collect()
    }

    /// Positions from the start of group `first` to the end of group `last`, inclusive
    pub fn span(&self, first: usize, last: usize) -> Range<usize> {
        self.groups[first].range.start..self.groups[last].range.end
    }
}
