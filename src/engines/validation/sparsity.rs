use super::splitters::SplitPlan;
use crate::engines::metrics::scoring::round2;
use crate::error::{DemandError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Share of zero-or-negative demand days on each side of a fold, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldSparsity {
    pub fold_num: usize,
    pub train_sparsity: Option<f64>,
    pub validation_sparsity: Option<f64>,
}

/// `100 - (share of strictly positive values) * 100`, rounded to 2 decimals.
///
/// `None` for an empty slice.
pub fn sparsity(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let selling_days = values.iter().filter(|&&v| v > 0.0).count();
    let selling_pct = selling_days as f64 / values.len() as f64 * 100.0;
    Some(round2(100.0 - selling_pct))
}

/// Report how sparse each fold's actual sales are.
///
/// Purely diagnostic: the numbers are logged and returned, nothing is
/// rejected. `sales_qty` must be the series the plan was built from.
pub fn report_split_sparsity(plan: &SplitPlan, sales_qty: &[f64]) -> Result<Vec<FoldSparsity>> {
    if plan.extent() > sales_qty.len() {
        return Err(DemandError::InvalidInput(format!(
            "Split plan refers to position {} but only {} sales values were given",
            plan.extent() - 1,
            sales_qty.len()
        )));
    }

    let report = plan
        .folds
        .iter()
        .map(|fold| {
            let entry = FoldSparsity {
                fold_num: fold.fold_num,
                train_sparsity: sparsity(slice(sales_qty, &fold.train)),
                validation_sparsity: sparsity(slice(sales_qty, &fold.validation)),
            };

            log::info!(
                "Time series validation split {}: train sparsity {} | validation sparsity {}",
                fold.fold_num,
                describe(entry.train_sparsity),
                describe(entry.validation_sparsity)
            );

            entry
        })
        .collect();

    Ok(report)
}

fn slice<'a>(values: &'a [f64], range: &Range<usize>) -> &'a [f64] {
    &values[range.clone()]
}

fn describe(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a (empty)".to_string(), |v| format!("{:.2}%", v))
}
