use super::types::SplitPlan;
use crate::error::Result;
use crate::types::DailySeries;

pub trait DataSplitter: Send + Sync {
    fn name(&self) -> &str;

    /// Split a series' positions into ordered train/validation folds
    fn split(&self, series: &DailySeries) -> Result<SplitPlan>;
}
