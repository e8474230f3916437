pub mod base;
pub mod date;
pub mod rolling_origin;
pub mod types;

pub use base::DataSplitter;
pub use date::DateSplitter;
pub use rolling_origin::{rolling_origin_splits, RollingOriginSplitter};
pub use types::{Fold, SplitPlan, SplitRegime, YearGroup, YearPartition};
