pub mod method;
pub mod sparsity;
pub mod splitters;

pub use method::{CrossValidationReport, CrossValidator, FoldEvaluation, FoldForecast, FoldPredictor};
pub use sparsity::{report_split_sparsity, sparsity, FoldSparsity};
pub use splitters::{
    rolling_origin_splits, DataSplitter, DateSplitter, Fold, RollingOriginSplitter, SplitPlan,
    SplitRegime, YearGroup, YearPartition,
};
