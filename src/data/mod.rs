pub mod connectors;
pub mod gap_fill;

pub use connectors::{CsvConnector, DatasetMetadata, ItemObservations, PREDICTION_COLUMN};
pub use gap_fill::fill_time_series;
