mod csv;
mod types;
mod validator;

pub use csv::{CsvConnector, ItemObservations, PREDICTION_COLUMN};
pub use types::{DatasetMetadata, RequiredColumn};
pub use validator::DataValidator;
