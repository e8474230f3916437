pub mod traits;
pub mod calendar;
pub mod data;
pub mod evaluation;
pub mod validation;
pub mod manager;

pub use manager::{AppConfig, ConfigManager, ENV_PREFIX};
pub use calendar::{CalendarConfig, ClosureWindow, FixedHoliday};
pub use data::DataConfig;
pub use evaluation::EvaluationConfig;
pub use validation::ValidationConfig;
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
