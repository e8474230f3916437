pub mod calendar;
pub mod engineer;
pub mod holidays;

pub use calendar::{CalendarEnricher, CalendarFeatures, EnrichedSeries, FittedCalendar};
pub use engineer::FeatureEngineer;
pub use holidays::HolidayCalendar;
