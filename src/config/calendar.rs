use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DemandError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Holiday that falls on the same day every year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedHoliday {
    pub name: String,
    pub month: u32,
    pub day: u32,
}

impl FixedHoliday {
    pub fn new(name: &str, month: u32, day: u32) -> Self {
        Self {
            name: name.to_string(),
            month,
            day,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

/// Inclusive range of days the business was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ClosureWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Holiday tables and business rules used by the calendar features.
///
/// Easter is a lookup table, not computed: it is valid only for the years it
/// lists. Easter Monday is always the day after each listed Sunday.
///
/// The closure window only flags days while `closure_enabled` is set. TOML has
/// no null, so a saved `closure = None` would reload as the default window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub include_days_of_week: bool,
    pub easter_sundays: Vec<NaiveDate>,
    pub fixed_holidays: Vec<FixedHoliday>,
    pub closure_enabled: bool,
    pub closure: Option<ClosureWindow>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        let easter_sundays = [
            (2013, 3, 31),
            (2014, 4, 20),
            (2015, 4, 5),
            (2016, 3, 27),
            (2017, 4, 16),
            (2018, 4, 1),
            (2019, 4, 21),
            (2020, 4, 12),
        ]
        .into_iter()
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect();

        Self {
            include_days_of_week: true,
            easter_sundays,
            fixed_holidays: vec![
                FixedHoliday::new("christmas", 12, 25),
                FixedHoliday::new("new_years_day", 1, 1),
                FixedHoliday::new("new_years_eve", 12, 31),
                FixedHoliday::new("sv_lovre", 8, 10),
                FixedHoliday::new("prvi_maj", 5, 1),
            ],
            // COVID-19 closure
            closure_enabled: true,
            closure: NaiveDate::from_ymd_opt(2020, 3, 19)
                .zip(NaiveDate::from_ymd_opt(2020, 5, 10))
                .map(|(start, end)| ClosureWindow { start, end }),
        }
    }
}

impl CalendarConfig {
    pub fn easter_mondays(&self) -> Vec<NaiveDate> {
        self.easter_sundays
            .iter()
            .filter_map(|d| d.succ_opt())
            .collect()
    }

    /// Closure window in effect, if any
    pub fn active_closure(&self) -> Option<ClosureWindow> {
        self.closure.filter(|_| self.closure_enabled)
    }

    /// First and last year covered by the Easter table
    pub fn easter_range(&self) -> Option<(i32, i32)> {
        let first = self.easter_sundays.iter().map(|d| d.year()).min()?;
        let last = self.easter_sundays.iter().map(|d| d.year()).max()?;
        Some((first, last))
    }
}

impl ConfigSection for CalendarConfig {
    fn section_name() -> &'static str {
        "calendar"
    }

    fn validate(&self) -> Result<(), DemandError> {
        let mut years = HashSet::new();
        for date in &self.easter_sundays {
            if !years.insert(date.year()) {
                return Err(DemandError::Configuration(format!(
                    "Easter table lists year {} more than once",
                    date.year()
                )));
            }
        }

        let mut names = HashSet::new();
        for holiday in &self.fixed_holidays {
            // 2000 is a leap year, so 29 February is accepted
            if NaiveDate::from_ymd_opt(2000, holiday.month, holiday.day).is_none() {
                return Err(DemandError::Configuration(format!(
                    "Holiday '{}' has invalid month/day {}/{}",
                    holiday.name, holiday.month, holiday.day
                )));
            }
            if holiday.name == "easter" || holiday.name == "easter_monday" {
                return Err(DemandError::Configuration(format!(
                    "Holiday name '{}' is reserved",
                    holiday.name
                )));
            }
            if !names.insert(holiday.name.as_str()) {
                return Err(DemandError::Configuration(format!(
                    "Holiday '{}' is configured more than once",
                    holiday.name
                )));
            }
        }

        if let Some(closure) = &self.closure {
            if closure.start > closure.end {
                return Err(DemandError::Configuration(format!(
                    "Closure window starts after it ends ({} > {})",
                    closure.start, closure.end
                )));
            }
        }

        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Calendar".to_string(),
            fields: vec![
                FieldManifest::new(
                    "include_days_of_week",
                    "bool",
                    serde_json::json!(true),
                    "Emit day-of-week flags (Monday is the baseline)",
                ),
                FieldManifest::new(
                    "easter_sundays",
                    "date[]",
                    serde_json::to_value(&defaults.easter_sundays).unwrap_or_default(),
                    "Known Easter Sundays; extend to cover newer years",
                ),
                FieldManifest::new(
                    "fixed_holidays",
                    "holiday[]",
                    serde_json::to_value(&defaults.fixed_holidays).unwrap_or_default(),
                    "Holidays on the same month/day every year",
                ),
                FieldManifest::new(
                    "closure_enabled",
                    "bool",
                    serde_json::json!(true),
                    "Flag days inside the closure window as closed",
                ),
                FieldManifest::new(
                    "closure",
                    "date range",
                    serde_json::to_value(defaults.closure).unwrap_or_default(),
                    "Days the business was closed, inclusive",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CalendarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.easter_range(), Some((2013, 2020)));
        assert_eq!(
            config.easter_mondays()[0],
            NaiveDate::from_ymd_opt(2013, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_holiday() {
        let mut config = CalendarConfig::default();
        config.fixed_holidays.push(FixedHoliday::new("bogus", 2, 30));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_easter_year() {
        let mut config = CalendarConfig::default();
        config
            .easter_sundays
            .push(NaiveDate::from_ymd_opt(2013, 4, 7).unwrap());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_closure() {
        let config = CalendarConfig {
            closure: Some(ClosureWindow {
                start: NaiveDate::from_ymd_opt(2020, 5, 10).unwrap(),
                end: NaiveDate::from_ymd_opt(2020, 3, 19).unwrap(),
            }),
            ..CalendarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_closure_survives_toml() {
        let config = CalendarConfig {
            closure_enabled: false,
            ..CalendarConfig::default()
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let reloaded: CalendarConfig = toml::from_str(&text).unwrap();

        assert_eq!(reloaded, config);
        assert_eq!(reloaded.active_closure(), None);
        assert!(CalendarConfig::default().active_closure().is_some());
    }

    #[test]
    fn test_closure_needs_window_and_flag() {
        let config: CalendarConfig = toml::from_str("closure_enabled = true\n").unwrap();
        assert!(config.active_closure().is_some());

        let config = CalendarConfig {
            closure: None,
            ..CalendarConfig::default()
        };
        assert_eq!(config.active_closure(), None);
    }
}
