use crate::config::{CalendarConfig, FixedHoliday};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Holiday membership lookup built from a [`CalendarConfig`]
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    easter_sundays: HashSet<NaiveDate>,
    easter_mondays: HashSet<NaiveDate>,
    fixed: Vec<FixedHoliday>,
    easter_range: Option<(i32, i32)>,
}

impl HolidayCalendar {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            easter_sundays: config.easter_sundays.iter().copied().collect(),
            easter_mondays: config.easter_mondays().into_iter().collect(),
            fixed: config.fixed_holidays.clone(),
            easter_range: config.easter_range(),
        }
    }

    /// Flag names, in the order [`HolidayCalendar::flags`] returns them
    pub fn names(&self) -> Vec<String> {
        let mut names = vec!["easter".to_string(), "easter_monday".to_string()];
        names.extend(self.fixed.iter().map(|h| h.name.clone()));
        names
    }

    pub fn flags(&self, date: NaiveDate) -> Vec<u8> {
        let mut flags = Vec::with_capacity(2 + self.fixed.len());
        flags.push(self.easter_sundays.contains(&date) as u8);
        flags.push(self.easter_mondays.contains(&date) as u8);
        flags.extend(self.fixed.iter().map(|h| h.matches(date) as u8));
        flags
    }

    /// Whether the Easter table knows the Easter dates of `year`
    pub fn covers(&self, year: i32) -> bool {
        self.easter_range
            .map_or(false, |(first, last)| year >= first && year <= last)
    }

    pub fn easter_range(&self) -> Option<(i32, i32)> {
        self.easter_range
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.flags(date).iter().any(|&f| f == 1)
    }

    pub fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .easter_sundays
            .iter()
            .chain(self.easter_mondays.iter())
            .copied()
            .filter(|d| d.year() == year)
            .chain(
                self.fixed
                    .iter()
                    .filter_map(|h| NaiveDate::from_ymd_opt(year, h.month, h.day)),
            )
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}
