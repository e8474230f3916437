use super::holidays::HolidayCalendar;
use crate::config::{CalendarConfig, ConfigSection};
use crate::error::Result;
use crate::types::DailySeries;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// State learned at fit time: the first year of the training horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittedCalendar {
    pub min_year: i32,
}

/// Calendar features of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    /// Tuesday..Sunday; Monday is the baseline. `None` when disabled.
    pub day_of_week: Option<[u8; 6]>,
    /// January..November; December is the baseline
    pub month_of_year: [u8; 11],
    pub year: i32,
    pub first_third_of_month: u8,
    pub second_third_of_month: u8,
    pub last_third_of_month: u8,
    pub closed: u8,
    /// Aligned with [`HolidayCalendar::names`]
    pub holidays: Vec<u8>,
}

impl CalendarFeatures {
    /// Values in the same order as [`CalendarEnricher::feature_names`]
    pub fn values(&self) -> Vec<i32> {
        let mut values = Vec::with_capacity(6 + 11 + 5 + self.holidays.len());
        if let Some(days) = &self.day_of_week {
            values.extend(days.iter().map(|&v| v as i32));
        }
        values.extend(self.month_of_year.iter().map(|&v| v as i32));
        values.push(self.year);
        values.push(self.first_third_of_month as i32);
        values.push(self.second_third_of_month as i32);
        values.push(self.last_third_of_month as i32);
        values.push(self.closed as i32);
        values.extend(self.holidays.iter().map(|&v| v as i32));
        values
    }
}

/// Derives calendar and holiday features from dates.
///
/// `fit` records the minimum year once over the training horizon; `transform`
/// is pure and can be applied to any number of series with the same params.
#[derive(Debug, Clone)]
pub struct CalendarEnricher {
    config: CalendarConfig,
    holidays: HolidayCalendar,
}

impl CalendarEnricher {
    pub fn new(config: CalendarConfig) -> Result<Self> {
        config.validate()?;
        let holidays = HolidayCalendar::new(&config);
        Ok(Self { config, holidays })
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    pub fn fit(&self, series: &DailySeries) -> FittedCalendar {
        FittedCalendar {
            min_year: series.first_date().year(),
        }
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.config.include_days_of_week {
            names.extend((1..=6).map(|d| format!("day_of_week_{}", d)));
        }
        names.extend((1..=11).map(|m| format!("month_of_year_{}", m)));
        names.extend(
            [
                "year",
                "first_third_of_month",
                "second_third_of_month",
                "last_third_of_month",
                "closed",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        names.extend(self.holidays.names());
        names
    }

    pub fn features_for(&self, date: NaiveDate, params: &FittedCalendar) -> CalendarFeatures {
        let day_of_week = self.config.include_days_of_week.then(|| {
            let weekday = date.weekday().num_days_from_monday();
            let mut flags = [0u8; 6];
            if weekday > 0 {
                flags[weekday as usize - 1] = 1;
            }
            flags
        });

        let mut month_of_year = [0u8; 11];
        if date.month() < 12 {
            month_of_year[date.month() as usize - 1] = 1;
        }

        let day = date.day();
        let closed = self
            .config
            .active_closure()
            .map_or(false, |window| window.contains(date));

        CalendarFeatures {
            day_of_week,
            month_of_year,
            year: date.year() - params.min_year,
            first_third_of_month: (day <= 10) as u8,
            second_third_of_month: (day > 10 && day <= 20) as u8,
            last_third_of_month: (day > 20) as u8,
            closed: closed as u8,
            holidays: self.holidays.flags(date),
        }
    }

    pub fn transform(&self, series: &DailySeries, params: &FittedCalendar) -> EnrichedSeries {
        let (first_year, last_year) = series.years();
        if !(self.holidays.covers(first_year) && self.holidays.covers(last_year)) {
            log::warn!(
                "Series '{}' spans {}-{} but the Easter table covers {:?}; Easter flags outside it are zero",
                series.item(),
                first_year,
                last_year,
                self.holidays.easter_range()
            );
        }

        if log::log_enabled!(log::Level::Debug) {
            let holiday_days = series
                .observations()
                .iter()
                .filter(|o| self.holidays.is_holiday(o.date))
                .count();
            log::debug!("'{}' has {} holiday days", series.item(), holiday_days);
            for year in first_year..=last_year {
                log::debug!("Holidays in {}: {:?}", year, self.holidays.holidays_in_year(year));
            }
        }

        let rows = series
            .observations()
            .iter()
            .map(|o| self.features_for(o.date, params))
            .collect();

        EnrichedSeries {
            series: series.clone(),
            feature_names: self.feature_names(),
            rows,
        }
    }
}

/// A daily series with calendar features for each row
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    pub(crate) series: DailySeries,
    pub(crate) feature_names: Vec<String>,
    pub(crate) rows: Vec<CalendarFeatures>,
}

impl EnrichedSeries {
    pub fn series(&self) -> &DailySeries {
        &self.series
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[CalendarFeatures] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClosureWindow;
    use crate::data::fill_time_series;
    use crate::types::DailyObservation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(from: NaiveDate, to: NaiveDate) -> DailySeries {
        let obs = vec![
            DailyObservation::new(from, 1, 2.0, Some(2.0)),
            DailyObservation::new(to, 1, 2.0, Some(2.0)),
        ];
        fill_time_series("wine", &obs).unwrap()
    }

    #[test]
    fn test_feature_names_match_values() {
        let enricher = CalendarEnricher::new(CalendarConfig::default()).unwrap();
        let params = FittedCalendar { min_year: 2013 };
        let row = enricher.features_for(date(2016, 3, 15), &params);

        assert_eq!(row.values().len(), enricher.feature_names().len());
        assert_eq!(enricher.feature_names().len(), 6 + 11 + 5 + 7);
    }

    #[test]
    fn test_baselines_encode_as_all_zero() {
        let enricher = CalendarEnricher::new(CalendarConfig::default()).unwrap();
        let params = FittedCalendar { min_year: 2019 };

        // 2019-12-02 is a Monday in December
        let row = enricher.features_for(date(2019, 12, 2), &params);
        assert_eq!(row.day_of_week, Some([0; 6]));
        assert_eq!(row.month_of_year, [0; 11]);

        // Sunday 2019-06-30
        let row = enricher.features_for(date(2019, 6, 30), &params);
        assert_eq!(row.day_of_week, Some([0, 0, 0, 0, 0, 1]));
        assert_eq!(row.month_of_year[5], 1);
    }

    #[test]
    fn test_thirds_are_exclusive() {
        let enricher = CalendarEnricher::new(CalendarConfig::default()).unwrap();
        let params = FittedCalendar { min_year: 2019 };

        for (day, expected) in [(1, [1, 0, 0]), (10, [1, 0, 0]), (11, [0, 1, 0]), (20, [0, 1, 0]), (21, [0, 0, 1]), (31, [0, 0, 1])] {
            let row = enricher.features_for(date(2019, 1, day), &params);
            assert_eq!(
                [
                    row.first_third_of_month,
                    row.second_third_of_month,
                    row.last_third_of_month
                ],
                expected
            );
        }
    }

    #[test]
    fn test_year_offset_uses_fitted_min_year() {
        let enricher = CalendarEnricher::new(CalendarConfig::default()).unwrap();
        let history = series(date(2014, 6, 1), date(2016, 1, 5));
        let params = enricher.fit(&history);
        assert_eq!(params.min_year, 2014);

        let later = series(date(2018, 1, 1), date(2018, 1, 3));
        let enriched = enricher.transform(&later, &params);
        assert!(enriched.rows().iter().all(|r| r.year == 4));
    }

    #[test]
    fn test_closure_window_is_inclusive() {
        let config = CalendarConfig {
            closure: Some(ClosureWindow {
                start: date(2020, 3, 19),
                end: date(2020, 5, 10),
            }),
            ..CalendarConfig::default()
        };
        let enricher = CalendarEnricher::new(config).unwrap();
        let params = FittedCalendar { min_year: 2020 };

        assert_eq!(enricher.features_for(date(2020, 3, 18), &params).closed, 0);
        assert_eq!(enricher.features_for(date(2020, 3, 19), &params).closed, 1);
        assert_eq!(enricher.features_for(date(2020, 5, 10), &params).closed, 1);
        assert_eq!(enricher.features_for(date(2020, 5, 11), &params).closed, 0);
    }

    #[test]
    fn test_holiday_flags_match_calendar() {
        let enricher = CalendarEnricher::new(CalendarConfig::default()).unwrap();
        let year = series(date(2019, 1, 1), date(2019, 12, 31));
        let enriched = enricher.transform(&year, &enricher.fit(&year));

        let flagged: Vec<NaiveDate> = enriched
            .year(2019)
            .into_iter()
            .filter(|(_, row)| row.holidays.contains(&1))
            .map(|(d, _)| d)
            .collect();

        assert_eq!(flagged, enricher.holidays().holidays_in_year(2019));
        assert!(flagged.iter().all(|&d| enricher.holidays().is_holiday(d)));
        assert_eq!(flagged.len(), 7);
    }

    #[test]
    fn test_disabled_closure_flags_nothing() {
        let config = CalendarConfig {
            closure_enabled: false,
            ..CalendarConfig::default()
        };
        let enricher = CalendarEnricher::new(config).unwrap();
        let params = FittedCalendar { min_year: 2020 };

        assert_eq!(enricher.features_for(date(2020, 4, 1), &params).closed, 0);
    }

    #[test]
    fn test_days_of_week_can_be_disabled() {
        let config = CalendarConfig {
            include_days_of_week: false,
            ..CalendarConfig::default()
        };
        let enricher = CalendarEnricher::new(config).unwrap();
        let row = enricher.features_for(date(2019, 1, 1), &FittedCalendar { min_year: 2019 });

        assert_eq!(row.day_of_week, None);
        assert!(!enricher.feature_names().iter().any(|n| n.starts_with("day_of_week")));
        assert_eq!(row.values().len(), enricher.feature_names().len());
    }
}
