use super::calendar::{CalendarEnricher, CalendarFeatures, EnrichedSeries, FittedCalendar};
use crate::config::CalendarConfig;
use crate::data::{fill_time_series, ItemObservations};
use crate::error::{DemandError, Result};
use crate::types::DailySeries;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Gap-fills and enriches per-item sales ahead of model training
pub struct FeatureEngineer {
    enricher: CalendarEnricher,
}

impl FeatureEngineer {
    pub fn new(config: CalendarConfig) -> Result<Self> {
        Ok(Self {
            enricher: CalendarEnricher::new(config)?,
        })
    }

    pub fn enricher(&self) -> &CalendarEnricher {
        &self.enricher
    }

    /// Fit on the earliest year across all items
    pub fn fit(&self, series: &[DailySeries]) -> Result<FittedCalendar> {
        series
            .iter()
            .map(|s| self.enricher.fit(s))
            .min_by_key(|p| p.min_year)
            .ok_or_else(|| DemandError::InvalidInput("No series to fit calendar on".to_string()))
    }

    /// Fill every item's gaps, fit once, and enrich every item
    pub fn engineer(&self, observations: &ItemObservations) -> Result<Vec<EnrichedSeries>> {
        let filled = observations
            .iter()
            .map(|(item, obs)| fill_time_series(item, obs))
            .collect::<Result<Vec<_>>>()?;

        let params = self.fit(&filled)?;
        log::info!(
            "Enriching {} items with calendar features (min year {})",
            filled.len(),
            params.min_year
        );

        Ok(filled
            .iter()
            .map(|s| self.enricher.transform(s, &params))
            .collect())
    }
}

impl EnrichedSeries {
    /// Sales columns plus one integer column per feature.
    ///
    /// `sales_value` is only included when `include_sales_value` is set.
    pub fn to_frame(&self, include_sales_value: bool) -> Result<DataFrame> {
        let observations = self.series.observations();

        let dates: Vec<NaiveDate> = observations.iter().map(|o| o.date).collect();
        let qty: Vec<i64> = observations.iter().map(|o| o.sales_qty).collect();
        let price: Vec<Option<f64>> = observations.iter().map(|o| o.item_price).collect();

        let mut columns = vec![
            Column::new("sales_date".into(), dates),
            Column::new("sales_qty".into(), qty),
        ];
        if include_sales_value {
            let value: Vec<f64> = observations.iter().map(|o| o.sales_value).collect();
            columns.push(Column::new("sales_value".into(), value));
        }
        columns.push(Column::new("item_price".into(), price));

        let values: Vec<Vec<i32>> = self.rows.iter().map(|r| r.values()).collect();
        for (i, name) in self.feature_names.iter().enumerate() {
            let feature: Vec<i32> = values.iter().map(|row| row[i]).collect();
            columns.push(Column::new(name.as_str().into(), feature));
        }

        DataFrame::new(columns).map_err(DemandError::from)
    }

    /// Dated feature rows of one calendar year
    pub fn year(&self, year: i32) -> Vec<(NaiveDate, &CalendarFeatures)> {
        self.series
            .observations()
            .iter()
            .zip(&self.rows)
            .filter(|(o, _)| o.date.year() == year)
            .map(|(o, r)| (o.date, r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyObservation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observations() -> ItemObservations {
        let mut by_item = ItemObservations::new();
        by_item.insert(
            "cola".to_string(),
            vec![
                DailyObservation::new(date(2015, 12, 30), 3, 6.0, Some(2.0)),
                DailyObservation::new(date(2016, 1, 2), 1, 2.0, Some(2.0)),
            ],
        );
        by_item.insert(
            "beer".to_string(),
            vec![
                DailyObservation::new(date(2016, 1, 1), 2, 5.0, Some(2.5)),
                DailyObservation::new(date(2016, 1, 2), 0, 0.0, None),
            ],
        );
        by_item
    }

    #[test]
    fn test_engineer_fits_global_min_year() {
        let engineer = FeatureEngineer::new(CalendarConfig::default()).unwrap();
        let enriched = engineer.engineer(&observations()).unwrap();

        assert_eq!(enriched.len(), 2);
        let beer = enriched.iter().find(|e| e.series().item() == "beer").unwrap();
        // beer starts in 2016 but the horizon starts in 2015
        assert!(beer.rows().iter().all(|r| r.year == 1));

        let cola = enriched.iter().find(|e| e.series().item() == "cola").unwrap();
        assert_eq!(cola.len(), 4);
        assert_eq!(cola.year(2016).len(), 2);
    }

    #[test]
    fn test_to_frame_columns() {
        let engineer = FeatureEngineer::new(CalendarConfig::default()).unwrap();
        let enriched = engineer.engineer(&observations()).unwrap();
        let cola = enriched.iter().find(|e| e.series().item() == "cola").unwrap();

        let frame = cola.to_frame(false).unwrap();
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.width(), 3 + cola.feature_names().len());
        assert!(frame.column("sales_value").is_err());

        let new_year = frame.column("new_years_day").unwrap().i32().unwrap();
        assert_eq!(new_year.get(2), Some(1));

        let with_value = cola.to_frame(true).unwrap();
        assert_eq!(with_value.width(), frame.width() + 1);
    }

    #[test]
    fn test_fit_requires_series() {
        let engineer = FeatureEngineer::new(CalendarConfig::default()).unwrap();
        assert!(engineer.fit(&[]).is_err());
    }
}
