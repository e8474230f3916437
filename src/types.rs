use crate::error::{DemandError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of sales for a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub sales_qty: i64,
    pub sales_value: f64,
    pub item_price: Option<f64>, // None until a price has been observed
}

impl DailyObservation {
    pub fn new(date: NaiveDate, sales_qty: i64, sales_value: f64, item_price: Option<f64>) -> Self {
        Self {
            date,
            sales_qty,
            sales_value,
            item_price,
        }
    }

    /// Synthetic row for a day with no recorded sales
    pub fn no_sale(date: NaiveDate, item_price: Option<f64>) -> Self {
        Self::new(date, 0, 0.0, item_price)
    }
}

/// Gap-free daily sales series for one item.
///
/// Dates are strictly increasing by exactly one day and the series is never
/// empty. Positions into `observations` are what split plans refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailySeries")]
pub struct DailySeries {
    item: String,
    observations: Vec<DailyObservation>,
}

// Deserialized form, checked by `DailySeries::new`
#[derive(Deserialize)]
struct RawDailySeries {
    item: String,
    observations: Vec<DailyObservation>,
}

impl TryFrom<RawDailySeries> for DailySeries {
    type Error = DemandError;

    fn try_from(raw: RawDailySeries) -> Result<Self> {
        Self::new(raw.item, raw.observations)
    }
}

impl DailySeries {
    /// Build a series from observations that are already contiguous.
    ///
    /// Use [`crate::data::fill_time_series`] for gapped input.
    pub fn new(item: impl Into<String>, observations: Vec<DailyObservation>) -> Result<Self> {
        let item = item.into();
        if observations.is_empty() {
            return Err(DemandError::InvalidInput(format!(
                "Daily series for '{}' is empty",
                item
            )));
        }

        for (i, pair) in observations.windows(2).enumerate() {
            if pair[0].date.succ_opt() != Some(pair[1].date) {
                return Err(DemandError::InvalidInput(format!(
                    "Daily series for '{}' is not contiguous at position {}: {} followed by {}",
                    item,
                    i + 1,
                    pair[0].date,
                    pair[1].date
                )));
            }
        }

        Ok(Self { item, observations })
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn years(&self) -> (i32, i32) {
        (self.first_date().year(), self.last_date().year())
    }

    /// Sales quantities as floats, ready for scoring
    pub fn sales_qty(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.sales_qty as f64).collect()
    }

    /// Position of `date` in the series, if covered
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_date()).num_days();
        if offset < 0 || offset as usize >= self.len() {
            None
        } else {
            Some(offset as usize)
        }
    }
}

/// Weighted accuracy of one (actual, forecast) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub wmape: f64,
    pub wbias: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 3, d).unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        let result = DailySeries::new("beer", vec![]);
        assert!(matches!(result, Err(DemandError::InvalidInput(_))));
    }

    #[test]
    fn test_new_rejects_gap() {
        let obs = vec![
            DailyObservation::new(day(1), 1, 2.0, Some(2.0)),
            DailyObservation::new(day(3), 1, 2.0, Some(2.0)),
        ];
        assert!(DailySeries::new("beer", obs).is_err());
    }

    #[test]
    fn test_position_of() {
        let obs = (1..=5)
            .map(|d| DailyObservation::new(day(d), 1, 2.0, Some(2.0)))
            .collect();
        let series = DailySeries::new("beer", obs).unwrap();

        assert_eq!(series.position_of(day(1)), Some(0));
        assert_eq!(series.position_of(day(5)), Some(4));
        assert_eq!(series.position_of(day(6)), None);
        assert_eq!(series.position_of(NaiveDate::from_ymd_opt(2019, 2, 28).unwrap()), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let empty = serde_json::from_str::<DailySeries>(r#"{"item":"beer","observations":[]}"#);
        assert!(empty.is_err());

        let gapped = r#"{"item":"beer","observations":[
            {"date":"2019-03-01","sales_qty":1,"sales_value":2.0,"item_price":2.0},
            {"date":"2019-03-03","sales_qty":1,"sales_value":2.0,"item_price":null}
        ]}"#;
        assert!(serde_json::from_str::<DailySeries>(gapped).is_err());

        let obs = (1..=3)
            .map(|d| DailyObservation::new(day(d), 1, 2.0, None))
            .collect();
        let series = DailySeries::new("beer", obs).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(serde_json::from_str::<DailySeries>(&json).unwrap(), series);
    }
}
