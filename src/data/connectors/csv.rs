use super::{
    types::{DatasetMetadata, RequiredColumn},
    validator::DataValidator,
};
use crate::engines::metrics::PredictionRecord;
use crate::error::{DemandError, Result};
use crate::types::DailyObservation;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Raw per-item observations, keyed by item name
pub type ItemObservations = BTreeMap<String, Vec<DailyObservation>>;

/// Optional model output column next to the sales columns
pub const PREDICTION_COLUMN: &str = "prediction";

/// Reader for the processed daily sales dataset
/// (`sales_date, item_name, sales_qty, sales_value, item_price`).
pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| DemandError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load, validate and normalize column names
    pub fn load_and_validate<P: AsRef<Path>>(path: P, min_rows: usize) -> Result<DataFrame> {
        let df = Self::load(&path)?;
        let df = Self::normalize_columns(df)?;

        DataValidator::validate_minimum_rows(&df, min_rows)?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Rename alias columns to the standard names
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        let column_map = DataValidator::validate_sales_columns(&df)?;

        for (required, actual_name) in column_map {
            let standard_name = required.as_str();
            if actual_name != standard_name {
                df.rename(&actual_name, standard_name.into()).map_err(|e| {
                    DemandError::DataLoading(format!("Failed to rename column: {}", e))
                })?;
            }
        }

        Ok(df)
    }

    /// Split a normalized frame into per-item observation lists sorted by date.
    ///
    /// Missing quantities and values read as zero, missing prices stay `None`.
    pub fn to_item_observations(df: &DataFrame) -> Result<ItemObservations> {
        let dates = df
            .column(RequiredColumn::Date.as_str())?
            .cast(&DataType::String)?;
        let dates = dates.str()?;
        let items = df.column(RequiredColumn::ItemName.as_str())?.cast(&DataType::String)?;
        let items = items.str()?;
        let qty = df.column(RequiredColumn::SalesQty.as_str())?.cast(&DataType::Int64)?;
        let qty = qty.i64()?;
        let value = df
            .column(RequiredColumn::SalesValue.as_str())?
            .cast(&DataType::Float64)?;
        let value = value.f64()?;
        let price = df
            .column(RequiredColumn::ItemPrice.as_str())?
            .cast(&DataType::Float64)?;
        let price = price.f64()?;

        let mut by_item = ItemObservations::new();

        for i in 0..df.height() {
            let item = items.get(i).ok_or_else(|| {
                DemandError::DataLoading(format!("Missing item name at row {}", i))
            })?;
            let raw_date = dates.get(i).ok_or_else(|| {
                DemandError::DataLoading(format!("Missing sales date at row {}", i))
            })?;

            let observation = DailyObservation::new(
                Self::parse_date(raw_date, i)?,
                qty.get(i).unwrap_or(0),
                value.get(i).unwrap_or(0.0),
                price.get(i),
            );

            by_item.entry(item.to_string()).or_default().push(observation);
        }

        for observations in by_item.values_mut() {
            observations.sort_by_key(|o| o.date);
        }

        Ok(by_item)
    }

    pub fn has_predictions(df: &DataFrame) -> bool {
        df.get_column_names()
            .iter()
            .any(|c| c.as_str() == PREDICTION_COLUMN)
    }

    /// Pair actual `sales_qty` with the `prediction` column, per item.
    ///
    /// Rows without a prediction are skipped.
    pub fn to_prediction_records(df: &DataFrame) -> Result<HashMap<String, Vec<PredictionRecord>>> {
        if !Self::has_predictions(df) {
            return Err(DemandError::DataLoading(format!(
                "Missing required column: {}",
                PREDICTION_COLUMN
            )));
        }

        let dates = df
            .column(RequiredColumn::Date.as_str())?
            .cast(&DataType::String)?;
        let dates = dates.str()?;
        let items = df.column(RequiredColumn::ItemName.as_str())?.cast(&DataType::String)?;
        let items = items.str()?;
        let qty = df
            .column(RequiredColumn::SalesQty.as_str())?
            .cast(&DataType::Float64)?;
        let qty = qty.f64()?;
        let prediction = df.column(PREDICTION_COLUMN)?.cast(&DataType::Float64)?;
        let prediction = prediction.f64()?;

        let mut by_item: HashMap<String, Vec<PredictionRecord>> = HashMap::new();
        let mut skipped = 0usize;

        for i in 0..df.height() {
            let Some(predicted) = prediction.get(i) else {
                skipped += 1;
                continue;
            };
            let item = items.get(i).ok_or_else(|| {
                DemandError::DataLoading(format!("Missing item name at row {}", i))
            })?;
            let raw_date = dates.get(i).ok_or_else(|| {
                DemandError::DataLoading(format!("Missing sales date at row {}", i))
            })?;

            by_item.entry(item.to_string()).or_default().push(PredictionRecord::new(
                Self::parse_date(raw_date, i)?,
                qty.get(i).unwrap_or(0.0),
                predicted,
            ));
        }

        if skipped > 0 {
            log::debug!("Skipped {} rows without a prediction", skipped);
        }
        for records in by_item.values_mut() {
            records.sort_by_key(|r| r.date);
        }

        Ok(by_item)
    }

    /// Create metadata for a loaded, normalized DataFrame
    pub fn create_metadata<P: AsRef<Path>>(path: P, df: &DataFrame) -> Result<DatasetMetadata> {
        let by_item = Self::to_item_observations(df)?;

        let date_range = by_item
            .values()
            .flat_map(|obs| obs.iter().map(|o| o.date))
            .fold(None, |range: Option<(NaiveDate, NaiveDate)>, d| match range {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        let total_sales_qty = by_item
            .values()
            .flat_map(|obs| obs.iter().map(|o| o.sales_qty))
            .sum();

        Ok(DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_items: by_item.len(),
            columns: df.get_column_names().iter().map(|s| s.to_string()).collect(),
            date_range,
            total_sales_qty,
        })
    }

    // Accepts plain dates and timestamps that start with one
    fn parse_date(raw: &str, row: usize) -> Result<NaiveDate> {
        let day_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|e| {
            DemandError::DataLoading(format!("Invalid sales date '{}' at row {}: {}", raw, row, e))
        })
    }
}
