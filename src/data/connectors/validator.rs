use super::types::RequiredColumn;
use crate::error::{DemandError, Result};
use polars::prelude::*;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Validate that the DataFrame has every daily sales column
    pub fn validate_sales_columns(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(DemandError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        for (req_col, actual_name) in &column_map {
            if !req_col.is_numeric() {
                continue;
            }
            let column = df.column(actual_name)?;
            if !matches!(
                column.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(DemandError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    req_col.as_str(),
                    column.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    fn find_column(df: &DataFrame, required: &RequiredColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        required
            .aliases()
            .into_iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == *alias))
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(DemandError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, only for columns that have nulls
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|c| c.null_count() > 0)
            .map(|c| (c.name().to_string(), c.null_count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "sales_date" => &["2019-01-01", "2019-01-02"],
            "item_name" => &["cola", "cola"],
            "sales_qty" => &[3i64, 0],
            "sales_value" => &[6.0, 0.0],
            "item_price" => &[2.0, 2.0],
        }
        .unwrap();

        assert!(DataValidator::validate_sales_columns(&df).is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df! {
            "sales_date" => &["2019-01-01"],
            "item_name" => &["cola"],
            "sales_qty" => &[3i64],
            "item_price" => &[2.0],
        }
        .unwrap();

        assert!(DataValidator::validate_sales_columns(&df).is_err());
    }

    #[test]
    fn test_validate_non_numeric_quantity() {
        let df = df! {
            "date" => &["2019-01-01"],
            "item" => &["cola"],
            "qty" => &["three"],
            "value" => &[6.0],
            "price" => &[2.0],
        }
        .unwrap();

        assert!(DataValidator::validate_sales_columns(&df).is_err());
    }

    #[test]
    fn test_column_aliases() {
        let df = df! {
            "Date" => &["2019-01-01"],
            "product" => &["cola"],
            "quantity" => &[3i64],
            "revenue" => &[6.0],
            "Price" => &[2.0],
        }
        .unwrap();

        let map = DataValidator::validate_sales_columns(&df).unwrap();
        assert_eq!(map[&RequiredColumn::SalesQty], "quantity");
        assert_eq!(map[&RequiredColumn::Date], "Date");
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! { "sales_qty" => &[1i64, 2] }.unwrap();
        assert!(DataValidator::validate_minimum_rows(&df, 2).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 3).is_err());
    }
}
