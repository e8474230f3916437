use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns of the processed daily sales dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Date,
    ItemName,
    SalesQty,
    SalesValue,
    ItemPrice,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "sales_date",
            Self::ItemName => "item_name",
            Self::SalesQty => "sales_qty",
            Self::SalesValue => "sales_value",
            Self::ItemPrice => "item_price",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Date,
            Self::ItemName,
            Self::SalesQty,
            Self::SalesValue,
            Self::ItemPrice,
        ]
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::SalesQty | Self::SalesValue | Self::ItemPrice)
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Date => vec!["sales_date", "date", "Date", "sales_datetime", "day"],
            Self::ItemName => vec!["item_name", "item", "Item", "product"],
            Self::SalesQty => vec!["sales_qty", "qty", "quantity", "Quantity"],
            Self::SalesValue => vec!["sales_value", "value", "revenue", "Revenue"],
            Self::ItemPrice => vec!["item_price", "price", "Price"],
        }
    }
}

/// Summary of a loaded sales dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_items: usize,
    pub columns: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub total_sales_qty: i64,
}
