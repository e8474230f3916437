use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DemandError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub num_train_years: usize,
    pub percentage_cut: f64, // share of data trained on when history is short
    pub test_split_date: Option<NaiveDate>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            num_train_years: 3,
            percentage_cut: 0.7,
            test_split_date: None,
        }
    }
}

impl ConfigSection for ValidationConfig {
    fn section_name() -> &'static str {
        "validation"
    }

    fn validate(&self) -> Result<(), DemandError> {
        if self.num_train_years == 0 {
            return Err(DemandError::Configuration(
                "Number of training years must be positive".to_string(),
            ));
        }
        if !(self.percentage_cut > 0.0 && self.percentage_cut < 1.0) {
            return Err(DemandError::Configuration(
                "Percentage cut must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Validation".to_string(),
            fields: vec![
                FieldManifest::new(
                    "num_train_years",
                    "integer",
                    serde_json::json!(3),
                    "Years of history in each training window",
                )
                .with_bounds(Some(1.0), None),
                FieldManifest::new(
                    "percentage_cut",
                    "float",
                    serde_json::json!(0.7),
                    "Training share when there are fewer years than the window",
                )
                .with_bounds(Some(0.0), Some(1.0)),
                FieldManifest::new(
                    "test_split_date",
                    "date",
                    serde_json::Value::Null,
                    "First day of the hold-out test set",
                ),
            ],
        }
    }
}
