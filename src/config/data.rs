use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DemandError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub sales_path: Option<String>,
    pub min_rows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sales_path: None,
            min_rows: 1,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), DemandError> {
        if self.min_rows == 0 {
            return Err(DemandError::Configuration(
                "Minimum row count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Data".to_string(),
            fields: vec![
                FieldManifest::new(
                    "sales_path",
                    "path",
                    serde_json::Value::Null,
                    "Processed daily sales CSV",
                ),
                FieldManifest::new(
                    "min_rows",
                    "integer",
                    serde_json::json!(1),
                    "Reject datasets with fewer rows",
                )
                .with_bounds(Some(1.0), None),
            ],
        }
    }
}
