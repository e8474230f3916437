use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DemandError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub window_days: i64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { window_days: 365 }
    }
}

impl ConfigSection for EvaluationConfig {
    fn section_name() -> &'static str {
        "evaluation"
    }

    fn validate(&self) -> Result<(), DemandError> {
        if self.window_days <= 0 {
            return Err(DemandError::Configuration(
                "Scoring window must be at least one day".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evaluation".to_string(),
            fields: vec![FieldManifest::new(
                "window_days",
                "integer",
                serde_json::json!(365),
                "Trailing days scored per item",
            )
            .with_bounds(Some(1.0), None)],
        }
    }
}
