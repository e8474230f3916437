use super::{
    calendar::CalendarConfig, data::DataConfig, evaluation::EvaluationConfig,
    traits::{ConfigManifest, ConfigSection}, validation::ValidationConfig,
};
use crate::error::DemandError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `DEMANDBIAS_VALIDATION__NUM_TRAIN_YEARS=4`
pub const ENV_PREFIX: &str = "DEMANDBIAS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub validation: ValidationConfig,
    pub calendar: CalendarConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), DemandError> {
        self.data.validate()?;
        self.validation.validate()?;
        self.calendar.validate()?;
        self.evaluation.validate()?;
        Ok(())
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.data.to_manifest(),
            self.validation.to_manifest(),
            self.calendar.to_manifest(),
            self.evaluation.to_manifest(),
        ]
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DemandError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DemandError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| DemandError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Load an optional TOML file, then apply `DEMANDBIAS_<SECTION>__<FIELD>` environment overrides
    pub fn load_layered(&self, path: Option<&Path>) -> Result<(), DemandError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DemandError::Configuration(format!("Failed to load config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| DemandError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DemandError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| DemandError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| DemandError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, DemandError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| DemandError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` to a copy and keep it only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), DemandError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), DemandError> {
        config.validate()?;
        let mut current = self
            .config
            .write()
            .map_err(|_| DemandError::Configuration("Config lock poisoned".to_string()))?;
        *current = config;
        Ok(())
    }
}
