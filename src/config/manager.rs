use super::{
    hyperparameters::Hyperparameters,
    search::SearchConfig,
    traits::ConfigSection,
};
use crate::error::ZstatesError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `ZSTATES__SEARCH__CMAX=3`
pub const ENV_PREFIX: &str = "ZSTATES";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub hyperparameters: Hyperparameters,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ZstatesError> {
        self.search.validate()?;
        self.hyperparameters.validate()?;
        Ok(())
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

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ZstatesError> {
        let contents = std::fs::read_to_string(path)?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| ZstatesError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Load a TOML file, then apply `ZSTATES__<SECTION>__<FIELD>` environment overrides
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), ZstatesError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ZstatesError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| ZstatesError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to a copy and keep it only if it still validates
    pub fn update<F>(&self, f: F) -> Result<(), ZstatesError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        f(&mut config);
        self.replace(config)
    }

    fn replace(&self, config: AppConfig) -> Result<(), ZstatesError> {
        config.validate()?;
        let mut current = self
            .config
            .write()
            .map_err(|_| ZstatesError::Configuration("Config lock poisoned".to_string()))?;
        *current = config;
        Ok(())
    }
}
