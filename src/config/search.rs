use super::traits::{ConfigSection, ConfigManifest, FieldManifest};
use crate::error::ZstatesError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub cmax: usize,                   // Largest number of causal items per state
    pub target: f64,                   // Fraction of score mass the leaders must hold
    pub max_level_size: Option<usize>, // Hard cap on the states of one level
    pub parallel_expansion: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cmax: 2,
            target: 0.98,
            max_level_size: None,
            parallel_expansion: false,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), ZstatesError> {
        if self.cmax < 1 {
            return Err(ZstatesError::Configuration(
                "cmax must be at least 1".to_string()
            ));
        }
        if !(self.target > 0.0 && self.target <= 1.0) {
            return Err(ZstatesError::Configuration(format!(
                "target must be in (0, 1], got {}",
                self.target
            )));
        }
        if self.max_level_size == Some(0) {
            return Err(ZstatesError::Configuration(
                "max_level_size must be positive when set".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Search".to_string(),
            fields: vec![
                FieldManifest::new(
                    "cmax",
                    "integer",
                    serde_json::json!(defaults.cmax),
                    "Maximum number of causal items in a state",
                )
                .bounded(Some(1.0), None),
                FieldManifest::new(
                    "target",
                    "float",
                    serde_json::json!(defaults.target),
                    "Share of a level's score mass kept by the leaders",
                )
                .bounded(Some(0.0), Some(1.0)),
                FieldManifest::new(
                    "max_level_size",
                    "integer",
                    serde_json::Value::Null,
                    "Abort when a level would hold more states than this",
                )
                .bounded(Some(1.0), None),
                FieldManifest::new(
                    "parallel_expansion",
                    "bool",
                    serde_json::json!(defaults.parallel_expansion),
                    "Generate candidates of each leader on the thread pool",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_target_bounds() {
        for target in [0.0, -0.1, 1.01, f64::NAN] {
            let config = SearchConfig {
                target,
                ..SearchConfig::default()
            };
            assert!(config.validate().is_err(), "target {} accepted", target);
        }

        let config = SearchConfig {
            target: 1.0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cmax_and_capacity() {
        let config = SearchConfig {
            cmax: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            max_level_size: Some(0),
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manifest_lists_fields() {
        let manifest = SearchConfig::default().to_manifest();
        let names: Vec<&str> = manifest.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["cmax", "target", "max_level_size", "parallel_expansion"]);
    }
}
