use super::traits::{ConfigSection, ConfigManifest, FieldManifest};
use crate::error::ZstatesError;
use serde::{Deserialize, Serialize};

/// Model hyperparameters handed to the scorer on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub pi: f64,      // Prior probability that an item is causal
    pub mu: f64,      // Prior mean of causal effects
    pub sig2: f64,    // Prior variance of causal effects
    pub vmin: f64,    // Variance floor
    pub mureg: f64,   // Regularization mean
    pub sigreg2: f64, // Regularization variance
    pub precll: f64,  // Precision of the likelihood
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            pi: 0.01,
            mu: 0.0,
            sig2: 0.01,
            vmin: 0.0001,
            mureg: 0.0,
            sigreg2: 0.0001,
            precll: 1.0,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<(), ZstatesError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ZstatesError::Configuration(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn finite(name: &str, value: f64) -> Result<(), ZstatesError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ZstatesError::Configuration(format!("{} must be finite", name)))
    }
}

impl ConfigSection for Hyperparameters {
    fn section_name() -> &'static str {
        "hyperparameters"
    }

    fn validate(&self) -> Result<(), ZstatesError> {
        if !(self.pi > 0.0 && self.pi < 1.0) {
            return Err(ZstatesError::Configuration(format!(
                "pi must be between 0 and 1, got {}",
                self.pi
            )));
        }
        finite("mu", self.mu)?;
        positive("sig2", self.sig2)?;
        finite("vmin", self.vmin)?;
        if self.vmin < 0.0 {
            return Err(ZstatesError::Configuration(
                "vmin must not be negative".to_string()
            ));
        }
        finite("mureg", self.mureg)?;
        positive("sigreg2", self.sigreg2)?;
        positive("precll", self.precll)?;
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let d = Self::default();
        ConfigManifest {
            section: "Hyperparameters".to_string(),
            fields: vec![
                FieldManifest::new("pi", "float", serde_json::json!(d.pi), "Prior causal probability")
                    .bounded(Some(0.0), Some(1.0)),
                FieldManifest::new("mu", "float", serde_json::json!(d.mu), "Prior mean of effect sizes"),
                FieldManifest::new("sig2", "float", serde_json::json!(d.sig2), "Prior variance of effect sizes")
                    .bounded(Some(0.0), None),
                FieldManifest::new("vmin", "float", serde_json::json!(d.vmin), "Variance floor")
                    .bounded(Some(0.0), None),
                FieldManifest::new("mureg", "float", serde_json::json!(d.mureg), "Regularization mean"),
                FieldManifest::new("sigreg2", "float", serde_json::json!(d.sigreg2), "Regularization variance")
                    .bounded(Some(0.0), None),
                FieldManifest::new("precll", "float", serde_json::json!(d.precll), "Likelihood precision")
                    .bounded(Some(0.0), None),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Hyperparameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            Hyperparameters { pi: 1.0, ..Default::default() },
            Hyperparameters { sig2: 0.0, ..Default::default() },
            Hyperparameters { vmin: -1.0, ..Default::default() },
            Hyperparameters { mu: f64::INFINITY, ..Default::default() },
            Hyperparameters { precll: f64::NAN, ..Default::default() },
        ];
        for params in cases {
            assert!(params.validate().is_err(), "{:?} accepted", params);
        }
    }
}
