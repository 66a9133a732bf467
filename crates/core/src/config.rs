use folio_protocol::ObserverOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reveal_threshold must be within 0..=1, got {0}")]
    Threshold(f64),
    #[error("{field} must be a finite, non-negative distance, got {value}")]
    Distance { field: &'static str, value: f64 },
}

/// Tunables of the controller layer. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Space kept free above a section after navigating to it (fixed header).
    pub header_clearance: f64,
    /// Delay before focus moves into an opened preview.
    pub focus_delay_ms: u64,
    /// Visible-area fraction at which a region counts as revealed.
    pub reveal_threshold: f64,
    /// How far above the viewport bottom a region must reach before it can
    /// be revealed.
    pub reveal_bottom_margin: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            header_clearance: 80.0,
            focus_delay_ms: 50,
            reveal_threshold: 0.1,
            reveal_bottom_margin: 100.0,
        }
    }
}

impl ControllerConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: ControllerConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::Threshold(self.reveal_threshold));
        }
        for (field, value) in [
            ("header_clearance", self.header_clearance),
            ("reveal_bottom_margin", self.reveal_bottom_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Distance { field, value });
            }
        }
        Ok(())
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.reveal_threshold,
            bottom_margin: self.reveal_bottom_margin,
        }
    }
}
