//! View configuration
//!
//! Display settings shared by the assembler and the encoder: rounding
//! precision, the sentinel label used when no status is available, and the
//! palette resolving color tokens for the rendering layer.

use crate::error::ViewError;
use crate::types::ColorToken;
use serde::{Deserialize, Serialize};

/// Default number of decimals kept for averaged values
pub const DEFAULT_DECIMALS: u32 = 2;

/// Label used by status summaries when a stream is empty
pub const UNAVAILABLE_LABEL: &str = "N/A";

/// Concrete colors for each token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub red: String,
    pub orange: String,
    pub green: String,
    pub blue: String,
    pub neutral_grey: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red: "#db4f4a".to_string(),
            orange: "#f2a541".to_string(),
            green: "#4cceac".to_string(),
            blue: "#6870fa".to_string(),
            neutral_grey: "#666666".to_string(),
        }
    }
}

impl Palette {
    pub fn resolve(&self, token: ColorToken) -> &str {
        match token {
            ColorToken::Red => &self.red,
            ColorToken::Orange => &self.orange,
            ColorToken::Green => &self.green,
            ColorToken::Blue => &self.blue,
            ColorToken::NeutralGrey => &self.neutral_grey,
        }
    }
}

/// Settings for building and encoding view models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Decimals kept for averaged values (meal durations, daily averages)
    pub decimals: u32,
    /// Status label when nothing is known
    pub unavailable_label: String,
    pub palette: Palette,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            unavailable_label: UNAVAILABLE_LABEL.to_string(),
            palette: Palette::default(),
        }
    }
}

impl ViewConfig {
    /// Load configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        let config: ViewConfig =
            serde_json::from_str(json).map_err(|e| ViewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ViewError> {
        serde_json::to_string_pretty(self).map_err(|e| ViewError::Encoding(e.to_string()))
    }

    fn validate(&self) -> Result<(), ViewError> {
        // f64 carries ~15 significant digits
        if self.decimals > 15 {
            return Err(ViewError::Config(format!(
                "decimals must be at most 15, got {}",
                self.decimals
            )));
        }
        if self.unavailable_label.trim().is_empty() {
            return Err(ViewError::Config(
                "unavailable_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Round a value to the configured precision
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        (value * factor).round() / factor
    }
}
