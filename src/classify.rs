//! Level classification
//!
//! Maps an upstream level label to a severity tier and a display color.
//! Unknown levels are colored differently depending on where they are shown:
//! classification charts paint them green, status summaries paint them grey.

use crate::types::{ColorToken, Level};
use serde::{Deserialize, Serialize};

/// How a tier is turned into a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    /// Level bands and score bars: unknown is green
    OptimisticBand,
    /// Current-status summaries: unknown is neutral grey
    NeutralStatus,
}

impl ColorPolicy {
    pub fn color(&self, level: Level) -> ColorToken {
        match (level, self) {
            (Level::Danger, _) => ColorToken::Red,
            (Level::Alerte, _) => ColorToken::Orange,
            (Level::Normal, _) => ColorToken::Green,
            (Level::Unknown, ColorPolicy::OptimisticBand) => ColorToken::Green,
            (Level::Unknown, ColorPolicy::NeutralStatus) => ColorToken::NeutralGrey,
        }
    }
}

/// Result of classifying one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub tier: Level,
    pub color: ColorToken,
}

/// Classify a level label under the given color policy
pub fn classify(label: Option<&str>, policy: ColorPolicy) -> Classification {
    let tier = label.map(Level::from_label).unwrap_or(Level::Unknown);
    Classification {
        tier,
        color: policy.color(tier),
    }
}
