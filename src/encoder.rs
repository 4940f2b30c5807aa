//! View encoding
//!
//! This module wraps a dashboard view into the envelope handed to the
//! rendering layer: producer metadata, the snapshot it was built from, and
//! the palette resolving every color token used in the view.

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::pipeline::AnalysisSnapshot;
use crate::types::{ColorToken, DashboardView};
use crate::{INSIGHT_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current envelope schema version
pub const VIEW_SCHEMA_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Payload handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEnvelope {
    pub schema_version: String,
    pub producer: ViewProducer,
    pub snapshot_id: String,
    pub received_at_utc: String,
    pub computed_at_utc: String,
    /// Token name → concrete color
    pub palette: BTreeMap<String, String>,
    pub view: DashboardView,
}

/// Encoder for rendering-layer envelopes
pub struct ViewEncoder {
    instance_id: String,
    config: ViewConfig,
}

impl Default for ViewEncoder {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl ViewEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new(config: ViewConfig) -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            config,
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String, config: ViewConfig) -> Self {
        Self {
            instance_id,
            config,
        }
    }

    pub fn encode(&self, snapshot: &AnalysisSnapshot, view: &DashboardView) -> ViewEnvelope {
        ViewEnvelope {
            schema_version: VIEW_SCHEMA_VERSION.to_string(),
            producer: ViewProducer {
                name: PRODUCER_NAME.to_string(),
                version: INSIGHT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            snapshot_id: snapshot.id.to_string(),
            received_at_utc: snapshot.received_at.to_rfc3339(),
            computed_at_utc: Utc::now().to_rfc3339(),
            palette: self.palette(),
            view: view.clone(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        snapshot: &AnalysisSnapshot,
        view: &DashboardView,
    ) -> Result<String, ViewError> {
        let envelope = self.encode(snapshot, view);
        serde_json::to_string_pretty(&envelope).map_err(|e| ViewError::Encoding(e.to_string()))
    }

    fn palette(&self) -> BTreeMap<String, String> {
        [
            ColorToken::Red,
            ColorToken::Orange,
            ColorToken::Green,
            ColorToken::Blue,
            ColorToken::NeutralGrey,
        ]
        .into_iter()
        .map(|token| {
            (
                token.as_str().to_string(),
                self.config.palette.resolve(token).to_string(),
            )
        })
        .collect()
    }
}
