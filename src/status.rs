//! Current status reduction
//!
//! The current status of a stream is read from its last record in input
//! order; upstream delivers records chronologically and no re-sorting is
//! done here.

use crate::classify::{classify, ColorPolicy};
use crate::config::UNAVAILABLE_LABEL;
use crate::schema::Classified;
use crate::types::StatusSummary;

/// Current status with the default "N/A" sentinel label
pub fn current_status<R: Classified>(records: &[R]) -> StatusSummary {
    current_status_with(records, UNAVAILABLE_LABEL)
}

/// Current status of a stream.
///
/// Label: interpretation, else the raw level label, else `unavailable_label`.
/// Color: the level under [`ColorPolicy::NeutralStatus`].
pub fn current_status_with<R: Classified>(records: &[R], unavailable_label: &str) -> StatusSummary {
    let Some(last) = records.last() else {
        return StatusSummary {
            label: unavailable_label.to_string(),
            color: classify(None, ColorPolicy::NeutralStatus).color,
        };
    };

    let label = last
        .interpretation()
        .or_else(|| last.level_label())
        .unwrap_or(unavailable_label);

    StatusSummary {
        label: label.to_string(),
        color: classify(last.level_label(), ColorPolicy::NeutralStatus).color,
    }
}
