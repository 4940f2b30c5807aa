//! Record normalization
//!
//! This module turns one raw stream into an ordered list of typed records.
//! - A stream that is absent or not a list yields no records
//! - Elements failing their record's required-field check are dropped
//! - Numeric fields accept JSON numbers and numeric strings

use crate::schema::{Stream, StreamRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of normalizing one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamReport {
    pub stream: Stream,
    /// Whether the payload held a list for this stream
    pub present: bool,
    pub total: usize,
    pub kept: usize,
    /// Input indices of dropped elements
    pub dropped: Vec<usize>,
}

impl StreamReport {
    /// Combine two readings of the same raw list.
    ///
    /// An element counts as dropped only when neither reading kept it.
    pub fn merge(self, other: &StreamReport) -> StreamReport {
        let total = self.total.max(other.total);
        let dropped: Vec<usize> = self
            .dropped
            .into_iter()
            .filter(|index| other.dropped.contains(index))
            .collect();

        StreamReport {
            stream: self.stream,
            present: self.present || other.present,
            total,
            kept: total - dropped.len(),
            dropped,
        }
    }
}

/// Normalizer for converting raw stream lists to typed records
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw stream, keeping input order
    pub fn normalize<R: StreamRecord>(raw: Option<&Value>) -> Vec<R> {
        Self::normalize_with_report(raw).0
    }

    /// Normalize a raw stream and report which elements were dropped
    pub fn normalize_with_report<R: StreamRecord>(raw: Option<&Value>) -> (Vec<R>, StreamReport) {
        let stream = R::STREAM;

        let Some(items) = raw.and_then(Value::as_array) else {
            if raw.is_some_and(|v| !v.is_null()) {
                tracing::debug!(%stream, "stream is not a list, treating as missing");
            }
            return (
                Vec::new(),
                StreamReport {
                    stream,
                    present: false,
                    total: 0,
                    kept: 0,
                    dropped: Vec::new(),
                },
            );
        };

        let mut records = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match item.as_object().and_then(R::from_fields) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!(%stream, index, "dropping malformed record");
                    dropped.push(index);
                }
            }
        }

        let report = StreamReport {
            stream,
            present: true,
            total: items.len(),
            kept: records.len(),
            dropped,
        };

        (records, report)
    }
}

/// Coerce a field to a finite number.
///
/// Numbers and numeric strings (surrounding whitespace ignored) are accepted.
/// Missing fields, `null`, booleans, empty or non-numeric strings and
/// non-finite results are not.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Coerce a field to a non-empty period label.
///
/// Numeric labels (e.g. a bare year) are rendered as text.
pub fn coerce_label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a field to non-empty free text
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
