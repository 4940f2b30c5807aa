//! Analysis payload input boundary
//!
//! The analysis backend returns a loosely typed JSON object. Every stream key
//! is optional and may be null or of the wrong type; only a top-level value
//! that is not an object is rejected.

use crate::error::ViewError;
use crate::schema::streams::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the backend upload response nests the analysis
pub const ANALYSIS_RESULTS_KEY: &str = "analysis_results";

/// Raw analysis payload with each stream kept as untyped JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub transitions: Option<Value>,
    #[serde(default)]
    pub walking_speed: Option<Value>,
    /// Object with a `raw` list
    #[serde(default)]
    pub scoring: Option<Value>,
    /// Object with a `raw` list
    #[serde(default)]
    pub nutrition: Option<Value>,
    #[serde(default)]
    pub meal_durations: Option<Value>,
    #[serde(default)]
    pub monthly_meals: Option<Value>,
}

impl RawPayload {
    /// Parse a payload from JSON text
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a payload from an already-parsed JSON value.
    ///
    /// An `analysis_results` wrapper object is unwrapped first.
    pub fn from_value(value: Value) -> Result<Self, ViewError> {
        let mut map = match value {
            Value::Object(mut map) => match map.remove(ANALYSIS_RESULTS_KEY) {
                Some(Value::Object(inner)) => inner,
                Some(other) => {
                    map.insert(ANALYSIS_RESULTS_KEY.to_string(), other);
                    map
                }
                None => map,
            },
            other => {
                tracing::warn!(kind = json_kind(&other), "rejecting non-object analysis payload");
                return Err(ViewError::MalformedPayload(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        Ok(Self {
            transitions: take_key(&mut map, &["transitions"]),
            walking_speed: take_key(&mut map, &["walking_speed", "walkingSpeed"]),
            scoring: take_key(&mut map, &["scoring"]),
            nutrition: take_key(&mut map, &["nutrition"]),
            meal_durations: take_key(&mut map, &["meal_durations", "mealDurations"]),
            monthly_meals: take_key(&mut map, &["monthly_meals", "monthlyMeals"]),
        })
    }

    /// Raw list backing a stream, if present.
    ///
    /// Returns whatever sits at the stream's location; the normalizer decides
    /// whether it is usable.
    pub fn stream(&self, stream: Stream) -> Option<&Value> {
        match stream {
            Stream::WalkingSpeed => self.walking_speed.as_ref(),
            Stream::Transitions | Stream::DailyTransitions => self.transitions.as_ref(),
            Stream::Scoring => self.scoring.as_ref().and_then(|s| s.get("raw")),
            Stream::Nutrition => self.nutrition.as_ref().and_then(|n| n.get("raw")),
            Stream::MealDurations => self.meal_durations.as_ref(),
            Stream::MonthlyMeals => self.monthly_meals.as_ref(),
        }
    }
}

/// First non-null value among `keys`, snake_case spelling listed first
fn take_key(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| map.remove(*key))
        .find(|value| !value.is_null())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_valid() {
        let payload = RawPayload::from_json("{}").unwrap();
        assert_eq!(payload, RawPayload::default());
        for stream in Stream::ALL {
            assert!(payload.stream(stream).is_none());
        }
    }

    #[test]
    fn test_non_object_rejected() {
        for json in ["[]", "42", "\"text\"", "null"] {
            let err = RawPayload::from_json(json).unwrap_err();
            assert!(matches!(err, ViewError::MalformedPayload(_)), "{json}");
        }
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = RawPayload::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, ViewError::Json(_)));
    }

    #[test]
    fn test_unwraps_analysis_results() {
        let payload = RawPayload::from_value(json!({
            "analysis_results": {
                "walking_speed": [{"period": "2024-01-01", "walking_speed_m_s": 1.1}]
            }
        }))
        .unwrap();

        assert!(payload.stream(Stream::WalkingSpeed).unwrap().is_array());
    }

    #[test]
    fn test_camel_case_aliases() {
        let payload = RawPayload::from_value(json!({
            "walkingSpeed": [],
            "mealDurations": [],
            "monthlyMeals": []
        }))
        .unwrap();

        assert!(payload.stream(Stream::WalkingSpeed).is_some());
        assert!(payload.stream(Stream::MealDurations).is_some());
        assert!(payload.stream(Stream::MonthlyMeals).is_some());
    }

    #[test]
    fn test_both_key_spellings_prefer_snake_case() {
        let payload = RawPayload::from_json(
            r#"{
                "walking_speed": [{"period": "2024-01-01", "walking_speed_m_s": 1.0}],
                "walkingSpeed": [],
                "meal_durations": null,
                "mealDurations": [{"month": "2024-01", "avg_duration_minutes": 20}]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.stream(Stream::WalkingSpeed).unwrap().as_array().unwrap().len(), 1);
        assert_eq!(payload.stream(Stream::MealDurations).unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_null_streams_are_absent() {
        let payload = RawPayload::from_value(json!({"transitions": null, "scoring": null})).unwrap();
        assert_eq!(payload, RawPayload::default());
    }

    #[test]
    fn test_nested_raw_lists() {
        let payload = RawPayload::from_value(json!({
            "scoring": {"raw": [{"period": "Jan"}], "formatted": {}},
            "nutrition": {"formatted": []}
        }))
        .unwrap();

        assert_eq!(payload.stream(Stream::Scoring).unwrap().as_array().unwrap().len(), 1);
        assert!(payload.stream(Stream::Nutrition).is_none());
    }

    #[test]
    fn test_wrong_stream_types_are_kept_untyped() {
        let payload = RawPayload::from_value(json!({
            "transitions": "oops",
            "scoring": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(payload.stream(Stream::Transitions), Some(&json!("oops")));
        assert!(payload.stream(Stream::Scoring).is_none());
    }
}
