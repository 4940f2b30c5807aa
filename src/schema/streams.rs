//! Per-stream record shapes
//!
//! Every metric stream in the analysis payload has its own field names and
//! its own required-field set (`Level` on scoring, `classification` on
//! nutrition, `month` vs `period` as the time key). Each stream is modelled
//! by one explicit record type implementing [`StreamRecord`].

use crate::normalizer::{coerce_label, coerce_number, coerce_text};
use crate::types::Level;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Logical streams read from the analysis payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    WalkingSpeed,
    Transitions,
    DailyTransitions,
    Scoring,
    Nutrition,
    MealDurations,
    MonthlyMeals,
}

impl Stream {
    pub const ALL: [Stream; 7] = [
        Stream::WalkingSpeed,
        Stream::Transitions,
        Stream::DailyTransitions,
        Stream::Scoring,
        Stream::Nutrition,
        Stream::MealDurations,
        Stream::MonthlyMeals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::WalkingSpeed => "walking_speed",
            Stream::Transitions => "transitions",
            Stream::DailyTransitions => "daily_transitions",
            Stream::Scoring => "scoring",
            Stream::Nutrition => "nutrition",
            Stream::MealDurations => "meal_durations",
            Stream::MonthlyMeals => "monthly_meals",
        }
    }

    /// Location of the raw list inside the payload
    pub fn payload_path(&self) -> &'static str {
        match self {
            Stream::WalkingSpeed => "walking_speed",
            Stream::Transitions | Stream::DailyTransitions => "transitions",
            Stream::Scoring => "scoring.raw",
            Stream::Nutrition => "nutrition.raw",
            Stream::MealDurations => "meal_durations",
            Stream::MonthlyMeals => "monthly_meals",
        }
    }

    /// Fields a raw element must carry to be kept. `a|b` means either field.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Stream::WalkingSpeed => &["period"],
            Stream::Transitions => &["period", "transitions_count"],
            Stream::DailyTransitions => &["period", "daily_avg_transitions"],
            Stream::Scoring => &["period"],
            Stream::Nutrition => &["month_start"],
            Stream::MealDurations => &["month", "avg_duration_minutes"],
            Stream::MonthlyMeals => &["month", "daily_avg_meals|meals_count"],
        }
    }

    /// Optional fields read when present
    pub fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            Stream::WalkingSpeed => &["walking_speed_m_s"],
            Stream::Transitions | Stream::DailyTransitions => &[],
            Stream::Scoring => &[
                "cumulative_score_speed",
                "cumulative_score_transitions",
                "Level",
                "Interpretation",
            ],
            Stream::Nutrition => &["Snutrition", "classification", "interpretation"],
            Stream::MealDurations | Stream::MonthlyMeals => &[],
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record built from one raw list element
pub trait StreamRecord: Sized {
    const STREAM: Stream;

    /// Build the record, or `None` when a required field is missing or a
    /// designated numeric field is not coercible
    fn from_fields(fields: &Map<String, Value>) -> Option<Self>;
}

/// Records keyed by a period label
pub trait Periodic {
    fn period(&self) -> &str;
}

/// Records carrying a single numeric value per period
pub trait Measured: Periodic {
    fn value(&self) -> f64;
}

/// Records carrying an upstream classification
pub trait Classified: Periodic {
    /// Raw level label as sent upstream
    fn level_label(&self) -> Option<&str>;
    /// Free-text interpretation, if any
    fn interpretation(&self) -> Option<&str>;

    fn level(&self) -> Level {
        self.level_label().map(Level::from_label).unwrap_or(Level::Unknown)
    }
}

/// Walking speed per period (m/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingSpeedRecord {
    pub period: String,
    /// 0 when upstream sent no usable speed
    pub speed_m_s: f64,
}

impl StreamRecord for WalkingSpeedRecord {
    const STREAM: Stream = Stream::WalkingSpeed;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            period: coerce_label(fields.get("period"))?,
            speed_m_s: coerce_number(fields.get("walking_speed_m_s")).unwrap_or(0.0),
        })
    }
}

/// Transition count per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionCountRecord {
    pub period: String,
    pub transitions_count: f64,
}

impl StreamRecord for TransitionCountRecord {
    const STREAM: Stream = Stream::Transitions;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            period: coerce_label(fields.get("period"))?,
            transitions_count: coerce_number(fields.get("transitions_count"))?,
        })
    }
}

/// Average number of transitions per day over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTransitionsRecord {
    pub period: String,
    pub daily_avg_transitions: f64,
}

impl StreamRecord for DailyTransitionsRecord {
    const STREAM: Stream = Stream::DailyTransitions;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            period: coerce_label(fields.get("period"))?,
            daily_avg_transitions: coerce_number(fields.get("daily_avg_transitions"))?,
        })
    }
}

/// Composite mobility score for one period.
///
/// Both cumulative components come from the same upstream element, so the
/// aggregator never has to join two streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub period: String,
    pub cumulative_transitions_score: Option<f64>,
    pub cumulative_speed_score: Option<f64>,
    /// Raw `Level` label
    pub level_label: Option<String>,
    pub level: Level,
    /// Raw `Interpretation` text
    pub interpretation: Option<String>,
}

impl StreamRecord for ScoreRecord {
    const STREAM: Stream = Stream::Scoring;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let level_label = coerce_text(fields.get("Level"));
        let level = level_label
            .as_deref()
            .map(Level::from_label)
            .unwrap_or(Level::Unknown);

        Some(Self {
            period: coerce_label(fields.get("period"))?,
            cumulative_transitions_score: coerce_number(fields.get("cumulative_score_transitions")),
            cumulative_speed_score: coerce_number(fields.get("cumulative_score_speed")),
            level_label,
            level,
            interpretation: coerce_text(fields.get("Interpretation")),
        })
    }
}

impl Periodic for ScoreRecord {
    fn period(&self) -> &str {
        &self.period
    }
}

impl Classified for ScoreRecord {
    fn level_label(&self) -> Option<&str> {
        self.level_label.as_deref()
    }

    fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }

    fn level(&self) -> Level {
        self.level
    }
}

/// Monthly nutrition classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub month_start: String,
    /// `Snutrition` score
    pub score: Option<f64>,
    pub classification: Option<String>,
    pub level: Level,
    pub interpretation: Option<String>,
}

impl StreamRecord for NutritionRecord {
    const STREAM: Stream = Stream::Nutrition;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let classification = coerce_text(fields.get("classification"));
        let level = classification
            .as_deref()
            .map(Level::from_label)
            .unwrap_or(Level::Unknown);

        Some(Self {
            month_start: coerce_label(fields.get("month_start"))?,
            score: coerce_number(fields.get("Snutrition")),
            classification,
            level,
            interpretation: coerce_text(fields.get("interpretation")),
        })
    }
}

impl Periodic for NutritionRecord {
    fn period(&self) -> &str {
        &self.month_start
    }
}

impl Classified for NutritionRecord {
    fn level_label(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }

    fn level(&self) -> Level {
        self.level
    }
}

/// Average meal duration per month (minutes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDurationRecord {
    pub month: String,
    pub avg_duration_minutes: f64,
}

impl StreamRecord for MealDurationRecord {
    const STREAM: Stream = Stream::MealDurations;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            month: coerce_label(fields.get("month"))?,
            avg_duration_minutes: coerce_number(fields.get("avg_duration_minutes"))?,
        })
    }
}

/// Average number of meals per day for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMealsRecord {
    pub month: String,
    pub daily_avg_meals: f64,
}

impl StreamRecord for MonthlyMealsRecord {
    const STREAM: Stream = Stream::MonthlyMeals;

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let meals = coerce_number(fields.get("daily_avg_meals"))
            .or_else(|| coerce_number(fields.get("meals_count")))?;

        Some(Self {
            month: coerce_label(fields.get("month"))?,
            daily_avg_meals: meals,
        })
    }
}

macro_rules! measured_record {
    ($record:ty, $period:ident, $value:ident) => {
        impl Periodic for $record {
            fn period(&self) -> &str {
                &self.$period
            }
        }

        impl Measured for $record {
            fn value(&self) -> f64 {
                self.$value
            }
        }
    };
}

measured_record!(WalkingSpeedRecord, period, speed_m_s);
measured_record!(TransitionCountRecord, period, transitions_count);
measured_record!(DailyTransitionsRecord, period, daily_avg_transitions);
measured_record!(MealDurationRecord, month, avg_duration_minutes);
measured_record!(MonthlyMealsRecord, month, daily_avg_meals);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_walking_speed_defaults_to_zero() {
        let record =
            WalkingSpeedRecord::from_fields(&fields(json!({"period": "2024-01-01"}))).unwrap();
        assert_eq!(record.speed_m_s, 0.0);

        let record = WalkingSpeedRecord::from_fields(&fields(
            json!({"period": "2024-01-02", "walking_speed_m_s": "abc"}),
        ))
        .unwrap();
        assert_eq!(record.speed_m_s, 0.0);

        assert!(WalkingSpeedRecord::from_fields(&fields(json!({"walking_speed_m_s": 1.2}))).is_none());
    }

    #[test]
    fn test_transition_count_requires_number() {
        let record = TransitionCountRecord::from_fields(&fields(
            json!({"period": "Jan", "transitions_count": "12"}),
        ))
        .unwrap();
        assert_eq!(record.period, "Jan");
        assert_eq!(record.transitions_count, 12.0);

        assert!(TransitionCountRecord::from_fields(&fields(json!({"period": "Feb"}))).is_none());
        assert!(TransitionCountRecord::from_fields(&fields(
            json!({"period": "Mar", "transitions_count": null})
        ))
        .is_none());
    }

    #[test]
    fn test_score_record_levels_and_components() {
        let record = ScoreRecord::from_fields(&fields(json!({
            "period": "Jan",
            "cumulative_score_speed": "-2",
            "Level": "Alerte",
            "Interpretation": "Risque Déclin"
        })))
        .unwrap();

        assert_eq!(record.cumulative_speed_score, Some(-2.0));
        assert_eq!(record.cumulative_transitions_score, None);
        assert_eq!(record.level, Level::Alerte);
        assert_eq!(record.interpretation(), Some("Risque Déclin"));
    }

    #[test]
    fn test_score_record_unknown_level() {
        let record = ScoreRecord::from_fields(&fields(json!({"period": "Jan", "Level": "?"}))).unwrap();
        assert_eq!(record.level, Level::Unknown);
        assert_eq!(record.level_label(), Some("?"));
    }

    #[test]
    fn test_nutrition_uses_classification_field() {
        let record = NutritionRecord::from_fields(&fields(json!({
            "month_start": "2024-02-01",
            "Snutrition": 3,
            "classification": "Danger",
            "interpretation": ""
        })))
        .unwrap();

        assert_eq!(record.period(), "2024-02-01");
        assert_eq!(record.score, Some(3.0));
        assert_eq!(record.level(), Level::Danger);
        assert_eq!(record.interpretation(), None);

        // Mobility-style field names are not read on nutrition records
        let record = NutritionRecord::from_fields(&fields(json!({
            "month_start": "2024-03-01",
            "Level": "Danger"
        })))
        .unwrap();
        assert_eq!(record.level(), Level::Unknown);
    }

    #[test]
    fn test_monthly_meals_field_fallback() {
        let record = MonthlyMealsRecord::from_fields(&fields(
            json!({"month": "2024-01", "meals_count": 3}),
        ))
        .unwrap();
        assert_eq!(record.value(), 3.0);

        let record = MonthlyMealsRecord::from_fields(&fields(
            json!({"month": "2024-01", "daily_avg_meals": 2.5, "meals_count": 3}),
        ))
        .unwrap();
        assert_eq!(record.value(), 2.5);

        assert!(MonthlyMealsRecord::from_fields(&fields(json!({"month": "2024-01"}))).is_none());
    }

    #[test]
    fn test_required_fields_table() {
        for stream in Stream::ALL {
            assert!(!stream.required_fields().is_empty(), "{stream}");
        }
        assert_eq!(Stream::Scoring.payload_path(), "scoring.raw");
        assert_eq!(Stream::DailyTransitions.payload_path(), "transitions");
    }
}
