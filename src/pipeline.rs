//! Pipeline orchestration
//!
//! This module provides the public API for Mobility Insight.
//! It assembles every per-metric view model from one analysis snapshot and
//! keeps the single "current view" slot of a browsing session.

use crate::aggregate::{combine, y_range};
use crate::config::ViewConfig;
use crate::encoder::ViewEncoder;
use crate::error::ViewError;
use crate::normalizer::{Normalizer, StreamReport};
use crate::schema::{
    DailyTransitionsRecord, MealDurationRecord, MonthlyMealsRecord, NutritionRecord, RawPayload,
    ScoreRecord, Stream, TransitionCountRecord, WalkingSpeedRecord,
};
use crate::series::SeriesBuilder;
use crate::span::day_span;
use crate::status::current_status_with;
use crate::types::{
    ChartSeries, ColorToken, DashboardView, NutritionView, ScoringView, TransitionsView,
    WalkingSpeedView,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Series ids handed to the rendering layer
pub const WALKING_SPEED_SERIES: &str = "Vitesse";
pub const TRANSITIONS_SERIES: &str = "transitions";
pub const DAILY_TRANSITIONS_SERIES: &str = "transitions_daily_avg";
pub const MOBILITY_LEVELS_SERIES: &str = "mobility_levels";
pub const NUTRITION_LEVELS_SERIES: &str = "nutrition_levels";
pub const NUTRITION_SCORE_SERIES: &str = "Snutrition";
pub const MEAL_DURATION_SERIES: &str = "Durée moyenne des repas";
pub const MONTHLY_MEALS_SERIES: &str = "meals";

/// Interpretation shown on a nutrition band without one
pub const UNSPECIFIED_INTERPRETATION: &str = "Non spécifié";

/// One uploaded analysis result, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub payload: RawPayload,
}

impl AnalysisSnapshot {
    pub fn new(payload: RawPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            payload,
        }
    }

    /// Parse JSON text into a new snapshot
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        Ok(Self::new(RawPayload::from_json(json)?))
    }
}

/// Build every view model from a payload.
///
/// Never fails: a missing or malformed stream only yields empty series, an
/// unavailable span and an "N/A" status for that metric.
pub fn build_dashboard(payload: &RawPayload, config: &ViewConfig) -> DashboardView {
    DashboardView {
        walking_speed: build_walking_speed(payload),
        transitions: build_transitions(payload, config),
        scoring: build_scoring(payload, config),
        nutrition: build_nutrition(payload, config),
        meal_durations: build_meal_durations(payload, config),
        monthly_meals: build_monthly_meals(payload, config),
    }
}

/// Normalization outcome of every raw list in the payload, in display order.
///
/// The transitions list feeds both the count and the daily-average series;
/// it is reported once, an element being dropped only when neither kept it.
pub fn stream_reports(payload: &RawPayload) -> Vec<StreamReport> {
    Stream::ALL
        .iter()
        .filter(|&&stream| stream != Stream::DailyTransitions)
        .map(|&stream| {
            let raw = payload.stream(stream);
            match stream {
                Stream::WalkingSpeed => Normalizer::normalize_with_report::<WalkingSpeedRecord>(raw).1,
                Stream::Transitions | Stream::DailyTransitions => {
                    let (_, counts) = Normalizer::normalize_with_report::<TransitionCountRecord>(raw);
                    let (_, averages) =
                        Normalizer::normalize_with_report::<DailyTransitionsRecord>(raw);
                    counts.merge(&averages)
                }
                Stream::Scoring => Normalizer::normalize_with_report::<ScoreRecord>(raw).1,
                Stream::Nutrition => Normalizer::normalize_with_report::<NutritionRecord>(raw).1,
                Stream::MealDurations => Normalizer::normalize_with_report::<MealDurationRecord>(raw).1,
                Stream::MonthlyMeals => Normalizer::normalize_with_report::<MonthlyMealsRecord>(raw).1,
            }
        })
        .collect()
}

fn build_walking_speed(payload: &RawPayload) -> WalkingSpeedView {
    let records: Vec<WalkingSpeedRecord> =
        Normalizer::normalize(payload.stream(Stream::WalkingSpeed));

    WalkingSpeedView {
        series: SeriesBuilder::build(&records, WALKING_SPEED_SERIES, ColorToken::Green),
        span: day_span(&records),
    }
}

fn build_transitions(payload: &RawPayload, config: &ViewConfig) -> TransitionsView {
    let counts: Vec<TransitionCountRecord> =
        Normalizer::normalize(payload.stream(Stream::Transitions));
    let averages: Vec<DailyTransitionsRecord> =
        Normalizer::normalize(payload.stream(Stream::DailyTransitions));

    TransitionsView {
        counts: SeriesBuilder::build(&counts, TRANSITIONS_SERIES, ColorToken::Blue),
        daily_average: SeriesBuilder::build_with(
            &averages,
            DAILY_TRANSITIONS_SERIES,
            ColorToken::Blue,
            |r| Some(config.round(r.daily_avg_transitions)),
        ),
        span: day_span(&counts),
    }
}

fn build_scoring(payload: &RawPayload, config: &ViewConfig) -> ScoringView {
    let records: Vec<ScoreRecord> = Normalizer::normalize(payload.stream(Stream::Scoring));
    let combined = combine(&records);

    ScoringView {
        y_range: y_range(&combined),
        combined,
        components: SeriesBuilder::build_components(&records),
        levels: SeriesBuilder::build_bands(&records, MOBILITY_LEVELS_SERIES, ColorToken::Green, ""),
        status: current_status_with(&records, &config.unavailable_label),
    }
}

fn build_nutrition(payload: &RawPayload, config: &ViewConfig) -> NutritionView {
    let records: Vec<NutritionRecord> = Normalizer::normalize(payload.stream(Stream::Nutrition));

    NutritionView {
        levels: SeriesBuilder::build_bands(
            &records,
            NUTRITION_LEVELS_SERIES,
            ColorToken::Green,
            UNSPECIFIED_INTERPRETATION,
        ),
        scores: SeriesBuilder::build_with(&records, NUTRITION_SCORE_SERIES, ColorToken::Blue, |r| {
            r.score
        }),
        status: current_status_with(&records, &config.unavailable_label),
        span: day_span(&records),
    }
}

fn build_meal_durations(payload: &RawPayload, config: &ViewConfig) -> ChartSeries {
    let records: Vec<MealDurationRecord> =
        Normalizer::normalize(payload.stream(Stream::MealDurations));

    SeriesBuilder::build_with(&records, MEAL_DURATION_SERIES, ColorToken::Blue, |r| {
        Some(config.round(r.avg_duration_minutes))
    })
}

fn build_monthly_meals(payload: &RawPayload, config: &ViewConfig) -> ChartSeries {
    let records: Vec<MonthlyMealsRecord> =
        Normalizer::normalize(payload.stream(Stream::MonthlyMeals));

    SeriesBuilder::build_with(&records, MONTHLY_MEALS_SERIES, ColorToken::Blue, |r| {
        Some(config.round(r.daily_avg_meals))
    })
}

/// Convert analysis JSON to the rendering-layer JSON envelope (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let view_json = analysis_to_view(backend_json)?;
/// ```
pub fn analysis_to_view(raw_json: String) -> Result<String, ViewError> {
    let snapshot = AnalysisSnapshot::from_json(&raw_json)?;
    let config = ViewConfig::default();
    let view = build_dashboard(&snapshot.payload, &config);

    ViewEncoder::new(config).encode_to_json(&snapshot, &view)
}

/// Snapshot together with the views built from it
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub snapshot: AnalysisSnapshot,
    pub view: DashboardView,
}

/// Holds the current view of a browsing session.
///
/// Created empty, replaced as a whole on every successful upload, cleared at
/// session end. A rejected upload leaves the previous view in place.
pub struct InsightSession {
    config: ViewConfig,
    encoder: ViewEncoder,
    current: Option<CurrentView>,
}

impl Default for InsightSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightSession {
    /// Create a new session with default settings
    pub fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    pub fn with_config(config: ViewConfig) -> Self {
        Self {
            encoder: ViewEncoder::new(config.clone()),
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Ingest a newly uploaded analysis payload and make it current
    pub fn ingest(&mut self, raw_json: &str) -> Result<&CurrentView, ViewError> {
        let snapshot = AnalysisSnapshot::from_json(raw_json)?;
        Ok(self.replace(snapshot))
    }

    /// Make an already-built snapshot current
    pub fn replace(&mut self, snapshot: AnalysisSnapshot) -> &CurrentView {
        let view = build_dashboard(&snapshot.payload, &self.config);
        tracing::info!(
            snapshot_id = %snapshot.id,
            replaced = self.current.is_some(),
            "analysis snapshot is now current"
        );
        self.current.insert(CurrentView { snapshot, view })
    }

    pub fn current(&self) -> Option<&CurrentView> {
        self.current.as_ref()
    }

    /// Encode the current view for the rendering layer
    pub fn current_json(&self) -> Result<Option<String>, ViewError> {
        self.current
            .as_ref()
            .map(|c| self.encoder.encode_to_json(&c.snapshot, &c.view))
            .transpose()
    }

    /// Drop the current view (end of session)
    pub fn clear(&mut self) {
        self.current = None;
    }
}
