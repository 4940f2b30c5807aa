//! Core types for the Mobility Insight pipeline
//!
//! This module defines the value objects handed to the rendering layer:
//! severity levels, color tokens, chart series, status summaries, day spans
//! and the per-metric view models assembled from one analysis payload.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity tier of a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Normal,
    Alerte,
    Danger,
    Unknown,
}

impl Level {
    /// Exact-match lookup of an upstream level label.
    ///
    /// Anything other than `"Normal"`, `"Alerte"` or `"Danger"` (including an
    /// empty label or a different casing) is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Danger" => Level::Danger,
            "Alerte" => Level::Alerte,
            "Normal" => Level::Normal,
            _ => Level::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Normal => "Normal",
            Level::Alerte => "Alerte",
            Level::Danger => "Danger",
            Level::Unknown => "Unknown",
        }
    }

    /// Rank on the severity scale; `Unknown` has none
    pub fn severity(&self) -> Option<u8> {
        match self {
            Level::Normal => Some(0),
            Level::Alerte => Some(1),
            Level::Danger => Some(2),
            Level::Unknown => None,
        }
    }
}

// Unknown only compares equal to itself.
impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract display color, resolved to a concrete value by the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Red,
    Orange,
    Green,
    Blue,
    NeutralGrey,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Red => "red",
            ColorToken::Orange => "orange",
            ColorToken::Green => "green",
            ColorToken::Blue => "blue",
            ColorToken::NeutralGrey => "neutral_grey",
        }
    }
}

/// Classification metadata attached to a chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMeta {
    /// Classified tier
    pub level: Level,
    /// Level label as shown to the user
    pub label: String,
    /// Free-text interpretation from upstream
    pub interpretation: String,
    /// Color derived from the tier
    pub color: ColorToken,
}

/// One point of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PointMeta>,
}

impl ChartPoint {
    pub fn new(x: impl Into<String>, y: f64) -> Self {
        Self {
            x: x.into(),
            y,
            meta: None,
        }
    }
}

/// Named, ordered series of points ready for a chart widget.
///
/// Points keep the order of the source stream. An empty `points` list means
/// "no data" and is never replaced by `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub id: String,
    pub color: ColorToken,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn empty(id: impl Into<String>, color: ColorToken) -> Self {
        Self {
            id: id.into(),
            color,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Y values in point order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// Summarized "current status" of a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub label: String,
    pub color: ColorToken,
}

/// Inclusive number of days covered by a stream, or `null` when no period
/// could be read as a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaySpan {
    Days(u32),
    Unavailable,
}

impl DaySpan {
    pub fn days(&self) -> Option<u32> {
        match self {
            DaySpan::Days(d) => Some(*d),
            DaySpan::Unavailable => None,
        }
    }
}

/// Visible y-axis band; always contains zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

/// Walking speed line (m/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingSpeedView {
    pub series: ChartSeries,
    pub span: DaySpan,
}

/// Transition counts and daily averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionsView {
    pub counts: ChartSeries,
    pub daily_average: ChartSeries,
    pub span: DaySpan,
}

/// Composite mobility score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringView {
    /// Speed + transitions cumulative score per period
    pub combined: ChartSeries,
    /// One line per cumulative component
    pub components: Vec<ChartSeries>,
    /// Constant-height level bands
    pub levels: ChartSeries,
    pub y_range: YRange,
    pub status: StatusSummary,
}

/// Monthly nutrition classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionView {
    pub levels: ChartSeries,
    pub scores: ChartSeries,
    pub status: StatusSummary,
    pub span: DaySpan,
}

/// Complete set of view models derived from one analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub walking_speed: WalkingSpeedView,
    pub transitions: TransitionsView,
    pub scoring: ScoringView,
    pub nutrition: NutritionView,
    pub meal_durations: ChartSeries,
    pub monthly_meals: ChartSeries,
}
