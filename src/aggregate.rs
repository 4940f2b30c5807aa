//! Cumulative score aggregation
//!
//! Combines the speed and transitions cumulative scores of each scoring
//! record into one global mobility score per period.
//!
//! Both components must already live on the same record (they come from one
//! upstream element); no join across separate streams happens here.

use crate::schema::ScoreRecord;
use crate::series::band_meta;
use crate::types::{ChartPoint, ChartSeries, ColorToken, YRange};

/// Series id of the combined mobility score
pub const COMBINED_SCORE_SERIES: &str = "score";

/// Sum of both cumulative components, each counted as 0 when missing
pub fn combined_score(record: &ScoreRecord) -> f64 {
    finite_or_zero(record.cumulative_transitions_score) + finite_or_zero(record.cumulative_speed_score)
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Combined score per period, with the record's classification attached
pub fn combine(records: &[ScoreRecord]) -> ChartSeries {
    let points = records
        .iter()
        .map(|r| ChartPoint {
            x: r.period.clone(),
            y: combined_score(r),
            meta: Some(band_meta(r, "")),
        })
        .collect();

    ChartSeries {
        id: COMBINED_SCORE_SERIES.to_string(),
        color: ColorToken::Green,
        points,
    }
}

/// Visible y range for a series; zero is always inside it
pub fn y_range(series: &ChartSeries) -> YRange {
    series.values().fold(YRange { min: 0.0, max: 0.0 }, |range, y| YRange {
        min: range.min.min(y),
        max: range.max.max(y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;
    use pretty_assertions::assert_eq;

    fn record(period: &str, speed: Option<f64>, transitions: Option<f64>) -> ScoreRecord {
        ScoreRecord {
            period: period.to_string(),
            cumulative_transitions_score: transitions,
            cumulative_speed_score: speed,
            level_label: Some("Danger".to_string()),
            level: Level::Danger,
            interpretation: Some("Déclin rapide".to_string()),
        }
    }

    #[test]
    fn test_missing_component_counts_as_zero() {
        let series = combine(&[record("Jan", Some(-2.0), None)]);
        assert_eq!(series.points[0].x, "Jan");
        assert_eq!(series.points[0].y, -2.0);

        let series = combine(&[record("Feb", None, Some(3.5))]);
        assert_eq!(series.points[0].y, 3.5);

        let series = combine(&[record("Mar", None, None)]);
        assert_eq!(series.points[0].y, 0.0);
    }

    #[test]
    fn test_non_finite_component_never_propagates() {
        let series = combine(&[record("Jan", Some(f64::NAN), Some(4.0))]);
        assert_eq!(series.points[0].y, 4.0);
        assert!(series.values().all(f64::is_finite));
    }

    #[test]
    fn test_sum_and_metadata() {
        let series = combine(&[record("Jan", Some(-2.0), Some(-2.0)), record("Feb", Some(1.0), Some(2.0))]);

        assert_eq!(series.values().collect::<Vec<_>>(), vec![-4.0, 3.0]);
        let meta = series.points[0].meta.as_ref().unwrap();
        assert_eq!(meta.level, Level::Danger);
        assert_eq!(meta.color, ColorToken::Red);
        assert_eq!(meta.interpretation, "Déclin rapide");
    }

    #[test]
    fn test_y_range_includes_zero() {
        let positive = combine(&[record("Jan", Some(2.0), Some(4.0))]);
        assert_eq!(y_range(&positive), YRange { min: 0.0, max: 6.0 });

        let negative = combine(&[record("Jan", Some(-2.0), Some(-4.0))]);
        assert_eq!(y_range(&negative), YRange { min: -6.0, max: 0.0 });

        let mixed = combine(&[record("Jan", Some(-3.0), None), record("Feb", Some(5.0), None)]);
        assert_eq!(y_range(&mixed), YRange { min: -3.0, max: 5.0 });

        assert_eq!(y_range(&combine(&[])), YRange { min: 0.0, max: 0.0 });
    }
}
