//! Chart series construction
//!
//! Turns normalized records into named series. Points always follow the
//! order of the records; nothing is sorted here.

use crate::classify::{classify, ColorPolicy};
use crate::schema::{Classified, Measured, Periodic, ScoreRecord};
use crate::types::{ChartPoint, ChartSeries, ColorToken, PointMeta};

/// Series id of the speed component line
pub const SPEED_SCORE_SERIES: &str = "Score Vitesse";
/// Series id of the transitions component line
pub const TRANSITIONS_SCORE_SERIES: &str = "Score Transitions";

/// Display label for a level the upstream did not name
pub const UNKNOWN_LEVEL_LABEL: &str = "Inconnu";

/// Height of every point in a level band series
pub const BAND_HEIGHT: f64 = 1.0;

/// Builder for chart series
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// One point per record, `y` = the record's value
    pub fn build<R: Measured>(records: &[R], id: &str, color: ColorToken) -> ChartSeries {
        Self::build_with(records, id, color, |r| Some(r.value()))
    }

    /// One point per record for which `value` yields a number.
    ///
    /// Records without a value are skipped in this series only.
    pub fn build_with<R, F>(records: &[R], id: &str, color: ColorToken, value: F) -> ChartSeries
    where
        R: Periodic,
        F: Fn(&R) -> Option<f64>,
    {
        let points = records
            .iter()
            .filter_map(|r| value(r).map(|y| ChartPoint::new(r.period(), y)))
            .collect();

        ChartSeries {
            id: id.to_string(),
            color,
            points,
        }
    }

    /// Constant-height level bands.
    ///
    /// Each point has `y = 1`; the level, its label, the interpretation and
    /// the tier color travel as point metadata.
    pub fn build_bands<R: Classified>(
        records: &[R],
        id: &str,
        color: ColorToken,
        missing_interpretation: &str,
    ) -> ChartSeries {
        let points = records
            .iter()
            .map(|r| ChartPoint {
                x: r.period().to_string(),
                y: BAND_HEIGHT,
                meta: Some(band_meta(r, missing_interpretation)),
            })
            .collect();

        ChartSeries {
            id: id.to_string(),
            color,
            points,
        }
    }

    /// Separate lines for the speed and transitions cumulative scores
    pub fn build_components(records: &[ScoreRecord]) -> Vec<ChartSeries> {
        vec![
            Self::build_with(records, SPEED_SCORE_SERIES, ColorToken::Red, |r| {
                r.cumulative_speed_score
            }),
            Self::build_with(records, TRANSITIONS_SCORE_SERIES, ColorToken::Blue, |r| {
                r.cumulative_transitions_score
            }),
        ]
    }
}

/// Classification metadata for a band or score bar
pub fn band_meta<R: Classified>(record: &R, missing_interpretation: &str) -> PointMeta {
    let classification = classify(record.level_label(), ColorPolicy::OptimisticBand);
    PointMeta {
        level: classification.tier,
        label: record
            .level_label()
            .unwrap_or(UNKNOWN_LEVEL_LABEL)
            .to_string(),
        interpretation: record
            .interpretation()
            .unwrap_or(missing_interpretation)
            .to_string(),
        color: classification.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NutritionRecord, TransitionCountRecord};
    use crate::types::Level;

    fn counts() -> Vec<TransitionCountRecord> {
        vec![
            TransitionCountRecord {
                period: "Feb".to_string(),
                transitions_count: 30.0,
            },
            TransitionCountRecord {
                period: "Jan".to_string(),
                transitions_count: 12.0,
            },
        ]
    }

    fn score(period: &str, speed: Option<f64>, transitions: Option<f64>, level: Option<&str>) -> ScoreRecord {
        ScoreRecord {
            period: period.to_string(),
            cumulative_transitions_score: transitions,
            cumulative_speed_score: speed,
            level_label: level.map(str::to_string),
            level: level.map(Level::from_label).unwrap_or(Level::Unknown),
            interpretation: None,
        }
    }

    #[test]
    fn test_build_keeps_order_and_count() {
        let series = SeriesBuilder::build(&counts(), "transitions", ColorToken::Blue);

        assert_eq!(series.id, "transitions");
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0], ChartPoint::new("Feb", 30.0));
        assert_eq!(series.points[1], ChartPoint::new("Jan", 12.0));
    }

    #[test]
    fn test_build_is_repeatable() {
        let records = counts();
        let first = SeriesBuilder::build(&records, "transitions", ColorToken::Blue);
        let second = SeriesBuilder::build(&records, "transitions", ColorToken::Blue);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_records_give_empty_series() {
        let records: Vec<TransitionCountRecord> = Vec::new();
        let series = SeriesBuilder::build(&records, "transitions", ColorToken::Blue);
        assert!(series.is_empty());
        assert_eq!(series.id, "transitions");
    }

    #[test]
    fn test_bands_have_constant_height() {
        let records = vec![
            NutritionRecord {
                month_start: "2024-01-01".to_string(),
                score: Some(-3.0),
                classification: Some("Danger".to_string()),
                level: Level::Danger,
                interpretation: Some("Dénutrition".to_string()),
            },
            NutritionRecord {
                month_start: "2024-02-01".to_string(),
                score: None,
                classification: None,
                level: Level::Unknown,
                interpretation: None,
            },
        ];

        let series =
            SeriesBuilder::build_bands(&records, "nutrition", ColorToken::Green, "Non spécifié");

        assert!(series.values().all(|y| y == BAND_HEIGHT));

        let first = series.points[0].meta.as_ref().unwrap();
        assert_eq!(first.level, Level::Danger);
        assert_eq!(first.color, ColorToken::Red);
        assert_eq!(first.interpretation, "Dénutrition");

        let second = series.points[1].meta.as_ref().unwrap();
        assert_eq!(second.level, Level::Unknown);
        assert_eq!(second.label, UNKNOWN_LEVEL_LABEL);
        assert_eq!(second.color, ColorToken::Green);
        assert_eq!(second.interpretation, "Non spécifié");
    }

    #[test]
    fn test_band_meta_matches_band_classification() {
        for label in [Some("Normal"), Some("Alerte"), Some("Danger"), Some("Inconnu"), None] {
            let expected = classify(label, ColorPolicy::OptimisticBand);
            let meta = band_meta(&score("Jan", None, None, label), "");
            assert_eq!(meta.level, expected.tier, "{label:?}");
            assert_eq!(meta.color, expected.color, "{label:?}");
        }
    }

    #[test]
    fn test_components_skip_missing_values() {
        let records = vec![
            score("Jan", Some(-1.0), None, Some("Alerte")),
            score("Feb", None, Some(2.0), Some("Normal")),
            score("Mar", Some(0.5), Some(1.5), None),
        ];

        let components = SeriesBuilder::build_components(&records);
        assert_eq!(components.len(), 2);

        let speed = &components[0];
        assert_eq!(speed.id, SPEED_SCORE_SERIES);
        assert_eq!(speed.color, ColorToken::Red);
        let periods: Vec<&str> = speed.points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(periods, vec!["Jan", "Mar"]);

        let transitions = &components[1];
        assert_eq!(transitions.id, TRANSITIONS_SCORE_SERIES);
        assert_eq!(transitions.color, ColorToken::Blue);
        let periods: Vec<&str> = transitions.points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(periods, vec!["Feb", "Mar"]);
    }
}
