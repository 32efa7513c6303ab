//! Snow-quality classification.
//!
//! An ordered decision table: rules are evaluated top to bottom and the
//! first match wins. Rule predicates overlap by range, so the order is
//! the tie-break and must not be reshuffled.

use serde::{Deserialize, Serialize};

/// The five signals the classifier reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionInputs {
    pub temp_c: f64,
    pub wind_kmh: f64,
    /// Snowfall in the current hour, cm.
    pub snowfall_cm: f64,
    /// Hours since the last qualifying snowfall, capped at 72.
    pub snow_age_hours: f64,
    pub humidity_pct: f64,
}

/// One of seven mutually exclusive snow-condition labels, ranked by
/// ordinal priority (1 = best skiing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnowQuality {
    Powder,
    WindAffected,
    PackedPowder,
    Soft,
    SpringCorn,
    Icy,
    Variable,
}

impl SnowQuality {
    pub fn priority(self) -> u8 {
        match self {
            Self::Powder => 1,
            Self::WindAffected => 2,
            Self::PackedPowder => 3,
            Self::Soft => 4,
            Self::SpringCorn => 5,
            Self::Icy => 6,
            Self::Variable => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Powder => "Powder",
            Self::WindAffected => "Wind Affected",
            Self::PackedPowder => "Packed Powder",
            Self::Soft => "Soft",
            Self::SpringCorn => "Spring/Corn",
            Self::Icy => "Icy",
            Self::Variable => "Variable",
        }
    }

    /// Badge color used by the dashboard.
    pub fn color(self) -> &'static str {
        match self {
            Self::Powder => "#4fc3f7",
            Self::WindAffected => "#9575cd",
            Self::PackedPowder => "#81d4fa",
            Self::Soft => "#aed581",
            Self::SpringCorn => "#ffb74d",
            Self::Icy => "#90a4ae",
            Self::Variable => "#bdbdbd",
        }
    }
}

type Rule = (fn(&ConditionInputs) -> bool, SnowQuality);

/// Ordered decision table, first match wins.
const RULES: &[Rule] = &[
    (
        |c| c.snowfall_cm > 0.5 && c.temp_c < -2.0 && c.wind_kmh < 40.0,
        SnowQuality::Powder,
    ),
    (
        |c| c.snowfall_cm > 0.2 && c.wind_kmh >= 40.0,
        SnowQuality::WindAffected,
    ),
    (
        |c| c.snow_age_hours <= 12.0 && c.temp_c < -5.0 && c.humidity_pct < 70.0,
        SnowQuality::PackedPowder,
    ),
    (
        |c| c.snow_age_hours <= 24.0 && (-5.0..2.0).contains(&c.temp_c),
        SnowQuality::Soft,
    ),
    (|c| c.temp_c >= 2.0, SnowQuality::SpringCorn),
    (
        |c| c.snow_age_hours > 24.0 && c.temp_c < -2.0,
        SnowQuality::Icy,
    ),
];

/// Classify current snow conditions. Total and deterministic; every
/// finite input combination yields exactly one label.
pub fn classify(inputs: &ConditionInputs) -> SnowQuality {
    RULES
        .iter()
        .find(|(matches, _)| matches(inputs))
        .map(|&(_, quality)| quality)
        .unwrap_or(SnowQuality::Variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        temp_c: f64,
        wind_kmh: f64,
        snowfall_cm: f64,
        snow_age_hours: f64,
        humidity_pct: f64,
    ) -> ConditionInputs {
        ConditionInputs {
            temp_c,
            wind_kmh,
            snowfall_cm,
            snow_age_hours,
            humidity_pct,
        }
    }

    #[test]
    fn fresh_cold_calm_snow_is_powder() {
        assert_eq!(classify(&inputs(-6.0, 10.0, 1.2, 0.0, 80.0)), SnowQuality::Powder);
    }

    #[test]
    fn snowfall_in_strong_wind_is_wind_affected() {
        assert_eq!(
            classify(&inputs(-6.0, 45.0, 0.3, 0.0, 80.0)),
            SnowQuality::WindAffected
        );
    }

    #[test]
    fn recent_cold_dry_base_is_packed_powder() {
        assert_eq!(
            classify(&inputs(-8.0, 15.0, 0.0, 6.0, 50.0)),
            SnowQuality::PackedPowder
        );
    }

    #[test]
    fn day_old_snow_near_freezing_is_soft() {
        assert_eq!(classify(&inputs(-1.0, 15.0, 0.0, 20.0, 80.0)), SnowQuality::Soft);
    }

    #[test]
    fn warm_days_are_spring_corn() {
        assert_eq!(classify(&inputs(5.0, 15.0, 0.0, 48.0, 60.0)), SnowQuality::SpringCorn);
    }

    #[test]
    fn old_cold_snow_is_icy() {
        assert_eq!(classify(&inputs(-10.0, 15.0, 0.0, 48.0, 80.0)), SnowQuality::Icy);
    }

    #[test]
    fn everything_else_is_variable() {
        // Aged snow, mildly cold: no rule matches.
        assert_eq!(classify(&inputs(-1.0, 15.0, 0.0, 48.0, 80.0)), SnowQuality::Variable);
    }

    #[test]
    fn rule_order_breaks_overlapping_predicates() {
        // Satisfies both the powder rule and the packed-powder rule;
        // the earlier rule must win.
        let both = inputs(-8.0, 10.0, 1.0, 2.0, 50.0);
        assert_eq!(classify(&both), SnowQuality::Powder);

        // Heavy snowfall in high wind matches rules 1's snowfall gate but
        // fails its wind gate; rule 2 takes it.
        let windy = inputs(-8.0, 60.0, 1.0, 2.0, 50.0);
        assert_eq!(classify(&windy), SnowQuality::WindAffected);
    }

    #[test]
    fn classification_is_total_over_a_coarse_input_grid() {
        let temps = [-20.0, -5.0, -2.0, 0.0, 2.0, 10.0];
        let winds = [0.0, 39.9, 40.0, 80.0];
        let snowfalls = [0.0, 0.2, 0.5, 3.0];
        let ages = [0.0, 12.0, 24.0, 25.0, 72.0];
        let humidities = [30.0, 70.0, 95.0];

        for t in temps {
            for w in winds {
                for s in snowfalls {
                    for a in ages {
                        for h in humidities {
                            let quality = classify(&inputs(t, w, s, a, h));
                            assert!((1..=7).contains(&quality.priority()));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn priorities_rank_all_seven_labels() {
        let all = [
            SnowQuality::Powder,
            SnowQuality::WindAffected,
            SnowQuality::PackedPowder,
            SnowQuality::Soft,
            SnowQuality::SpringCorn,
            SnowQuality::Icy,
            SnowQuality::Variable,
        ];
        let mut priorities: Vec<u8> = all.iter().map(|q| q.priority()).collect();
        priorities.sort_unstable();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(SnowQuality::Powder.label(), "Powder");
    }
}
