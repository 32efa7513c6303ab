//! Best-skiing-window scoring over the 7-day horizon.

use common::{value_at, BestWindow, DailyBlock};

/// Days considered by the scorer, regardless of how many the snapshot
/// carries.
pub const HORIZON_DAYS: usize = 7;

const WIND_PENALTY_KMH: f64 = 50.0;

/// Score a single day: fresh snow is worth 3× its depth, rain costs 5×,
/// strong wind costs a flat 10 and a below-freezing high earns 5.
pub fn day_score(snowfall_cm: f64, rain_mm: f64, wind_max_kmh: f64, temp_max_c: f64) -> f64 {
    let mut score = snowfall_cm * 3.0 - rain_mm * 5.0;
    if wind_max_kmh > WIND_PENALTY_KMH {
        score -= 10.0;
    }
    if temp_max_c < 0.0 {
        score += 5.0;
    }
    score
}

/// The best-scoring day in the horizon. Ties go to the earlier day.
/// Returns `None` only when the daily block carries no days at all.
pub fn best_window(daily: &DailyBlock) -> Option<BestWindow> {
    let days = daily.time.len().min(HORIZON_DAYS);
    let mut best: Option<BestWindow> = None;

    for day_index in 0..days {
        let score = day_score(
            value_at(&daily.snowfall_sum, day_index),
            value_at(&daily.rain_sum, day_index),
            value_at(&daily.wind_speed_10m_max, day_index),
            value_at(&daily.temperature_2m_max, day_index),
        );

        let improves = best.as_ref().map(|b| score > b.score).unwrap_or(true);
        if improves {
            best = Some(BestWindow {
                day_index,
                date: daily.time[day_index].clone(),
                score,
            });
        }
    }

    best
}
