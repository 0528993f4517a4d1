//! Week-wise score trajectory for chart consumers
//!
//! Synthetic and deterministic: eight weeks ramping from a lower base to
//! the current score with a fixed wobble. No history is read.

use crate::models::WeekScore;

const WEEKS: u32 = 8;

pub fn week_wise_analysis(current_score: u32) -> Vec<WeekScore> {
    let current = i64::from(current_score);
    let base = (current - 50).max(100);

    let mut weeks: Vec<WeekScore> = Vec::with_capacity(WEEKS as usize);
    let mut previous = base;

    for week in 0..i64::from(WEEKS) {
        let progress = (week + 1) as f64 / f64::from(WEEKS);
        let ramp = (base as f64 + (current - base) as f64 * progress).trunc() as i64;
        let score = (ramp + (week % 3 - 1) * 5).clamp(0, 1000);

        weeks.push(WeekScore {
            week: format!("Week {}", week + 1),
            score: score as u32,
            change: score - previous,
            health_indicator: health_indicator(score).to_string(),
        });
        previous = score;
    }

    weeks
}

pub fn health_indicator(score: i64) -> &'static str {
    if score >= 800 {
        "Excellent"
    } else if score >= 700 {
        "Healthy"
    } else if score >= 600 {
        "Stable"
    } else if score >= 500 {
        "Moderate"
    } else {
        "Concerning"
    }
}
