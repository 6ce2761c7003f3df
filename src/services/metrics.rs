// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness metrics aggregation.
//!
//! Pure computation over the trailing 14 days of workout history, fetched
//! fresh on every request. Splits the window into "this week" (last 7 days)
//! and "last week" (days 8-14 back), scores both, and derives a streak and
//! a per-day chart series. The per-day score deliberately uses a lighter
//! formula than the weekly composite and is not required to reconcile with
//! it.

use crate::models::{DayEntry, Exercise, FitnessMetrics, Trend, Workout};
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Length of the trailing window fetched for aggregation.
pub const METRICS_WINDOW_DAYS: i64 = 14;

const KG_TO_LBS: f64 = 2.2;

/// Score movement beyond this many points flips the trend off `stable`.
const TREND_THRESHOLD: i64 = 5;

/// First day of the aggregation window (inclusive).
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(METRICS_WINDOW_DAYS)
}

/// Compute the fitness report from the trailing 14-day window.
///
/// `workouts` is the fetched window; an empty window yields `None` ("no
/// data"), which callers must keep distinct from a zero score.
pub fn compute_metrics(
    today: NaiveDate,
    workouts: &[Workout],
    exercises_by_workout: &HashMap<String, Vec<Exercise>>,
) -> Option<FitnessMetrics> {
    if workouts.is_empty() {
        return None;
    }

    let week_ago = today - Duration::days(7);
    let this_week: Vec<&Workout> = workouts.iter().filter(|w| w.date > week_ago).collect();
    let last_week: Vec<&Workout> = workouts.iter().filter(|w| w.date <= week_ago).collect();

    let this_week_volume = raw_volume(&this_week, exercises_by_workout).round() as i64;
    let last_week_volume = raw_volume(&last_week, exercises_by_workout).round() as i64;

    let max_volume = this_week_volume.max(last_week_volume).max(1);
    let current_score = composite_score(this_week.len(), this_week_volume, max_volume);
    let previous_score = composite_score(last_week.len(), last_week_volume, max_volume);

    let weekly_data = (0..7)
        .rev()
        .map(|days_back| day_entry(today - Duration::days(days_back), workouts, exercises_by_workout))
        .collect();

    Some(FitnessMetrics {
        current_score,
        previous_score,
        weekly_workouts: this_week.len() as u32,
        streak: streak_days(today, workouts),
        total_volume: this_week_volume,
        trend: trend_for(current_score, previous_score),
        weekly_data,
    })
}

/// Training volume in pounds an exercise contributes, if any.
///
/// Only weight-training rows count: sets, reps and weight all present and
/// unit absent, `lbs`, or `kg` (converted at 2.2). Cardio and bodyweight
/// rows contribute nothing regardless of their weight field.
fn exercise_volume_lbs(exercise: &Exercise) -> Option<f64> {
    let sets = exercise.sets?;
    let reps = exercise.reps?;
    let weight = exercise.weight?;

    let factor = match exercise.unit.as_deref() {
        None | Some("lbs") => 1.0,
        Some("kg") => KG_TO_LBS,
        Some(_) => return None,
    };

    Some(sets as f64 * reps as f64 * weight * factor)
}

/// Unrounded volume across a set of workouts.
fn raw_volume(workouts: &[&Workout], exercises_by_workout: &HashMap<String, Vec<Exercise>>) -> f64 {
    workouts
        .iter()
        .flat_map(|w| exercises_by_workout.get(&w.id).into_iter().flatten())
        .filter_map(exercise_volume_lbs)
        .sum()
}

/// Composite 0-100 score: consistency (workouts x 12.5, capped at 50) plus
/// relative volume (share of the max observed volume, scaled to 50).
fn composite_score(workout_count: usize, volume: i64, max_volume: i64) -> i64 {
    let consistency = (workout_count as f64 * 12.5).min(50.0);
    let volume_score = if max_volume > 0 {
        volume as f64 / max_volume as f64 * 50.0
    } else {
        0.0
    };
    (consistency + volume_score).round() as i64
}

fn trend_for(current_score: i64, previous_score: i64) -> Trend {
    if current_score > previous_score + TREND_THRESHOLD {
        Trend::Up
    } else if current_score < previous_score - TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Consecutive calendar days with at least one workout, walking backward
/// from the most recent workout date. A streak only counts if that date is
/// today or yesterday; a user who stops logging sees 0, not a stale count.
fn streak_days(today: NaiveDate, workouts: &[Workout]) -> u32 {
    let dates: HashSet<NaiveDate> = workouts.iter().map(|w| w.date).collect();
    let Some(&most_recent) = dates.iter().max() else {
        return 0;
    };

    if most_recent != today && most_recent != today - Duration::days(1) {
        return 0;
    }

    let mut streak = 0;
    let mut check = most_recent;
    while dates.contains(&check) {
        streak += 1;
        check -= Duration::days(1);
    }
    streak
}

/// One chart entry: day score is 30 + volume/100 capped at 100 on active
/// days, 0 otherwise.
fn day_entry(
    date: NaiveDate,
    workouts: &[Workout],
    exercises_by_workout: &HashMap<String, Vec<Exercise>>,
) -> DayEntry {
    let day_workouts: Vec<&Workout> = workouts.iter().filter(|w| w.date == date).collect();
    let count = day_workouts.len() as u32;

    let score = if count > 0 {
        let day_volume = raw_volume(&day_workouts, exercises_by_workout);
        (30.0 + day_volume / 100.0).min(100.0).round() as i64
    } else {
        0
    };

    DayEntry {
        date,
        score,
        workouts: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_workout(id: &str, date: NaiveDate) -> Workout {
        Workout {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: format!("Workout {}", id),
            tag: "Lifting".to_string(),
            date,
            notes: None,
            created_at: format!("{}T10:00:00Z", date),
        }
    }

    fn make_exercise(
        workout_id: &str,
        sets: Option<i64>,
        reps: Option<i64>,
        weight: Option<f64>,
        unit: Option<&str>,
    ) -> Exercise {
        Exercise {
            id: uuid::Uuid::new_v4().to_string(),
            workout_id: workout_id.to_string(),
            name: "Test exercise".to_string(),
            sets,
            reps,
            weight,
            unit: unit.map(String::from),
            order: 0,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_volume_unit_handling() {
        let kg = make_exercise("w1", Some(3), Some(8), Some(100.0), Some("kg"));
        assert_eq!(exercise_volume_lbs(&kg), Some(5280.0));

        let lbs = make_exercise("w1", Some(3), Some(8), Some(100.0), Some("lbs"));
        assert_eq!(exercise_volume_lbs(&lbs), Some(2400.0));

        let implicit = make_exercise("w1", Some(3), Some(8), Some(100.0), None);
        assert_eq!(exercise_volume_lbs(&implicit), Some(2400.0));

        // Cardio rows carry no volume regardless of their weight field
        let cardio = make_exercise("w1", Some(3), Some(8), Some(100.0), Some("min"));
        assert_eq!(exercise_volume_lbs(&cardio), None);

        let bodyweight = make_exercise("w1", Some(3), Some(8), Some(100.0), Some("bodyweight"));
        assert_eq!(exercise_volume_lbs(&bodyweight), None);

        let missing_reps = make_exercise("w1", Some(3), None, Some(100.0), None);
        assert_eq!(exercise_volume_lbs(&missing_reps), None);
    }

    #[test]
    fn test_zero_activity_scores_zero_and_stable() {
        assert_eq!(composite_score(0, 0, 1), 0);
        assert_eq!(trend_for(0, 0), Trend::Stable);
    }

    #[test]
    fn test_consistency_component_caps_at_50() {
        // 4 workouts hit the cap exactly; more do not exceed it
        assert_eq!(composite_score(4, 0, 1), 50);
        assert_eq!(composite_score(7, 0, 1), 50);
    }

    #[test]
    fn test_trend_threshold_edges() {
        assert_eq!(trend_for(60, 55), Trend::Stable);
        assert_eq!(trend_for(61, 55), Trend::Up);
        assert_eq!(trend_for(50, 55), Trend::Stable);
        assert_eq!(trend_for(49, 55), Trend::Down);
    }

    #[test]
    fn test_streak_today_and_yesterday() {
        let today = day(2026, 3, 10);
        let workouts = vec![
            make_workout("w1", day(2026, 3, 10)),
            make_workout("w2", day(2026, 3, 9)),
            // Gap on the 8th
            make_workout("w3", day(2026, 3, 7)),
        ];
        assert_eq!(streak_days(today, &workouts), 2);
    }

    #[test]
    fn test_streak_zero_after_gap() {
        let today = day(2026, 3, 10);
        let workouts = vec![
            make_workout("w1", day(2026, 3, 8)),
            make_workout("w2", day(2026, 3, 7)),
        ];
        assert_eq!(streak_days(today, &workouts), 0);
    }

    #[test]
    fn test_streak_anchored_at_yesterday() {
        let today = day(2026, 3, 10);
        let workouts = vec![
            make_workout("w1", day(2026, 3, 9)),
            make_workout("w2", day(2026, 3, 8)),
        ];
        assert_eq!(streak_days(today, &workouts), 2);
    }

    #[test]
    fn test_multiple_workouts_same_day_count_once_for_streak() {
        let today = day(2026, 3, 10);
        let workouts = vec![
            make_workout("w1", day(2026, 3, 10)),
            make_workout("w2", day(2026, 3, 10)),
        ];
        assert_eq!(streak_days(today, &workouts), 1);
    }

    #[test]
    fn test_empty_window_yields_no_data() {
        let map = HashMap::new();
        assert!(compute_metrics(day(2026, 3, 10), &[], &map).is_none());
    }

    #[test]
    fn test_full_report() {
        let today = day(2026, 3, 10);
        let workouts = vec![make_workout("w1", today)];
        let mut map = HashMap::new();
        map.insert(
            "w1".to_string(),
            vec![make_exercise("w1", Some(3), Some(8), Some(100.0), Some("kg"))],
        );

        let metrics = compute_metrics(today, &workouts, &map).unwrap();

        assert_eq!(metrics.total_volume, 5280);
        // consistency 12.5 + relative volume 50 = 62.5, rounded
        assert_eq!(metrics.current_score, 63);
        assert_eq!(metrics.previous_score, 0);
        assert_eq!(metrics.trend, Trend::Up);
        assert_eq!(metrics.weekly_workouts, 1);
        assert_eq!(metrics.streak, 1);

        // Exactly 7 entries, oldest to newest, ending today
        assert_eq!(metrics.weekly_data.len(), 7);
        assert_eq!(metrics.weekly_data[6].date, today);
        assert_eq!(metrics.weekly_data[0].date, today - Duration::days(6));
        assert!(metrics
            .weekly_data
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));

        // Day score: 30 + 5280/100 = 82.8, rounded; inactive days are 0
        assert_eq!(metrics.weekly_data[6].score, 83);
        assert_eq!(metrics.weekly_data[6].workouts, 1);
        assert_eq!(metrics.weekly_data[5].score, 0);
        assert_eq!(metrics.weekly_data[5].workouts, 0);
    }

    #[test]
    fn test_day_score_caps_at_100() {
        let today = day(2026, 3, 10);
        let workouts = vec![make_workout("w1", today)];
        let mut map = HashMap::new();
        map.insert(
            "w1".to_string(),
            vec![make_exercise("w1", Some(10), Some(10), Some(200.0), None)],
        );

        let metrics = compute_metrics(today, &workouts, &map).unwrap();
        assert_eq!(metrics.weekly_data[6].score, 100);
    }

    #[test]
    fn test_last_week_split() {
        let today = day(2026, 3, 10);
        let workouts = vec![
            make_workout("w1", today),
            // Exactly 7 days back lands in last week
            make_workout("w2", today - Duration::days(7)),
        ];
        let mut map = HashMap::new();
        map.insert(
            "w1".to_string(),
            vec![make_exercise("w1", Some(3), Some(10), Some(100.0), None)],
        );
        map.insert(
            "w2".to_string(),
            vec![make_exercise("w2", Some(3), Some(10), Some(200.0), None)],
        );

        let metrics = compute_metrics(today, &workouts, &map).unwrap();

        // This week: 3000 lbs, last week: 6000 lbs (the max)
        assert_eq!(metrics.total_volume, 3000);
        // current: 12.5 + 3000/6000*50 = 37.5 -> 38
        assert_eq!(metrics.current_score, 38);
        // previous: 12.5 + 50 = 62.5 -> 63
        assert_eq!(metrics.previous_score, 63);
        assert_eq!(metrics.trend, Trend::Down);
        assert_eq!(metrics.weekly_workouts, 1);
    }
}
