// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived fitness metrics returned by the metrics endpoint.
//!
//! Never persisted; recomputed on every request from the trailing 14 days of
//! workout history. Wire names are camelCase to match the frontend.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Week-over-week score movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// One day of the 7-entry chart series.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Lighter per-day score for charting; deliberately not the composite
    pub score: i64,
    /// Workout count on this day
    pub workouts: u32,
}

/// Composite fitness report for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FitnessMetrics {
    /// Composite score for the last 7 days (0-100)
    pub current_score: i64,
    /// Composite score for days 8-14 back (0-100)
    pub previous_score: i64,
    /// Workouts logged in the last 7 days
    pub weekly_workouts: u32,
    /// Consecutive days with a workout, anchored at today or yesterday
    pub streak: u32,
    /// This week's training volume in pounds
    pub total_volume: i64,
    pub trend: Trend,
    /// Exactly 7 entries, oldest to newest, ending today
    pub weekly_data: Vec<DayEntry>,
}
