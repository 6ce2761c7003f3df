// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise model for storage and API.
//!
//! An exercise row is either weight-training shaped (sets, reps, optional
//! load) or cardio shaped (single magnitude in `weight` plus a
//! time/distance/calorie unit). The duality is a convention keyed off the
//! `unit` string; callers' unit values are stored as given, never validated
//! or inferred, so inconsistent rows can exist.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Units that mark an exercise as cardio rather than weight training.
pub const CARDIO_UNITS: [&str; 5] = ["min", "sec", "miles", "km", "cal"];

/// Full unit vocabulary the chat prompt advertises to the language model.
pub const UNIT_VOCABULARY: [&str; 8] =
    ["lbs", "kg", "min", "sec", "miles", "km", "cal", "bodyweight"];

/// Fixed membership test deciding the cardio/weight-training split.
pub fn is_cardio_unit(unit: &str) -> bool {
    CARDIO_UNITS.contains(&unit)
}

/// Stored exercise record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    /// Document id (v4 UUID)
    pub id: String,
    /// Owning workout id
    pub workout_id: String,
    /// Exercise name
    pub name: String,
    /// Set count; null for cardio rows
    pub sets: Option<i64>,
    /// Rep count; null for cardio rows
    pub reps: Option<i64>,
    /// Load in `unit`, or magnitude of duration/distance/calories for cardio
    pub weight: Option<f64>,
    /// Unit string; absent means lbs for display purposes
    pub unit: Option<String>,
    /// Display order within the workout (not validated for uniqueness)
    pub order: i64,
    /// When this exercise was created (ISO 8601)
    pub created_at: String,
}

impl Exercise {
    /// Whether this row is cardio shaped, per its stored unit.
    pub fn is_cardio(&self) -> bool {
        self.unit.as_deref().is_some_and(is_cardio_unit)
    }
}
