// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Known tag palette used by the frontend for color-coding.
///
/// Tags are free strings; anything outside this list is accepted and stored
/// as-is.
pub const AVAILABLE_TAGS: [&str; 5] = ["Lifting", "Cardio", "HIIT", "Stretching", "Sports"];

/// Stored workout record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    /// Document id (v4 UUID)
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Workout name/title
    pub name: String,
    /// Category label (free string, see [`AVAILABLE_TAGS`])
    pub tag: String,
    /// Calendar day of the workout (no time component)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Freeform notes
    pub notes: Option<String>,
    /// When this workout was created (ISO 8601)
    pub created_at: String,
}
