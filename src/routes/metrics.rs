// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness metrics endpoint.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::FitnessMetrics;
use crate::services::metrics;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::collections::HashMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/metrics", get(get_metrics))
}

/// Compute the fitness report over the trailing 14 days.
///
/// Responds with JSON `null` when the window holds no workouts; callers
/// treat that as "no data", distinct from a zero score.
async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<FitnessMetrics>>> {
    let today = chrono::Utc::now().date_naive();

    let workouts = state
        .db
        .list_workouts_since(&user.user_id, metrics::window_start(today))
        .await?;

    if workouts.is_empty() {
        return Ok(Json(None));
    }

    let workout_ids: Vec<String> = workouts.iter().map(|w| w.id.clone()).collect();

    // A failed exercise fetch degrades to a volume-less report instead of
    // failing the request.
    let exercises_by_workout = match state.db.list_exercises_for_workouts(&workout_ids).await {
        Ok(map) => map,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch exercises for metrics");
            HashMap::new()
        }
    };

    Ok(Json(metrics::compute_metrics(
        today,
        &workouts,
        &exercises_by_workout,
    )))
}
