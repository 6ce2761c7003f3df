// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise sub-resource routes.
//!
//! Every handler first verifies the parent workout belongs to the caller,
//! so exercises can't be read or tampered with across workouts or users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Exercise;
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/workouts/{id}/exercises",
            get(list_exercises).post(create_exercise),
        )
        .route(
            "/api/workouts/{id}/exercises/{exercise_id}",
            patch(update_exercise).delete(delete_exercise),
        )
}

/// 404 unless the workout exists and belongs to the caller.
async fn verify_workout(state: &AppState, user: &AuthUser, workout_id: &str) -> Result<()> {
    match state.db.get_workout(&user.user_id, workout_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound("Workout not found".to_string())),
    }
}

/// List a workout's exercises in display order.
async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<String>,
) -> Result<Json<Vec<Exercise>>> {
    verify_workout(&state, &user, &workout_id).await?;

    let exercises = state.db.list_exercises(&workout_id).await?;
    Ok(Json(exercises))
}

#[derive(Deserialize, Validate)]
struct CreateExerciseRequest {
    #[validate(length(min = 1, max = 120))]
    name: String,
    sets: Option<i64>,
    reps: Option<i64>,
    weight: Option<f64>,
    unit: Option<String>,
    order: Option<i64>,
}

/// Add an exercise to a workout.
///
/// Sets, reps, weight and unit are stored as given; the cardio/weight
/// duality is a client convention, not validated here.
async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<String>,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<Json<Exercise>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    verify_workout(&state, &user, &workout_id).await?;

    let exercise = Exercise {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id,
        name: payload.name,
        sets: payload.sets,
        reps: payload.reps,
        weight: payload.weight,
        unit: payload.unit,
        order: payload.order.unwrap_or(0),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.db.insert_exercise(&exercise).await?;

    Ok(Json(exercise))
}

/// Allow-listed update body; fields outside this struct are silently
/// dropped during deserialization.
#[derive(Deserialize, Validate)]
struct UpdateExerciseRequest {
    #[validate(length(min = 1, max = 120))]
    name: Option<String>,
    sets: Option<i64>,
    reps: Option<i64>,
    weight: Option<f64>,
    unit: Option<String>,
    order: Option<i64>,
}

/// Update an exercise's editable fields.
async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
    Json(payload): Json<UpdateExerciseRequest>,
) -> Result<Json<Exercise>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    verify_workout(&state, &user, &workout_id).await?;

    let mut exercise = state
        .db
        .get_exercise(&workout_id, &exercise_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    if let Some(name) = payload.name {
        exercise.name = name;
    }
    if let Some(sets) = payload.sets {
        exercise.sets = Some(sets);
    }
    if let Some(reps) = payload.reps {
        exercise.reps = Some(reps);
    }
    if let Some(weight) = payload.weight {
        exercise.weight = Some(weight);
    }
    if let Some(unit) = payload.unit {
        exercise.unit = Some(unit);
    }
    if let Some(order) = payload.order {
        exercise.order = order;
    }

    state.db.update_exercise(&exercise).await?;
    Ok(Json(exercise))
}

/// Delete an exercise.
async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    verify_workout(&state, &user, &workout_id).await?;

    state
        .db
        .get_exercise(&workout_id, &exercise_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    state.db.delete_exercise(&exercise_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
