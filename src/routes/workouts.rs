// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout CRUD routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Exercise, Workout};
use crate::routes::SuccessResponse;
use crate::services::templates;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Workout routes (require authentication via the session gate).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
}

/// List the user's workouts, newest first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Workout>>> {
    let workouts = state.db.list_workouts(&user.user_id).await?;
    Ok(Json(workouts))
}

#[derive(Deserialize)]
struct CreateWorkoutRequest {
    #[serde(rename = "templateId")]
    template_id: String,
}

/// Create a workout from a template, dated today.
///
/// The template's exercise list is copied into the new workout. Exercise
/// seeding failures are logged but don't fail the request; the workout row
/// already exists at that point.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWorkoutRequest>,
) -> Result<Json<Workout>> {
    let template = templates::find_template(&payload.template_id)
        .ok_or_else(|| AppError::BadRequest("Invalid template".to_string()))?;

    let workout = Workout {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        name: template.name.to_string(),
        tag: template.tag.to_string(),
        date: chrono::Utc::now().date_naive(),
        notes: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.db.insert_workout(&workout).await?;

    tracing::info!(
        user_id = %user.user_id,
        workout_id = %workout.id,
        template = template.id,
        "Created workout"
    );

    if !template.exercises.is_empty() {
        let rows: Vec<Exercise> = template
            .exercises
            .iter()
            .enumerate()
            .map(|(index, seed)| Exercise {
                id: uuid::Uuid::new_v4().to_string(),
                workout_id: workout.id.clone(),
                name: seed.name.to_string(),
                sets: Some(seed.sets),
                reps: Some(seed.reps),
                weight: seed.weight,
                unit: None,
                order: index as i64,
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .collect();

        if let Err(e) = state.db.insert_exercises(&rows).await {
            tracing::warn!(
                error = %e,
                workout_id = %workout.id,
                "Failed to seed template exercises"
            );
        }
    }

    Ok(Json(workout))
}

/// Get one workout.
async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Workout>> {
    let workout = state
        .db
        .get_workout(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
    Ok(Json(workout))
}

/// Allow-listed update body; fields outside this struct are silently
/// dropped during deserialization.
#[derive(Deserialize, Validate)]
struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 120))]
    name: Option<String>,
    #[validate(length(min = 1, max = 40))]
    tag: Option<String>,
    date: Option<NaiveDate>,
    notes: Option<String>,
}

/// Update a workout's editable fields.
async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkoutRequest>,
) -> Result<Json<Workout>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut workout = state
        .db
        .get_workout(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    if let Some(name) = payload.name {
        workout.name = name;
    }
    if let Some(tag) = payload.tag {
        workout.tag = tag;
    }
    if let Some(date) = payload.date {
        workout.date = date;
    }
    if let Some(notes) = payload.notes {
        workout.notes = Some(notes);
    }

    state.db.update_workout(&workout).await?;
    Ok(Json(workout))
}

/// Delete a workout and its exercises.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    state
        .db
        .get_workout(&user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    state.db.delete_workout(&id).await?;

    tracing::info!(user_id = %user.user_id, workout_id = %id, "Deleted workout");
    Ok(Json(SuccessResponse { success: true }))
}
