// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Workouts (per-user workout log)
//! - Exercises (rows belonging to a workout)
//!
//! Every operation is a single pass-through call against the store; there is
//! no caching and no cross-statement transaction. Multi-statement sequences
//! (workout delete cascading over its exercises) run statement by statement,
//! matching the application's last-write-wins failure model.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Exercise, Workout};
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Get a workout by id, scoped to its owner.
    ///
    /// A workout owned by a different user reads as absent.
    pub async fn get_workout(
        &self,
        user_id: &str,
        workout_id: &str,
    ) -> Result<Option<Workout>, AppError> {
        let workout: Option<Workout> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(workout_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(workout.filter(|w| w.user_id == user_id))
    }

    /// List a user's workouts, newest first (date, then creation time).
    pub async fn list_workouts(&self, user_id: &str) -> Result<Vec<Workout>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([
                ("date", firestore::FirestoreQueryDirection::Descending),
                ("created_at", firestore::FirestoreQueryDirection::Descending),
            ])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's workouts dated on or after `since`, oldest first.
    ///
    /// Used by the metrics aggregator for its trailing window.
    pub async fn list_workouts_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<Workout>, AppError> {
        let user_id = user_id.to_string();
        let since = since.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(since.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a workout row.
    pub async fn insert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WORKOUTS)
            .document_id(&workout.id)
            .object(workout)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Write back a modified workout row (whole-document write).
    pub async fn update_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.insert_workout(workout).await
    }

    /// Delete a workout and its exercises.
    ///
    /// Manual cascade: the store does not cascade automatically, so exercise
    /// rows go first, then the workout row. No transaction wraps the
    /// sequence; a crash in between leaves orphaned exercise rows.
    pub async fn delete_workout(&self, workout_id: &str) -> Result<(), AppError> {
        let exercises = self.list_exercises(workout_id).await?;
        for exercise in &exercises {
            self.delete_exercise(&exercise.id).await?;
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORKOUTS)
            .document_id(workout_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            workout_id,
            exercises = exercises.len(),
            "Deleted workout and its exercises"
        );
        Ok(())
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// List a workout's exercises in display order.
    pub async fn list_exercises(&self, workout_id: &str) -> Result<Vec<Exercise>, AppError> {
        let workout_id = workout_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(move |q| q.field("workout_id").eq(workout_id.clone()))
            .order_by([("order", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an exercise by id, scoped to its parent workout.
    pub async fn get_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<Option<Exercise>, AppError> {
        let exercise: Option<Exercise> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISES)
            .obj()
            .one(exercise_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(exercise.filter(|e| e.workout_id == workout_id))
    }

    /// Insert an exercise row.
    pub async fn insert_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EXERCISES)
            .document_id(&exercise.id)
            .object(exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert multiple exercise rows (template seeding).
    ///
    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    pub async fn insert_exercises(&self, exercises: &[Exercise]) -> Result<(), AppError> {
        let client = self.get_client()?;

        stream::iter(exercises.to_vec())
            .map(|exercise| async move {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::EXERCISES)
                    .document_id(&exercise.id)
                    .object(&exercise)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }

    /// Write back a modified exercise row (whole-document write).
    pub async fn update_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        self.insert_exercise(exercise).await
    }

    /// Delete an exercise row.
    pub async fn delete_exercise(&self, exercise_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EXERCISES)
            .document_id(exercise_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch exercises for a set of workouts, grouped by workout id.
    ///
    /// Fans out one query per workout with bounded concurrency; the metrics
    /// window holds at most two weeks of workouts.
    pub async fn list_exercises_for_workouts(
        &self,
        workout_ids: &[String],
    ) -> Result<HashMap<String, Vec<Exercise>>, AppError> {
        // Probe connectivity once so offline mode fails before the fan-out.
        self.get_client()?;

        let results = stream::iter(workout_ids.to_vec())
            .map(|workout_id| async move {
                let exercises = self.list_exercises(&workout_id).await?;
                Ok::<_, AppError>((workout_id, exercises))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(String, Vec<Exercise>), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(results.into_iter().collect())
    }
}
