// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat endpoint.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ChatRequest, ChatResponse};
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat", post(chat_turn))
}

/// Run one chat turn.
///
/// The request carries the client's current view of the workout and its
/// exercises; the pipeline trusts that state as the base to mutate rather
/// than re-fetching it.
async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        workout_id = %req.workout_id,
        exercises = req.exercises.len(),
        "Chat turn"
    );

    let response = state.chat.handle(&state.db, req).await?;
    Ok(Json(response))
}
