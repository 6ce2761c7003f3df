// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ironlog: personal fitness-tracking API.
//!
//! This crate provides the backend API for logging workouts and exercises,
//! editing the workout log through a natural-language chat assistant, and
//! computing a composite fitness score over recent history.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::ChatService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub chat: ChatService,
}
