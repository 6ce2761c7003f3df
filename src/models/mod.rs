// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod chat;
pub mod exercise;
pub mod metrics;
pub mod workout;

pub use chat::{ChatAction, ChatRequest, ChatResponse, ModelReply};
pub use exercise::{is_cardio_unit, Exercise};
pub use metrics::{DayEntry, FitnessMetrics, Trend};
pub use workout::Workout;
