// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod anthropic;
pub mod chat;
pub mod metrics;
pub mod templates;

pub use anthropic::AnthropicClient;
pub use chat::ChatService;
