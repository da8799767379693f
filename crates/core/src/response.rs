// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured response returned to synchronous callers.

use serde::{Deserialize, Serialize};

/// Outcome of a synchronous action entry point.
///
/// Background operations report progress through their log record; this
/// only tells the caller whether the request was accepted or acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data: None }
    }

    pub fn ok_with(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self { success: true, message: message.into(), data: Some(data) }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }
}
