// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use innkeep_core::Page;

use crate::response::{ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /health
///
/// Liveness check. Returns 200 OK while the process serves requests.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// GET /ready
///
/// Readiness check. Probes the store with a one-item listing.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let probe = state.store().users.list_users(Page::new(1, 1)).await;

    let store_status = match probe {
        Ok(page) => ComponentStatus {
            name: "store".to_string(),
            healthy: true,
            message: Some(format!("{} users", page.total)),
        },
        Err(e) => {
            tracing::warn!(error = %e, "store readiness probe failed");
            ComponentStatus {
                name: "store".to_string(),
                healthy: false,
                message: Some(e.user_message()),
            }
        }
    };

    let ready = store_status.healthy;
    let response = ReadinessResponse {
        ready,
        components: vec![store_status],
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

// =============================================================================
// Tests
// =============================================================================
