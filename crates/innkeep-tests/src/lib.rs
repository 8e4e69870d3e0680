// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # innkeep Integration Tests
//!
//! End-to-end tests that drive the full router in-process, plus
//! configuration loading tests against real files.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: fixed users, hotels, rooms, stays and secrets
//!   - `harness`: `TestApp`, which builds state, router and tokens
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p innkeep-tests
//! cargo test -p innkeep-tests --test integration_auth
//! cargo test -p innkeep-tests --test integration_bookings
//! cargo test -p innkeep-tests --test integration_config
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use innkeep_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let alice = app.seed_user(&UserFixtures::alice()).await;
//!     let token = app.token_for(&alice);
//!
//!     let response = app.get("/api/v1/me", Some(&token)).await;
//!     assert_eq!(response.status, StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
    pub use axum::http::StatusCode;
    pub use serde_json::json;
}
