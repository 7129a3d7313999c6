//! # API Shared
//!
//! Shared utilities and definitions for the intake APIs.
//!
//! Contains:
//! - Wire types (`wire` module): request and response bodies with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and by clients that talk to it.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
