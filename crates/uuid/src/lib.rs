//! Client identifiers and sharded-path utilities.
//!
//! Every customer record is keyed by a [`ClientId`]. To keep path derivation deterministic the
//! workspace uses a *canonical* representation: **32 lowercase hexadecimal characters** (no
//! hyphens), i.e. `Uuid::new_v4().simple().to_string()`.
//!
//! This crate provides:
//! - [`ClientId`], a wrapper that guarantees the canonical format once constructed.
//! - Shared sharding logic to derive a record directory from an identifier.
//! - The [`ClientIdGenerator`] port used to allocate fresh identifiers.
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, records live under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `customer_data/customers/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! This keeps any single directory from growing to hundreds of thousands of entries.

mod client_id;
mod generator;

pub use client_id::{ClientId, Uuid};
pub use generator::{ClientIdGenerator, RandomClientIdGenerator};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
