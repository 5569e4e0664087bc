//! rpcGate core: transport-agnostic call model, permission algebra, and error surface.
//!
//! This crate defines the per-call data model and the authorization contracts
//! shared by the service layer and by user code. It intentionally carries no
//! transport or runtime dependencies so predicates and policies can be reused
//! in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RpcGateError`/`Result` so an
//! authorization decision never takes a serving process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod call;
pub mod error;
pub mod permission;

/// Shared result type.
pub use error::{Result, RpcGateError, StatusCode};
