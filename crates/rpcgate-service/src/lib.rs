//! rpcGate service layer.
//!
//! This crate wires the permission algebra from `rpcgate-core` into a per-call
//! authorization and dispatch stack: built-in predicates (token-based caller
//! authentication), ordered policy evaluation, the dispatch pipeline with
//! lifecycle signals, and the servicer adapter that binds action names to
//! dispatch-wrapped handlers. It is intended to sit between an RPC transport
//! and application handlers.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod policy;
pub mod servicer;
pub mod signals;
