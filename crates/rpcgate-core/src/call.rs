//! Per-call data model: request payload, metadata, and response status.
//!
//! `CallContext` mirrors what an RPC transport hands to an interceptor: an
//! immutable string-keyed metadata map plus a response status that may be
//! written at most once before the call terminates. The transport creates one
//! context per inbound call and discards it when the call ends; nothing here
//! outlives a call.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::StatusCode;

/// Opaque request payload handed to handlers. The core never inspects it.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub payload: Bytes,
}

impl Request {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Opaque response payload produced by handlers.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub payload: Bytes,
}

impl Response {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Immutable string metadata attached to a call (e.g., the access token).
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when the transport assembles the call.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Terminal response status (code + detail message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: StatusCode,
    pub detail: String,
}

/// Per-call context: metadata lookup plus set-once status.
#[derive(Debug, Default)]
pub struct CallContext {
    metadata: Metadata,
    status: Option<Status>,
}

impl CallContext {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            status: None,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Set the terminal status. The first write wins; later writes are
    /// ignored and reported as `false`.
    pub fn set_status(&mut self, code: StatusCode, detail: impl Into<String>) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(Status {
            code,
            detail: detail.into(),
        });
        true
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }
}
