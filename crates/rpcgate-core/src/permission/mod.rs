//! Permission predicates and the factory seam used to defer construction.
//!
//! A predicate is a boolean-valued check over one call. Configuration holds
//! [`PermissionFactory`] values rather than predicate instances: one fresh
//! instance is created at the start of authorization for a call and discarded
//! right after, so predicates can never carry cross-call state.

mod combinator;

pub use combinator::{and, not, or};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::call::{CallContext, Request};

/// A boolean-valued authorization check over a single call.
pub trait Permission: Send + Sync {
    /// Return `true` if the call is permitted.
    fn has_permission(&self, request: &Request, ctx: &CallContext) -> bool;

    /// Object-level variant, consulted with a target resource. Defaults to
    /// granting, matching the base behavior of method-level-only predicates.
    fn has_object_permission(
        &self,
        request: &Request,
        ctx: &CallContext,
        _resource: &dyn Any,
    ) -> bool {
        let _ = (request, ctx);
        true
    }
}

/// Zero-argument constructor producing a fresh [`Permission`] per call.
///
/// Factories are cheap to clone and are shared read-only across calls; only
/// the predicates they produce are call-scoped.
#[derive(Clone)]
pub struct PermissionFactory {
    inner: Arc<dyn Fn() -> Box<dyn Permission> + Send + Sync>,
}

impl PermissionFactory {
    pub fn new<P, F>(make: F) -> Self
    where
        P: Permission + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move || Box::new(make())),
        }
    }

    /// Construct the per-call predicate instance.
    pub fn instantiate(&self) -> Box<dyn Permission> {
        (self.inner)()
    }
}

impl fmt::Debug for PermissionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PermissionFactory")
    }
}
