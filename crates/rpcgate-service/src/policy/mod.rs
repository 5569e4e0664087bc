//! Ordered policy evaluation (fail closed).
//!
//! A policy is the effective, ordered list of predicate constructors for a
//! service's methods. Evaluation instantiates each predicate fresh, in order,
//! and the first denial wins — a logical AND across the list, distinct from
//! the combinators available to a single entry. The empty policy grants.

use std::any::Any;
use std::sync::Arc;

use rpcgate_core::call::{CallContext, Request};
use rpcgate_core::permission::PermissionFactory;

/// Decision from evaluating a policy against one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Granted,
    Denied,
}

/// Ordered predicate constructors for a service. Read-only after
/// construction, safe for unsynchronized concurrent reads.
#[derive(Clone)]
pub struct Policy {
    factories: Arc<[PermissionFactory]>,
}

impl Policy {
    pub fn new(factories: Vec<PermissionFactory>) -> Self {
        Self {
            factories: factories.into(),
        }
    }

    /// The default permissive policy: no predicates configured.
    pub fn allow_all() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Instantiate each predicate in order and evaluate `has_permission`.
    /// Short-circuits on the first denial.
    pub fn check(&self, request: &Request, ctx: &CallContext) -> PolicyDecision {
        for (idx, factory) in self.factories.iter().enumerate() {
            let permission = factory.instantiate();
            if !permission.has_permission(request, ctx) {
                tracing::debug!(predicate = idx, "policy denied call");
                return PolicyDecision::Denied;
            }
        }
        PolicyDecision::Granted
    }

    /// Object-level mirror of [`check`](Self::check).
    pub fn check_object(
        &self,
        request: &Request,
        ctx: &CallContext,
        resource: &dyn Any,
    ) -> PolicyDecision {
        for (idx, factory) in self.factories.iter().enumerate() {
            let permission = factory.instantiate();
            if !permission.has_object_permission(request, ctx, resource) {
                tracing::debug!(predicate = idx, "policy denied object access");
                return PolicyDecision::Denied;
            }
        }
        PolicyDecision::Granted
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::allow_all()
    }
}
