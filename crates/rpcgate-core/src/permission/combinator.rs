//! AND / OR / NOT composition over permission factories.
//!
//! Combinators compose *factories*, not instances: `and(p, q)` returns a new
//! factory whose product instantiates both operands at call time and then
//! evaluates them with short-circuit boolean semantics. No algebraic
//! simplification is performed; `not(not(p))` is legal and evaluates through
//! double negation. Composites nest arbitrarily deep and are pure trees,
//! since they are built by combinator application at configuration time.

use std::any::Any;

use crate::call::{CallContext, Request};

use super::{Permission, PermissionFactory};

/// Composite granting iff both operands grant. The right operand is
/// constructed but not evaluated when the left one denies.
pub fn and(left: PermissionFactory, right: PermissionFactory) -> PermissionFactory {
    PermissionFactory::new(move || And {
        left: left.instantiate(),
        right: right.instantiate(),
    })
}

/// Composite granting iff either operand grants. The right operand is
/// constructed but not evaluated when the left one grants.
pub fn or(left: PermissionFactory, right: PermissionFactory) -> PermissionFactory {
    PermissionFactory::new(move || Or {
        left: left.instantiate(),
        right: right.instantiate(),
    })
}

/// Composite granting iff the operand denies.
pub fn not(operand: PermissionFactory) -> PermissionFactory {
    PermissionFactory::new(move || Not {
        operand: operand.instantiate(),
    })
}

struct And {
    left: Box<dyn Permission>,
    right: Box<dyn Permission>,
}

impl Permission for And {
    fn has_permission(&self, request: &Request, ctx: &CallContext) -> bool {
        self.left.has_permission(request, ctx) && self.right.has_permission(request, ctx)
    }

    fn has_object_permission(
        &self,
        request: &Request,
        ctx: &CallContext,
        resource: &dyn Any,
    ) -> bool {
        self.left.has_object_permission(request, ctx, resource)
            && self.right.has_object_permission(request, ctx, resource)
    }
}

struct Or {
    left: Box<dyn Permission>,
    right: Box<dyn Permission>,
}

impl Permission for Or {
    fn has_permission(&self, request: &Request, ctx: &CallContext) -> bool {
        self.left.has_permission(request, ctx) || self.right.has_permission(request, ctx)
    }

    fn has_object_permission(
        &self,
        request: &Request,
        ctx: &CallContext,
        resource: &dyn Any,
    ) -> bool {
        self.left.has_object_permission(request, ctx, resource)
            || self.right.has_object_permission(request, ctx, resource)
    }
}

struct Not {
    operand: Box<dyn Permission>,
}

impl Permission for Not {
    fn has_permission(&self, request: &Request, ctx: &CallContext) -> bool {
        !self.operand.has_permission(request, ctx)
    }

    fn has_object_permission(
        &self,
        request: &Request,
        ctx: &CallContext,
        resource: &dyn Any,
    ) -> bool {
        !self.operand.has_object_permission(request, ctx, resource)
    }
}
