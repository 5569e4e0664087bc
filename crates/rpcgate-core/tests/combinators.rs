//! Combinator algebra truth tables and construction semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rpcgate_core::call::{CallContext, Metadata, Request};
use rpcgate_core::permission::{and, not, or, Permission, PermissionFactory};

struct Fixed(bool);

impl Permission for Fixed {
    fn has_permission(&self, _request: &Request, _ctx: &CallContext) -> bool {
        self.0
    }

    fn has_object_permission(
        &self,
        _request: &Request,
        _ctx: &CallContext,
        _resource: &dyn std::any::Any,
    ) -> bool {
        self.0
    }
}

fn fixed(grant: bool) -> PermissionFactory {
    PermissionFactory::new(move || Fixed(grant))
}

/// Predicate counting its evaluations, for short-circuit assertions.
struct Counting {
    grant: bool,
    evals: Arc<AtomicUsize>,
}

impl Permission for Counting {
    fn has_permission(&self, _request: &Request, _ctx: &CallContext) -> bool {
        self.evals.fetch_add(1, Ordering::SeqCst);
        self.grant
    }
}

fn counting(grant: bool, evals: Arc<AtomicUsize>) -> PermissionFactory {
    PermissionFactory::new(move || Counting {
        grant,
        evals: Arc::clone(&evals),
    })
}

fn call() -> (Request, CallContext) {
    (Request::default(), CallContext::new(Metadata::new()))
}

#[test]
fn and_truth_table() {
    let (req, ctx) = call();
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let p = and(fixed(a), fixed(b)).instantiate();
        assert_eq!(p.has_permission(&req, &ctx), a && b, "AND({a},{b})");
        let obj = 7u32;
        assert_eq!(p.has_object_permission(&req, &ctx, &obj), a && b);
    }
}

#[test]
fn or_truth_table() {
    let (req, ctx) = call();
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let p = or(fixed(a), fixed(b)).instantiate();
        assert_eq!(p.has_permission(&req, &ctx), a || b, "OR({a},{b})");
        let obj = 7u32;
        assert_eq!(p.has_object_permission(&req, &ctx, &obj), a || b);
    }
}

#[test]
fn not_truth_table() {
    let (req, ctx) = call();
    for a in [false, true] {
        let p = not(fixed(a)).instantiate();
        assert_eq!(p.has_permission(&req, &ctx), !a, "NOT({a})");
        let obj = 7u32;
        assert_eq!(p.has_object_permission(&req, &ctx, &obj), !a);
    }
}

#[test]
fn and_short_circuits_right_operand() {
    let (req, ctx) = call();
    let evals = Arc::new(AtomicUsize::new(0));
    let p = and(fixed(false), counting(true, Arc::clone(&evals))).instantiate();
    assert!(!p.has_permission(&req, &ctx));
    assert_eq!(evals.load(Ordering::SeqCst), 0, "right operand must not run");
}

#[test]
fn or_short_circuits_right_operand() {
    let (req, ctx) = call();
    let evals = Arc::new(AtomicUsize::new(0));
    let p = or(fixed(true), counting(false, Arc::clone(&evals))).instantiate();
    assert!(p.has_permission(&req, &ctx));
    assert_eq!(evals.load(Ordering::SeqCst), 0, "right operand must not run");
}

#[test]
fn double_negation_evaluates_not_cancels() {
    let (req, ctx) = call();
    let evals = Arc::new(AtomicUsize::new(0));
    let p = not(not(counting(true, Arc::clone(&evals)))).instantiate();
    assert!(p.has_permission(&req, &ctx));
    // The inner predicate really ran; no algebraic cancellation happened.
    assert_eq!(evals.load(Ordering::SeqCst), 1);
}

#[test]
fn composites_nest_arbitrarily() {
    let (req, ctx) = call();
    // (true AND NOT false) OR false == true
    let p = or(and(fixed(true), not(fixed(false))), fixed(false)).instantiate();
    assert!(p.has_permission(&req, &ctx));
}

#[test]
fn factory_builds_fresh_instances_per_call() {
    let built = Arc::new(AtomicUsize::new(0));
    let factory = {
        let built = Arc::clone(&built);
        PermissionFactory::new(move || {
            built.fetch_add(1, Ordering::SeqCst);
            Fixed(true)
        })
    };
    let composite = and(factory.clone(), factory);
    // Nothing is constructed until the composite itself is instantiated.
    assert_eq!(built.load(Ordering::SeqCst), 0);
    let _first = composite.instantiate();
    assert_eq!(built.load(Ordering::SeqCst), 2);
    let _second = composite.instantiate();
    assert_eq!(built.load(Ordering::SeqCst), 4);
}
