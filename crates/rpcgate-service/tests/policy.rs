//! Ordered policy evaluation semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rpcgate_core::call::{CallContext, Metadata, Request};
use rpcgate_core::permission::{Permission, PermissionFactory};
use rpcgate_service::policy::{Policy, PolicyDecision};

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
fn empty_policy_grants() {
    let (req, ctx) = call();
    let policy = Policy::allow_all();
    assert!(policy.is_empty());
    assert_eq!(policy.check(&req, &ctx), PolicyDecision::Granted);
}

#[test]
fn single_denier_denies_regardless_of_list_length() {
    let (req, ctx) = call();
    let policy = Policy::new(vec![fixed(true), fixed(true), fixed(false), fixed(true)]);
    assert_eq!(policy.check(&req, &ctx), PolicyDecision::Denied);
}

#[test]
fn evaluation_stops_at_first_denial() {
    let (req, ctx) = call();
    let evals = Arc::new(AtomicUsize::new(0));
    let policy = Policy::new(vec![fixed(false), counting(true, Arc::clone(&evals))]);
    assert_eq!(policy.check(&req, &ctx), PolicyDecision::Denied);
    assert_eq!(evals.load(Ordering::SeqCst), 0);
}

#[test]
fn all_granting_predicates_grant() {
    let (req, ctx) = call();
    let policy = Policy::new(vec![fixed(true), fixed(true)]);
    assert_eq!(policy.check(&req, &ctx), PolicyDecision::Granted);
}

#[test]
fn object_check_mirrors_method_check() {
    let (req, ctx) = call();
    let resource = String::from("post:1");
    let granted = Policy::new(vec![fixed(true)]);
    let denied = Policy::new(vec![fixed(true), fixed(false)]);
    assert_eq!(
        granted.check_object(&req, &ctx, &resource),
        PolicyDecision::Granted
    );
    assert_eq!(
        denied.check_object(&req, &ctx, &resource),
        PolicyDecision::Denied
    );
}
