//! The per-call lifecycle state machine.
//!
//! `NotStarted → Started → Authorizing → {Denied | Authorized} → Invoking →
//! {Succeeded | Failed} → Finalized`. The finalize step (initial hook +
//! finish notification) runs on every path out of the fallible section,
//! including handler failure; it is straight-line code after the result is
//! captured, never a best-effort call on the happy path only.

use std::sync::Arc;
use std::time::Instant;

use rpcgate_core::call::{CallContext, Request, Response};
use rpcgate_core::{Result, RpcGateError, StatusCode};

use crate::obs::DispatchMetrics;
use crate::policy::{Policy, PolicyDecision};
use crate::signals::LifecycleSignals;

use super::Handler;

/// Phases of the per-call state machine, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Started,
    Authorizing,
    Denied,
    Authorized,
    Invoking,
    Succeeded,
    Failed,
    Finalized,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::Started => "started",
            Phase::Authorizing => "authorizing",
            Phase::Denied => "denied",
            Phase::Authorized => "authorized",
            Phase::Invoking => "invoking",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
            Phase::Finalized => "finalized",
        }
    }
}

/// Orchestrates one call: notify-started, authorize, invoke, finalize.
///
/// Construct once per service binding and share via `Arc`; all per-call state
/// lives in the arguments to [`dispatch`](Self::dispatch).
pub struct Pipeline {
    service: String,
    policy: Policy,
    signals: LifecycleSignals,
    metrics: Arc<DispatchMetrics>,
}

impl Pipeline {
    pub fn new(service: impl Into<String>, policy: Policy, signals: LifecycleSignals) -> Self {
        Self {
            service: service.into(),
            policy,
            signals,
            metrics: Arc::new(DispatchMetrics::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run one call through the lifecycle. The handler failure, if any, is
    /// propagated unchanged after the finalize step has run.
    pub async fn dispatch(
        &self,
        action: &str,
        handler: &dyn Handler,
        request: &Request,
        ctx: &mut CallContext,
    ) -> Result<Response> {
        let started_at = Instant::now();
        let mut phase = Phase::NotStarted;

        self.transition(action, &mut phase, Phase::Started);
        self.signals.emit_started(ctx);

        let result = self.authorize_and_invoke(action, handler, request, ctx, &mut phase).await;

        // Guaranteed cleanup: runs for Succeeded, Failed, and Denied alike.
        self.initial(request, ctx);
        self.signals.emit_finished(ctx);
        self.transition(action, &mut phase, Phase::Finalized);

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.status_code().as_str(),
        };
        self.metrics
            .calls
            .inc(&[("service", &self.service), ("action", action), ("outcome", outcome)]);
        self.metrics.dispatch_duration.observe(
            &[("service", &self.service), ("action", action)],
            started_at.elapsed(),
        );

        result
    }

    async fn authorize_and_invoke(
        &self,
        action: &str,
        handler: &dyn Handler,
        request: &Request,
        ctx: &mut CallContext,
        phase: &mut Phase,
    ) -> Result<Response> {
        self.transition(action, phase, Phase::Authorizing);
        match self.policy.check(request, ctx) {
            PolicyDecision::Denied => {
                self.transition(action, phase, Phase::Denied);
                ctx.set_status(StatusCode::Unauthenticated, "Endpoint is restricted access");
                self.metrics
                    .auth_denials
                    .inc(&[("service", &self.service), ("action", action)]);
                return Err(RpcGateError::AuthDenied(format!(
                    "{}.{action}",
                    self.service
                )));
            }
            PolicyDecision::Granted => {
                self.transition(action, phase, Phase::Authorized);
            }
        }

        self.transition(action, phase, Phase::Invoking);
        match handler.handle(request, ctx).await {
            Ok(response) => {
                self.transition(action, phase, Phase::Succeeded);
                Ok(response)
            }
            Err(e) => {
                self.transition(action, phase, Phase::Failed);
                self.metrics
                    .handler_errors
                    .inc(&[("service", &self.service), ("action", action)]);
                Err(e)
            }
        }
    }

    /// The pre-exit hook: an idempotent authorization re-check point kept for
    /// wrapper hooks. Observational only; it never changes the call outcome.
    fn initial(&self, request: &Request, ctx: &CallContext) {
        if self.policy.check(request, ctx) == PolicyDecision::Denied {
            tracing::debug!(service = %self.service, "finalize re-check denied");
        }
    }

    fn transition(&self, action: &str, phase: &mut Phase, next: Phase) {
        tracing::trace!(
            service = %self.service,
            action,
            from = phase.as_str(),
            to = next.as_str(),
            "dispatch phase"
        );
        *phase = next;
    }
}
