//! Lifecycle notifications (start / finish).
//!
//! Listeners are injected at pipeline construction and invoked synchronously
//! in registration order; there is no process-wide signal registry. They
//! carry no payload beyond the call context and exist for housekeeping
//! (resetting cached state, releasing pooled resources). They must not
//! influence the authorization outcome.

use std::sync::Arc;

use rpcgate_core::call::CallContext;

/// A lifecycle event observer.
pub type Listener = Arc<dyn Fn(&CallContext) + Send + Sync>;

/// Listener lists for the two lifecycle events.
#[derive(Clone, Default)]
pub struct LifecycleSignals {
    started: Vec<Listener>,
    finished: Vec<Listener>,
}

impl LifecycleSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the start of every dispatched call.
    pub fn connect_started(&mut self, listener: Listener) {
        self.started.push(listener);
    }

    /// Register a listener for the end of every dispatched call. Runs on
    /// success and on failure alike.
    pub fn connect_finished(&mut self, listener: Listener) {
        self.finished.push(listener);
    }

    pub(crate) fn emit_started(&self, ctx: &CallContext) {
        for listener in &self.started {
            listener(ctx);
        }
    }

    pub(crate) fn emit_finished(&self, ctx: &CallContext) {
        for listener in &self.finished {
            listener(ctx);
        }
    }
}
