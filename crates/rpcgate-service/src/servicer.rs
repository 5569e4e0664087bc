//! Servicer adapter: binds named actions of a service definition to
//! dispatch-wrapped handlers.
//!
//! The action table is an explicit name → factory map built at definition
//! time; resolution is a lookup, not reflection. Bind-time overrides are
//! validated against the definition's attribute table and rejected eagerly.
//! The servicer caches nothing across calls except the resolved binding
//! itself: every invocation constructs a fresh handler.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use rpcgate_core::call::{CallContext, Request, Response};
use rpcgate_core::{Result, RpcGateError, StatusCode};

use crate::dispatch::{Handler, Pipeline};
use crate::obs::DispatchMetrics;
use crate::policy::Policy;
use crate::signals::LifecycleSignals;

/// Merged attribute table: definition defaults overlaid with bind overrides.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Zero-argument-per-call constructor producing a fresh [`Handler`], given
/// the bound attribute table.
#[derive(Clone)]
pub struct HandlerFactory {
    inner: Arc<dyn Fn(&Attributes) -> Box<dyn Handler> + Send + Sync>,
}

impl HandlerFactory {
    pub fn new<H, F>(make: F) -> Self
    where
        H: Handler + 'static,
        F: Fn(&Attributes) -> H + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |attrs| Box::new(make(attrs))),
        }
    }

    fn instantiate(&self, attrs: &Attributes) -> Box<dyn Handler> {
        (self.inner)(attrs)
    }
}

/// A service definition: named actions, the attribute table bind-time
/// overrides are validated against, and the ordered policy protecting the
/// actions.
pub struct ServiceDef {
    name: String,
    policy: Policy,
    attributes: Attributes,
    actions: BTreeMap<String, HandlerFactory>,
}

impl ServiceDef {
    pub fn builder(name: impl Into<String>) -> ServiceDefBuilder {
        ServiceDefBuilder {
            name: name.into(),
            policy: Policy::allow_all(),
            attributes: Attributes::new(),
            actions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

pub struct ServiceDefBuilder {
    name: String,
    policy: Policy,
    attributes: Attributes,
    actions: BTreeMap<String, HandlerFactory>,
}

impl ServiceDefBuilder {
    /// Declare an attribute with its default value. Only declared attributes
    /// may be overridden at bind time.
    pub fn attribute(mut self, key: impl Into<String>, default: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), default);
        self
    }

    /// Bind an action name to a handler factory.
    pub fn action(mut self, name: impl Into<String>, factory: HandlerFactory) -> Self {
        self.actions.insert(name.into(), factory);
        self
    }

    /// Set the ordered policy protecting every action of this service.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> ServiceDef {
        ServiceDef {
            name: self.name,
            policy: self.policy,
            attributes: self.attributes,
            actions: self.actions,
        }
    }
}

struct BoundAction {
    factory: HandlerFactory,
}

/// Transport-facing binding for one service definition.
pub struct Servicer {
    def: Arc<ServiceDef>,
    attributes: Arc<Attributes>,
    pipeline: Pipeline,
    bound: DashMap<String, Arc<BoundAction>>,
}

impl std::fmt::Debug for Servicer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Servicer")
            .field("service", &self.def.name)
            .finish_non_exhaustive()
    }
}

impl Servicer {
    /// Bind a service definition. Unknown override keys fail fast here, not
    /// per call.
    pub fn bind(
        def: Arc<ServiceDef>,
        signals: LifecycleSignals,
        overrides: Attributes,
    ) -> Result<Self> {
        for key in overrides.keys() {
            if !def.attributes.contains_key(key) {
                return Err(RpcGateError::Config(format!(
                    "{} received an invalid override {key:?}: bind only accepts \
                     keys that are attributes of the service definition",
                    def.name
                )));
            }
        }

        let mut attributes = def.attributes.clone();
        attributes.extend(overrides);

        let pipeline = Pipeline::new(def.name.clone(), def.policy.clone(), signals);
        Ok(Self {
            def,
            attributes: Arc::new(attributes),
            pipeline,
            bound: DashMap::new(),
        })
    }

    /// Attach a shared metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.pipeline = self.pipeline.with_metrics(metrics);
        self
    }

    pub fn def(&self) -> &ServiceDef {
        &self.def
    }

    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        self.pipeline.metrics()
    }

    /// Invoke an action by name through the dispatch pipeline.
    ///
    /// An action absent from the definition short-circuits before
    /// authorization: the status is set to `Unimplemented` and no start or
    /// finish notification is emitted.
    pub async fn call(
        &self,
        action: &str,
        request: &Request,
        ctx: &mut CallContext,
    ) -> Result<Response> {
        let Some(bound) = self.resolve(action) else {
            ctx.set_status(StatusCode::Unimplemented, "Method not implemented!");
            self.pipeline
                .metrics()
                .unimplemented
                .inc(&[("service", self.def.name()), ("action", action)]);
            return Err(RpcGateError::Unimplemented(action.to_string()));
        };

        // Fresh handler per call; only the binding above is cached.
        let handler = bound.factory.instantiate(&self.attributes);
        self.pipeline
            .dispatch(action, handler.as_ref(), request, ctx)
            .await
    }

    /// Resolve lazily on first access, then serve the cached binding.
    fn resolve(&self, action: &str) -> Option<Arc<BoundAction>> {
        if let Some(bound) = self.bound.get(action) {
            return Some(Arc::clone(bound.value()));
        }
        let factory = self.def.actions.get(action)?.clone();
        let bound = Arc::new(BoundAction { factory });
        self.bound.insert(action.to_string(), Arc::clone(&bound));
        Some(bound)
    }
}
