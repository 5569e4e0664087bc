//! Per-call dispatch: lifecycle orchestration around method handlers.

mod pipeline;

pub use pipeline::{Phase, Pipeline};

use async_trait::async_trait;

use rpcgate_core::call::{CallContext, Request, Response};
use rpcgate_core::Result;

/// A bound method handler. One fresh handler is constructed per call by the
/// servicer adapter; implementations may hold per-call state freely.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &Request, ctx: &mut CallContext) -> Result<Response>;
}
