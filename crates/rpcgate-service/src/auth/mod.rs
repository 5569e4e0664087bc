//! Built-in permission predicates.

mod token;

pub use token::{TokenError, TokenVerifier};

use std::sync::Arc;

use rpcgate_core::call::{CallContext, Request};
use rpcgate_core::permission::{Permission, PermissionFactory};

/// Metadata key carrying the caller's access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Grants iff the call metadata carries a non-empty, valid access token.
///
/// A fresh instance is created per call through [`is_authenticated`]; the
/// verifier behind it is shared and read-only.
pub struct IsAuthenticated {
    verifier: Arc<TokenVerifier>,
}

impl IsAuthenticated {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl Permission for IsAuthenticated {
    fn has_permission(&self, _request: &Request, ctx: &CallContext) -> bool {
        let token = ctx.metadata().get(ACCESS_TOKEN_KEY).unwrap_or("");
        match self.verifier.verify(token) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(reason = e.detail(), "access token rejected");
                false
            }
        }
    }
}

/// Factory for [`IsAuthenticated`] suitable for policies and combinators.
pub fn is_authenticated(verifier: Arc<TokenVerifier>) -> PermissionFactory {
    PermissionFactory::new(move || IsAuthenticated::new(Arc::clone(&verifier)))
}
