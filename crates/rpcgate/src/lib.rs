//! Top-level facade crate for rpcGate.
//!
//! Re-exports the core call model and the service layer so users can depend
//! on a single crate.

pub mod core {
    pub use rpcgate_core::*;
}

pub mod service {
    pub use rpcgate_service::*;
}
