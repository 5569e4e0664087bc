//! Auth layer config loader (strict parsing).

pub mod schema;

use std::fs;

use rpcgate_core::{Result, RpcGateError};

pub use schema::{AuthConfig, TokenSection};

pub fn load_from_file(path: &str) -> Result<AuthConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RpcGateError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AuthConfig> {
    let cfg: AuthConfig = serde_yaml::from_str(s)
        .map_err(|e| RpcGateError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
