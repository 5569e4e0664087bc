use serde::Deserialize;

use rpcgate_core::{Result, RpcGateError};

use crate::auth::TokenVerifier;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub version: u32,

    #[serde(default)]
    pub token: TokenSection,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RpcGateError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.token.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TokenSection {
    /// HS256 shared secret used to verify access tokens.
    #[serde(default)]
    pub signing_key: Option<String>,

    /// Explicit opt-in for running without signature verification. Required
    /// whenever `signing_key` is absent so the relaxed mode can never be a
    /// silent default.
    #[serde(default)]
    pub allow_unverified: bool,
}

impl TokenSection {
    pub fn validate(&self) -> Result<()> {
        match &self.signing_key {
            Some(key) if key.is_empty() => Err(RpcGateError::Config(
                "token.signing_key must not be empty".into(),
            )),
            Some(_) => Ok(()),
            None if self.allow_unverified => Ok(()),
            None => Err(RpcGateError::Config(
                "token.signing_key is not set; set token.allow_unverified: true \
                 to run without signature verification"
                    .into(),
            )),
        }
    }

    /// Build the verifier this section describes.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.signing_key.as_deref())
    }
}
