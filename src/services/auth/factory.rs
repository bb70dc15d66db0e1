/// Factory: build `CredentialCodec` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{CredentialCodec, CredentialSettings};

pub fn build_credential_codec(config: &Config) -> Arc<CredentialCodec> {
    let codec = CredentialCodec::new(CredentialSettings {
        secret: config.auth_signing_secret.clone(),
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        ttl_seconds: config.access_token_ttl_seconds,
        leeway_seconds: config.access_token_leeway_seconds,
        validate_issuer_audience: config.validate_issuer_audience,
    });

    Arc::new(codec)
}
