use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::identity::IdentityContext;

/// Errors returned by credential verification.
///
/// Every variant surfaces to callers as "not authenticated"; the distinction
/// only exists for logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential")]
    Malformed,
    #[error("credential signature mismatch")]
    BadSignature,
    #[error("credential expired")]
    Expired,
    #[error("credential issuer mismatch")]
    IssuerMismatch,
    #[error("credential audience mismatch")]
    AudienceMismatch,
}

impl From<jsonwebtoken::errors::Error> for CredentialError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::IssuerMismatch,
            ErrorKind::InvalidAudience => Self::AudienceMismatch,
            _ => Self::Malformed,
        }
    }
}

/// JWT claims carried by a credential.
///
/// - `role` is always written, possibly as `""`.
/// - `sub` is only written when a subject was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialClaims {
    #[serde(default)]
    iss: String,
    #[serde(default)]
    aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default)]
    role: String,
    #[serde(default)]
    iat: i64,
    exp: i64,
    #[serde(default)]
    jti: String,
}

/// Settings the codec is built from. Read once at startup.
#[derive(Clone)]
pub struct CredentialSettings {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: u64,
    pub leeway_seconds: u64,
    pub validate_issuer_audience: bool,
}

/// HS256 credential issuer and verifier sharing one symmetric key.
#[derive(Clone)]
pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("CredentialCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("validation", &self.validation)
            .finish()
    }
}

impl CredentialCodec {
    pub fn new(settings: CredentialSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = settings.leeway_seconds;
        if settings.validate_issuer_audience {
            validation.set_issuer(&[&settings.issuer]);
            validation.set_audience(&[&settings.audience]);
        } else {
            validation.validate_aud = false;
        }

        Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            validation,
            issuer: settings.issuer,
            audience: settings.audience,
            ttl_seconds: settings.ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a signed credential valid for `ttl_seconds` from now.
    pub fn issue(&self, subject: Option<&str>, role: &str) -> Result<String, AppError> {
        self.issue_at(subject, role, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, subject: Option<&str>, role: &str, now: i64) -> Result<String, AppError> {
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "credential expiry out of range");
                AppError::Internal
            })?;

        let claims = CredentialClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: subject.map(str::to_string),
            role: role.to_string(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &CredentialClaims) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign credential");
            AppError::Internal
        })
    }

    /// Verify signature, expiry and (when enabled) issuer/audience.
    ///
    /// Malformed input is reported as [`CredentialError::Malformed`], never a panic.
    pub fn verify(&self, raw: &str) -> Result<IdentityContext, CredentialError> {
        let data =
            jsonwebtoken::decode::<CredentialClaims>(raw, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        Ok(IdentityContext::authenticated(claims.sub, &claims.role))
    }
}
