use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::IdentityContext;
use crate::services::gate::{GateError, RequestScope};
use crate::services::orders::Outcome;

/// Handler で、検証済みの IdentityContext を受け取るための extractor
/// gate の middleware が RequestScope を request.extensions() に insert 済みである前提
/// 見つからない場合 (middleware 未設定) は未認証として 401 を返す
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityContext);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Outcome;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestScope>()
            .and_then(RequestScope::identity)
            .filter(|identity| identity.is_authenticated)
            .cloned()
            .map(Identity)
            .ok_or_else(|| GateError::Unauthenticated.into())
    }
}
